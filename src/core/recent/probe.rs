//! Tolerant field lookup over schema-less JSON.
//!
//! The vendor renamed these fields more than once; each accessor consults an
//! ordered list of known spellings and the first present key wins. Order is
//! load-bearing — newer spellings come first.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const PATH_KEYS: [&str; 10] = [
    "Path",
    "path",
    "FullPath",
    "fullPath",
    "Key",
    "key",
    "LocalPath",
    "localPath",
    "Value",
    "value",
];

const DATE_KEYS: [&str; 8] = [
    "LastAccessed",
    "lastAccessed",
    "LastOpened",
    "lastOpened",
    "Timestamp",
    "timestamp",
    "Date",
    "date",
];

/// First present key from `keys`, in order.
pub(crate) fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| value.get(key))
}

/// Extract a path from an entry that may be an object under any known
/// path-key spelling, or a bare string.
pub(crate) fn entry_path(entry: &Value) -> Option<String> {
    for key in PATH_KEYS {
        if let Some(path) = entry.get(key).and_then(Value::as_str) {
            if !path.is_empty() {
                return Some(path.to_string());
            }
        }
    }

    match entry.as_str() {
        Some(path) if !path.is_empty() => Some(path.to_string()),
        _ => None,
    }
}

/// Extract a last-accessed timestamp from an entry, probing the known
/// date-key spellings.
pub(crate) fn entry_timestamp(entry: &Value) -> Option<DateTime<Utc>> {
    first_present(entry, &DATE_KEYS).and_then(parse_timestamp_value)
}

/// A timestamp value is either an ISO-8601 string (with or without zone) or
/// a unix-milliseconds integer.
pub(crate) fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(text) = value.as_str() {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        // Zone-less timestamps are written in UTC.
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&naive));
        }
        return None;
    }

    value
        .as_i64()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_key_probe_order_is_stable() {
        let entry = json!({"fullPath": "/b", "Path": "/a", "key": "/c"});
        assert_eq!(entry_path(&entry), Some("/a".to_string()));

        let entry = json!({"localPath": "/x", "Value": "/y"});
        assert_eq!(entry_path(&entry), Some("/x".to_string()));
    }

    #[test]
    fn bare_string_entries_are_paths() {
        assert_eq!(entry_path(&json!("/proj/app.sln")), Some("/proj/app.sln".to_string()));
        assert_eq!(entry_path(&json!("")), None);
        assert_eq!(entry_path(&json!(42)), None);
    }

    #[test]
    fn empty_path_values_are_skipped() {
        let entry = json!({"Path": "", "fullPath": "/real"});
        assert_eq!(entry_path(&entry), Some("/real".to_string()));
    }

    #[test]
    fn timestamps_parse_from_rfc3339_naive_and_millis() {
        let rfc = parse_timestamp_value(&json!("2024-01-15T10:30:00Z")).unwrap();
        assert_eq!(rfc.timestamp(), 1705314600);

        let naive = parse_timestamp_value(&json!("2024-01-15T10:30:00.5")).unwrap();
        assert_eq!(naive.timestamp(), 1705314600);

        let millis = parse_timestamp_value(&json!(1705314600000i64)).unwrap();
        assert_eq!(millis.timestamp(), 1705314600);

        assert!(parse_timestamp_value(&json!("last tuesday")).is_none());
        assert!(parse_timestamp_value(&json!(null)).is_none());
    }

    #[test]
    fn date_key_probe_prefers_last_accessed() {
        let entry = json!({
            "timestamp": "2020-01-01T00:00:00Z",
            "LastAccessed": "2024-01-01T00:00:00Z"
        });
        let ts = entry_timestamp(&entry).unwrap();
        assert_eq!(ts.format("%Y").to_string(), "2024");
    }
}
