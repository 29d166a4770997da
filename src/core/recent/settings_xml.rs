//! Primary recent-project source: `ApplicationPrivateSettings.xml`.
//!
//! The settings store is XML, but the interesting collection value is itself
//! a serialized JSON array — the file must be parsed twice. Shape:
//!
//! ```xml
//! <collection name="CodeContainers.Offline">
//!   <value name="value">[{"Key":"...","Value":{"LocalProperties":{"FullPath":"..."},
//!     "LastAccessed":"2024-01-15T10:30:00Z"}}, ...]</value>
//! </collection>
//! ```

use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use tracing::debug;

use crate::core::instance::model::has_extension;
use crate::core::recent::{probe, RawEntry};

const COLLECTION_KEY: &str = "CodeContainers.Offline";

/// Solution and project file types the primary source keeps. Folder
/// workspaces are intentionally not part of this source.
const PROJECT_EXTENSIONS: [&str; 5] = ["sln", "csproj", "vbproj", "fsproj", "vcxproj"];

/// Read and parse one settings file. Missing or malformed files contribute
/// zero entries.
pub(crate) fn parse_private_settings_file(path: &Path) -> Vec<RawEntry> {
    let Ok(xml) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    parse_private_settings(&xml)
}

/// Scan the XML for the offline code-containers collection and decode its
/// embedded JSON payload.
pub(crate) fn parse_private_settings(xml: &str) -> Vec<RawEntry> {
    let mut entries = Vec::new();

    for payload in collection_payloads(xml, COLLECTION_KEY) {
        entries.extend(parse_containers_payload(&payload));
    }

    entries
}

/// Text payloads of `<value name="value">` elements inside collections whose
/// `name` attribute equals `collection_name`. A non-well-formed document
/// yields whatever was collected before the parse error.
fn collection_payloads(xml: &str, collection_name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut payloads = Vec::new();
    let mut in_collection = false;
    let mut nested_depth = 0usize;
    let mut capturing = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                if in_collection {
                    nested_depth += 1;
                    if element.name().as_ref() == b"value"
                        && name_attribute(&element).as_deref() == Some("value")
                    {
                        capturing = true;
                        current.clear();
                    }
                } else if element.name().as_ref() == b"collection"
                    && name_attribute(&element).as_deref() == Some(collection_name)
                {
                    in_collection = true;
                    nested_depth = 0;
                }
            }
            Ok(Event::Text(text)) if capturing => {
                if let Ok(unescaped) = text.unescape() {
                    current.push_str(&unescaped);
                }
            }
            Ok(Event::End(element)) => {
                if in_collection {
                    if capturing && element.name().as_ref() == b"value" {
                        capturing = false;
                        if !current.trim().is_empty() {
                            payloads.push(current.trim().to_string());
                        }
                    }
                    if nested_depth == 0 {
                        in_collection = false;
                    } else {
                        nested_depth -= 1;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                debug!("settings XML not well-formed: {err}");
                break;
            }
            Ok(_) => {}
        }
    }

    payloads
}

fn name_attribute(element: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    element
        .try_get_attribute("name")
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// The payload is a JSON array of `{Key, Value}` pairs. Path comes from
/// `Value.LocalProperties.FullPath` with `Key` as the fallback identifier;
/// only existing solution/project files survive.
fn parse_containers_payload(json: &str) -> Vec<RawEntry> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(json) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let value = item.get("Value");
            let full_path = value
                .and_then(|v| v.get("LocalProperties"))
                .and_then(|props| props.get("FullPath"))
                .and_then(Value::as_str);
            let key = item.get("Key").and_then(Value::as_str);
            let path = PathBuf::from(full_path.or(key)?);

            if !is_solution_or_project(&path) || !path.is_file() {
                return None;
            }

            let last_accessed = value
                .and_then(|v| v.get("LastAccessed"))
                .and_then(probe::parse_timestamp_value);

            Some(RawEntry {
                path,
                last_accessed,
            })
        })
        .collect()
}

fn is_solution_or_project(path: &Path) -> bool {
    PROJECT_EXTENSIONS
        .iter()
        .any(|ext| has_extension(path, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Build a settings document with the payload XML-escaped the way the
    /// product writes it.
    fn settings_xml(collection: &str, payload: &str) -> String {
        let escaped = payload.replace('&', "&amp;").replace('"', "&quot;");
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<content>
  <collection name="UnrelatedCollection">
    <value name="value">ignored</value>
  </collection>
  <collection name="{collection}">
    <value name="count">2</value>
    <value name="value">{escaped}</value>
  </collection>
</content>"#
        )
    }

    fn container_payload(paths: &[(&str, &str)]) -> String {
        let items: Vec<String> = paths
            .iter()
            .map(|(path, stamp)| {
                let path = path.replace('\\', "\\\\");
                format!(
                    r#"{{"Key":"{path}","Value":{{"LocalProperties":{{"FullPath":"{path}"}},"LastAccessed":"{stamp}"}}}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn extracts_entries_from_offline_collection() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("First.sln");
        let second = dir.path().join("Second.sln");
        fs::write(&first, "").unwrap();
        fs::write(&second, "").unwrap();

        let payload = container_payload(&[
            (first.to_str().unwrap(), "2024-01-01T08:00:00Z"),
            (second.to_str().unwrap(), "2024-03-01T08:00:00Z"),
        ]);
        let xml = settings_xml(COLLECTION_KEY, &payload);

        let entries = parse_private_settings(&xml);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.last_accessed.is_some()));
    }

    #[test]
    fn other_collections_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let sln = dir.path().join("App.sln");
        fs::write(&sln, "").unwrap();

        let payload = container_payload(&[(sln.to_str().unwrap(), "2024-01-01T08:00:00Z")]);
        let xml = settings_xml("CodeContainers.Roaming", &payload);

        assert!(parse_private_settings(&xml).is_empty());
    }

    #[test]
    fn vanished_and_non_project_paths_are_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("Kept.csproj");
        let wrong_type = dir.path().join("notes.txt");
        fs::write(&kept, "").unwrap();
        fs::write(&wrong_type, "").unwrap();

        let payload = container_payload(&[
            (kept.to_str().unwrap(), "2024-01-01T08:00:00Z"),
            (wrong_type.to_str().unwrap(), "2024-01-01T08:00:00Z"),
            (
                dir.path().join("Gone.sln").to_str().unwrap(),
                "2024-01-01T08:00:00Z",
            ),
        ]);
        let xml = settings_xml(COLLECTION_KEY, &payload);

        let entries = parse_private_settings(&xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, kept);
    }

    #[test]
    fn key_is_the_fallback_path() {
        let dir = tempfile::tempdir().unwrap();
        let sln = dir.path().join("KeyOnly.sln");
        fs::write(&sln, "").unwrap();

        let payload = format!(
            r#"[{{"Key":"{}","Value":{{"LastAccessed":"2024-01-01T08:00:00Z"}}}}]"#,
            sln.to_str().unwrap().replace('\\', "\\\\")
        );
        let xml = settings_xml(COLLECTION_KEY, &payload);

        let entries = parse_private_settings(&xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, sln);
    }

    #[test]
    fn missing_timestamp_is_left_unset() {
        let dir = tempfile::tempdir().unwrap();
        let sln = dir.path().join("NoStamp.sln");
        fs::write(&sln, "").unwrap();

        let payload = format!(
            r#"[{{"Key":"{}","Value":{{"LocalProperties":{{"FullPath":"{}"}}}}}}]"#,
            sln.to_str().unwrap().replace('\\', "\\\\"),
            sln.to_str().unwrap().replace('\\', "\\\\")
        );
        let xml = settings_xml(COLLECTION_KEY, &payload);

        let entries = parse_private_settings(&xml);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].last_accessed.is_none());
    }

    #[test]
    fn malformed_xml_contributes_nothing() {
        assert!(parse_private_settings("<content><collection name=").is_empty());
        assert!(parse_private_settings("").is_empty());
    }

    #[test]
    fn malformed_embedded_json_contributes_nothing() {
        let xml = settings_xml(COLLECTION_KEY, "{not json");
        assert!(parse_private_settings(&xml).is_empty());
    }
}
