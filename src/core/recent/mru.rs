//! Registry-backed MRU lists, the last-resort recent-project source.
//!
//! Older product versions keep most-recently-used lists under a handful of
//! per-version, per-instance key locations in the user registry. Values may
//! be a plain path or a pipe-delimited compound string that buries the path
//! between metadata fields. Windows-only by nature; other platforms compile
//! this source to an empty result.

use crate::core::recent::RawEntry;

/// Key-path templates, relative to HKEY_CURRENT_USER, in probe order.
#[cfg_attr(not(windows), allow(dead_code))]
fn mru_key_paths(major: u32, instance_id: &str) -> Vec<String> {
    vec![
        format!(r"Software\Microsoft\VisualStudio\{major}.0_{instance_id}\MRUItems"),
        format!(r"Software\Microsoft\VisualStudio\{major}.0_{instance_id}\ProjectMRUList"),
        format!(r"Software\Microsoft\VisualStudio\{major}.0_{instance_id}\FileMRUList"),
        format!(r"Software\Microsoft\VisualStudio\{major}.0\ProjectMRUList"),
        format!(r"Software\Microsoft\VisualStudio\{major}.0_{instance_id}_Config\MRU"),
        format!(r"Software\Microsoft\VisualStudio\{major}.0_{instance_id}_Config\FileMRUList"),
        format!(r"Software\Microsoft\VisualStudio\{major}.0_{instance_id}_Config\ProjectMRUList"),
    ]
}

/// Isolate a path from a stored MRU value. Compound values are
/// pipe-delimited; the segment that looks like a drive-lettered solution or
/// project path wins.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn extract_path_from_value(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    if value.contains('|') {
        return value
            .split('|')
            .map(str::trim)
            .find(|part| is_drive_lettered(part) && has_project_suffix(part))
            .map(str::to_string);
    }

    Some(value.trim().to_string())
}

#[cfg_attr(not(windows), allow(dead_code))]
fn is_drive_lettered(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() > 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg_attr(not(windows), allow(dead_code))]
fn has_project_suffix(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".sln") || lower.ends_with(".csproj")
}

#[cfg(windows)]
pub(crate) fn registry_recent_projects(major: u32, instance_id: &str) -> Vec<RawEntry> {
    use std::path::PathBuf;

    use tracing::debug;
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::types::FromRegValue;
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let mut entries = Vec::new();

    for key_path in mru_key_paths(major, instance_id) {
        let Ok(key) = hkcu.open_subkey(&key_path) else {
            continue;
        };
        debug!("reading MRU values under {key_path}");

        for value in key.enum_values().filter_map(Result::ok) {
            let (_, data) = value;
            let Ok(text) = String::from_reg_value(&data) else {
                continue;
            };
            let Some(extracted) = extract_path_from_value(&text) else {
                continue;
            };
            if !has_project_suffix(&extracted) {
                continue;
            }

            let path = PathBuf::from(extracted);
            if path.is_file() {
                entries.push(RawEntry {
                    path,
                    last_accessed: None,
                });
            }
        }
    }

    entries
}

#[cfg(not(windows))]
pub(crate) fn registry_recent_projects(_major: u32, _instance_id: &str) -> Vec<RawEntry> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through_trimmed() {
        assert_eq!(
            extract_path_from_value(r" C:\proj\App.sln "),
            Some(r"C:\proj\App.sln".to_string())
        );
        assert_eq!(extract_path_from_value(""), None);
    }

    #[test]
    fn compound_values_yield_the_project_segment() {
        let value = r"C:\proj\App.sln|{guid-1234}|App";
        assert_eq!(
            extract_path_from_value(value),
            Some(r"C:\proj\App.sln".to_string())
        );

        let reversed = r"{guid-1234}|App|C:\proj\App.csproj";
        assert_eq!(
            extract_path_from_value(reversed),
            Some(r"C:\proj\App.csproj".to_string())
        );
    }

    #[test]
    fn compound_without_recognized_segment_yields_nothing() {
        assert_eq!(extract_path_from_value("{guid}|App|notes.txt"), None);
        assert_eq!(extract_path_from_value(r"{guid}|C:\proj\readme.md"), None);
    }

    #[test]
    fn key_paths_cover_instance_and_config_hives() {
        let paths = mru_key_paths(17, "abc123");
        assert_eq!(paths.len(), 7);
        assert!(paths[0].ends_with(r"17.0_abc123\MRUItems"));
        assert!(paths[3].ends_with(r"17.0\ProjectMRUList"));
        assert!(paths.iter().any(|p| p.contains("_Config")));
    }

    #[cfg(not(windows))]
    #[test]
    fn non_windows_registry_source_is_empty() {
        assert!(registry_recent_projects(17, "abc123").is_empty());
    }
}
