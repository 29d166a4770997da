//! VS Code recent-workspace recovery.
//!
//! The editor keeps its opened-paths history in `storage.json` under the
//! per-channel roaming config root, as `file://` URIs spread over three
//! independently-evolved lists plus the last-active-window record. URIs are
//! decoded to native paths and validated against the filesystem; entries
//! carry no timestamps of their own, so recency comes from file metadata.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::core::instance::{Edition, Instance, RecentProject};
use crate::core::paths;
use crate::core::recent::{merge_first_seen, RawEntry};

/// Recover recent workspaces for one editor channel.
pub(crate) fn code_recent_projects(instance: &Instance, limit: usize) -> Vec<RecentProject> {
    let insiders = instance.edition == Edition::CodeInsiders;
    code_recent_projects_in(&paths::code_config_root(insiders), limit)
}

/// Same, against an explicit per-channel config root.
pub fn code_recent_projects_in(config_root: &Path, limit: usize) -> Vec<RecentProject> {
    let primary = config_root
        .join("User")
        .join("globalStorage")
        .join("storage.json");
    let fallback = config_root.join("storage.json");

    let mut entries = parse_storage_file(&primary);
    if entries.is_empty() {
        entries = parse_storage_file(&fallback);
    }

    merge_first_seen(entries, limit)
}

fn parse_storage_file(path: &Path) -> Vec<RawEntry> {
    let Ok(text) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let Ok(root) = serde_json::from_str::<Value>(&text) else {
        return Vec::new();
    };
    parse_storage(&root)
}

/// Pull every known opened-path list out of one storage document.
pub(crate) fn parse_storage(root: &Value) -> Vec<RawEntry> {
    let mut entries = Vec::new();

    if let Some(paths_list) = root.get("openedPathsList") {
        // workspaces3 / folders3: flat arrays of URI strings.
        for (list, dirs_only) in [("workspaces3", false), ("folders3", true)] {
            if let Some(items) = paths_list.get(list).and_then(Value::as_array) {
                entries.extend(
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(|uri| existing_uri_entry(uri, dirs_only)),
                );
            }
        }

        // entries: structured records, newer layout.
        if let Some(items) = paths_list.get("entries").and_then(Value::as_array) {
            for item in items {
                let uri = item
                    .get("folderUri")
                    .or_else(|| item.get("fileUri"))
                    .and_then(Value::as_str);
                if let Some(entry) = uri.and_then(|uri| existing_uri_entry(uri, false)) {
                    entries.push(entry);
                }
            }
        }
    }

    // The last active window names one more folder.
    if let Some(folder) = root
        .get("windowsState")
        .and_then(|state| state.get("lastActiveWindow"))
        .and_then(|window| window.get("folder"))
        .and_then(Value::as_str)
    {
        if let Some(entry) = existing_uri_entry(folder, true) {
            entries.push(entry);
        }
    }

    entries
}

fn existing_uri_entry(uri: &str, dirs_only: bool) -> Option<RawEntry> {
    let path = PathBuf::from(clean_uri_path(uri));
    let exists = if dirs_only {
        path.is_dir()
    } else {
        path.is_dir() || path.is_file()
    };
    if !exists {
        return None;
    }
    Some(RawEntry {
        path,
        last_accessed: None,
    })
}

/// Turn a stored `file://` URI into a native path.
///
/// Idempotent: an already-native path comes back unchanged. Handles the
/// leading-slash-before-drive-letter artifact (`/C:/x`) and percent
/// escapes; separators are rewritten to backslashes only for drive-lettered
/// paths, so POSIX paths survive untouched.
pub fn clean_uri_path(uri: &str) -> String {
    let mut path = match uri.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("file://") => uri[7..].to_string(),
        _ => uri.to_string(),
    };

    path = percent_decode_str(&path).decode_utf8_lossy().into_owned();

    // "/C:/folder" → "C:/folder"
    let bytes = path.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'/' && bytes[2] == b':' {
        path.remove(0);
    }

    if is_drive_lettered(&path) {
        path = path.replace('/', "\\");
    }

    path
}

fn is_drive_lettered(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn uri_cleanup_strips_scheme_and_drive_artifact() {
        assert_eq!(clean_uri_path("file:///C:/foo/bar"), r"C:\foo\bar");
        assert_eq!(clean_uri_path("file:///c%3A/foo/bar"), r"c:\foo\bar");
        assert_eq!(clean_uri_path("file:///home/x"), "/home/x");
        assert_eq!(clean_uri_path("file://server/share"), "server/share");
    }

    #[test]
    fn uri_cleanup_is_idempotent_on_native_paths() {
        for native in [r"C:\foo\bar", "/home/x", "relative/dir"] {
            assert_eq!(clean_uri_path(native), native);
            assert_eq!(clean_uri_path(&clean_uri_path(native)), clean_uri_path(native));
        }
    }

    #[test]
    fn uri_cleanup_decodes_percent_escapes() {
        assert_eq!(
            clean_uri_path("file:///home/user/my%20project"),
            "/home/user/my project"
        );
    }

    fn file_uri(path: &Path) -> String {
        format!("file://{}", path.to_str().unwrap().replace('\\', "/"))
    }

    #[test]
    fn storage_collects_workspaces_folders_and_entries() {
        let dir = tempfile::tempdir().unwrap();
        let ws = dir.path().join("proj");
        let folder = dir.path().join("folder-ws");
        let file = dir.path().join("loose.code-workspace");
        fs::create_dir(&ws).unwrap();
        fs::create_dir(&folder).unwrap();
        fs::write(&file, "{}").unwrap();

        let root = json!({
            "openedPathsList": {
                "workspaces3": [file_uri(&ws), "file:///nonexistent/one"],
                "folders3": [file_uri(&folder)],
                "entries": [
                    {"folderUri": file_uri(&ws)},
                    {"fileUri": file_uri(&file)}
                ]
            }
        });

        let entries = parse_storage(&root);
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn folders3_requires_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir.txt");
        fs::write(&file, "").unwrap();

        let root = json!({"openedPathsList": {"folders3": [file_uri(&file)]}});
        assert!(parse_storage(&root).is_empty());
    }

    #[test]
    fn last_active_window_folder_is_included() {
        let dir = tempfile::tempdir().unwrap();
        let active = dir.path().join("active");
        fs::create_dir(&active).unwrap();

        let root = json!({
            "windowsState": {"lastActiveWindow": {"folder": file_uri(&active)}}
        });

        let entries = parse_storage(&root);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, active);
    }

    #[test]
    fn recovery_dedupes_and_classifies_folders() {
        let config = tempfile::tempdir().unwrap();
        let global = config.path().join("User").join("globalStorage");
        fs::create_dir_all(&global).unwrap();

        let projects = tempfile::tempdir().unwrap();
        let ws = projects.path().join("proj");
        fs::create_dir(&ws).unwrap();

        let doc = json!({
            "openedPathsList": {
                "workspaces3": [file_uri(&ws)],
                "folders3": [file_uri(&ws)]
            }
        });
        fs::write(global.join("storage.json"), doc.to_string()).unwrap();

        let recents = code_recent_projects_in(config.path(), 10);
        assert_eq!(recents.len(), 1);
        assert_eq!(recents[0].name, "proj");
        assert_eq!(recents[0].kind(), crate::core::instance::ProjectKind::Folder);
    }

    #[test]
    fn fallback_storage_location_is_used_when_primary_is_silent() {
        let config = tempfile::tempdir().unwrap();
        let projects = tempfile::tempdir().unwrap();
        let ws = projects.path().join("fallback-ws");
        fs::create_dir(&ws).unwrap();

        let doc = json!({"openedPathsList": {"folders3": [file_uri(&ws)]}});
        fs::write(config.path().join("storage.json"), doc.to_string()).unwrap();

        let recents = code_recent_projects_in(config.path(), 10);
        assert_eq!(recents.len(), 1);
        assert_eq!(recents[0].name, "fallback-ws");
    }

    #[test]
    fn limit_truncates_to_most_recent() {
        let config = tempfile::tempdir().unwrap();
        let global = config.path().join("User").join("globalStorage");
        fs::create_dir_all(&global).unwrap();

        let projects = tempfile::tempdir().unwrap();
        let mut uris = Vec::new();
        for name in ["a", "b", "c"] {
            let ws = projects.path().join(name);
            fs::create_dir(&ws).unwrap();
            uris.push(file_uri(&ws));
        }

        let doc = json!({"openedPathsList": {"folders3": uris}});
        fs::write(global.join("storage.json"), doc.to_string()).unwrap();

        let recents = code_recent_projects_in(config.path(), 1);
        assert_eq!(recents.len(), 1);
    }
}
