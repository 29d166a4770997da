//! Fallback recent-project sources: the standalone JSON indexes that
//! different product versions scattered through the hive directory.
//!
//! None of these files has a stable schema, so every parser probes multiple
//! property spellings and accepts entries that are bare strings where a
//! version wrote them that way. All parsers are schema-tolerant, not
//! schema-strict: unknown shapes contribute nothing instead of failing.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::instance::model::has_extension;
use crate::core::recent::{probe, RawEntry};

/// Property names under which the entry list of `RecentlyOpened.json` has
/// been observed, newest spelling first.
const ENTRY_LIST_KEYS: [&str; 6] = ["Entries", "entries", "Items", "items", "Projects", "projects"];

/// `RecentlyOpened.json`: an object carrying an entry list under one of
/// several names, or sometimes the bare array itself.
pub(crate) fn parse_recently_opened_file(path: &Path) -> Vec<RawEntry> {
    read_json(path).map_or_else(Vec::new, |root| parse_recently_opened(&root))
}

pub(crate) fn parse_recently_opened(root: &Value) -> Vec<RawEntry> {
    let mut entries = Vec::new();

    if let Some(list) = probe::first_present(root, &ENTRY_LIST_KEYS).and_then(Value::as_array) {
        entries.extend(list.iter().filter_map(existing_entry));
    }

    if let Some(list) = root.as_array() {
        entries.extend(list.iter().filter_map(existing_entry));
    }

    entries
}

/// `RecentProjects.json`: nested arrays of objects, recursively flattened.
/// Only solution and C# project files are trusted from this source.
pub(crate) fn parse_recent_projects_file(path: &Path) -> Vec<RawEntry> {
    read_json(path).map_or_else(Vec::new, |root| {
        let mut entries = Vec::new();
        collect_project_entries(&root, &mut entries);
        entries
    })
}

fn collect_project_entries(element: &Value, entries: &mut Vec<RawEntry>) {
    match element {
        Value::Object(_) => {
            let Some(path) = probe::entry_path(element).map(PathBuf::from) else {
                return;
            };
            if (has_extension(&path, "sln") || has_extension(&path, "csproj")) && path.is_file() {
                entries.push(RawEntry {
                    last_accessed: probe::entry_timestamp(element),
                    path,
                });
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_project_entries(item, entries);
            }
        }
        _ => {}
    }
}

/// `CodeContainers.json`: a top-level `CodeContainers` array whose entries
/// nest the path under `LocalProperties.FullPath` (or a plain `Path`).
pub(crate) fn parse_code_containers_file(path: &Path) -> Vec<RawEntry> {
    read_json(path).map_or_else(Vec::new, |root| parse_code_containers(&root))
}

pub(crate) fn parse_code_containers(root: &Value) -> Vec<RawEntry> {
    let Some(containers) = root.get("CodeContainers").and_then(Value::as_array) else {
        return Vec::new();
    };

    containers
        .iter()
        .filter_map(|container| {
            let nested = container
                .get("LocalProperties")
                .and_then(|props| props.get("FullPath"))
                .and_then(Value::as_str);
            let direct = container.get("Path").and_then(Value::as_str);
            let path = PathBuf::from(nested.or(direct)?);

            if !path.is_file() && !path.is_dir() {
                return None;
            }

            let last_accessed = container
                .get("LastAccessed")
                .and_then(probe::parse_timestamp_value);

            Some(RawEntry {
                path,
                last_accessed,
            })
        })
        .collect()
}

/// An entry from a loose index: any probed path that still exists as a file
/// or directory.
fn existing_entry(entry: &Value) -> Option<RawEntry> {
    let path = PathBuf::from(probe::entry_path(entry)?);
    if !path.is_file() && !path.is_dir() {
        return None;
    }
    Some(RawEntry {
        last_accessed: probe::entry_timestamp(entry),
        path,
    })
}

fn read_json(path: &Path) -> Option<Value> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}
