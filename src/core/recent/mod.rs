//! Recent-project recovery.
//!
//! Visual Studio has never kept its MRU in one place: depending on version
//! and migration history the list lives in an XML settings file with an
//! embedded JSON payload, in one of several standalone JSON indexes, or in
//! registry MRU keys. The engine tries the primary XML source across every
//! candidate hive directory first; only when that whole family comes up
//! empty does it accumulate from the fallback sources. Every read and parse
//! is fault-isolated — a broken source contributes nothing and the chain
//! moves on.

pub mod json_index;
pub mod mru;
pub mod probe;
pub mod settings_xml;
pub mod storage;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::instance::{Instance, RecentProject};
use crate::core::paths;

pub use storage::clean_uri_path;

const PRIVATE_SETTINGS_FILE: &str = "ApplicationPrivateSettings.xml";
const RECENTLY_OPENED_FILE: &str = "RecentlyOpened.json";
const RECENT_PROJECTS_FILE: &str = "RecentProjects.json";
const CODE_CONTAINERS_FILE: &str = "CodeContainers.json";

/// One entry as recovered from a single source, before normalization.
/// Sources that carry no timestamp leave it unset; the merge fills it from
/// the filesystem.
#[derive(Debug, Clone)]
pub(crate) struct RawEntry {
    pub path: PathBuf,
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Recover the recent projects of one instance, newest first, at most
/// `limit` entries. Best-effort: never errors, worst case returns nothing.
pub fn recent_projects(instance: &Instance, limit: usize) -> Vec<RecentProject> {
    if instance.is_code() {
        storage::code_recent_projects(instance, limit)
    } else {
        vs_recent_projects_in(&paths::visual_studio_appdata_root(), instance, limit)
    }
}

/// Visual Studio recovery against an explicit application-data root.
pub fn vs_recent_projects_in(
    appdata_root: &Path,
    instance: &Instance,
    limit: usize,
) -> Vec<RecentProject> {
    let candidates = candidate_hive_dirs(appdata_root, instance.major_version());

    // Primary family: the XML settings file, across every candidate hive.
    let mut entries: Vec<RawEntry> = candidates
        .iter()
        .flat_map(|dir| settings_xml::parse_private_settings_file(&dir.join(PRIVATE_SETTINGS_FILE)))
        .collect();

    // Fallback family: only when the primary produced nothing anywhere.
    // All fallback sources accumulate.
    if entries.is_empty() {
        debug!("primary settings source empty, trying fallback indexes");
        for dir in &candidates {
            entries.extend(json_index::parse_recently_opened_file(
                &dir.join(RECENTLY_OPENED_FILE),
            ));
            entries.extend(json_index::parse_recent_projects_file(
                &dir.join(RECENT_PROJECTS_FILE),
            ));
            entries.extend(json_index::parse_code_containers_file(
                &dir.join(CODE_CONTAINERS_FILE),
            ));
        }
        entries.extend(mru::registry_recent_projects(
            instance.major_version(),
            &instance.instance_id,
        ));
    }

    merge_latest(entries, limit)
}

/// Directories under the VS app-data root for this major version, any root
/// suffix included (`17.0`, `17.0_abc123`, `17.0_abc123Exp`, ...).
fn candidate_hive_dirs(appdata_root: &Path, major: u32) -> Vec<PathBuf> {
    let prefix = format!("{major}.0");

    let Ok(entries) = std::fs::read_dir(appdata_root) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    dirs
}

/// Normalize, deduplicate by case-insensitive path keeping the latest
/// timestamp, drop vanished paths, rank newest first, truncate.
pub(crate) fn merge_latest(entries: Vec<RawEntry>, limit: usize) -> Vec<RecentProject> {
    let mut by_path: HashMap<String, RecentProject> = HashMap::new();

    for project in entries.into_iter().map(normalize) {
        let key = dedup_key(&project.path);
        match by_path.get_mut(&key) {
            Some(existing) if existing.last_accessed >= project.last_accessed => {}
            Some(existing) => *existing = project,
            None => {
                by_path.insert(key, project);
            }
        }
    }

    let mut projects: Vec<RecentProject> =
        by_path.into_values().filter(RecentProject::exists).collect();
    rank_and_truncate(&mut projects, limit);
    projects
}

/// Deduplicate keeping the first occurrence per path, then rank. Used by the
/// editor path, where source order already encodes recency preference.
pub(crate) fn merge_first_seen(entries: Vec<RawEntry>, limit: usize) -> Vec<RecentProject> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut projects: Vec<RecentProject> = Vec::new();

    for project in entries.into_iter().map(normalize) {
        if seen.insert(dedup_key(&project.path)) && project.exists() {
            projects.push(project);
        }
    }

    rank_and_truncate(&mut projects, limit);
    projects
}

fn rank_and_truncate(projects: &mut Vec<RecentProject>, limit: usize) {
    projects.sort_by(|a, b| {
        b.last_accessed
            .cmp(&a.last_accessed)
            .then_with(|| a.name.cmp(&b.name))
    });
    projects.truncate(limit);
}

fn normalize(entry: RawEntry) -> RecentProject {
    let name = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| entry.path.to_string_lossy().to_string());
    let last_accessed = entry
        .last_accessed
        .or_else(|| fs_last_access(&entry.path))
        .unwrap_or(DateTime::UNIX_EPOCH);

    RecentProject {
        name,
        path: entry.path,
        last_accessed,
    }
}

fn dedup_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Filesystem last-access time, the stand-in timestamp for sources that
/// carry none of their own.
pub(crate) fn fs_last_access(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|meta| meta.accessed())
        .map(DateTime::<Utc>::from)
        .ok()
}
