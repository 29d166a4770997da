use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::instance::{Edition, Instance, ProductVersion};
use crate::core::paths;

use super::InstanceSource;

/// Probes well-known install locations for VS Code and VS Code Insiders.
///
/// There is no enumeration tool for the editor; detection is a plain
/// existence check against a fixed candidate list per channel, the same way
/// the original installers lay files down.
pub struct CodeSource {
    stable_candidates: Vec<PathBuf>,
    insiders_candidates: Vec<PathBuf>,
}

impl CodeSource {
    pub fn new() -> Self {
        Self {
            stable_candidates: paths::code_executable_candidates(false),
            insiders_candidates: paths::code_executable_candidates(true),
        }
    }

    /// Probe explicit executable candidates (tests, portable installs).
    pub fn with_candidates(stable: Vec<PathBuf>, insiders: Vec<PathBuf>) -> Self {
        Self {
            stable_candidates: stable,
            insiders_candidates: insiders,
        }
    }
}

impl Default for CodeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstanceSource for CodeSource {
    fn available(&self) -> bool {
        self.stable_candidates
            .iter()
            .chain(&self.insiders_candidates)
            .any(|p| p.is_file())
    }

    async fn discover(&self) -> Vec<Instance> {
        let mut instances = Vec::new();

        if let Some(exe) = self.stable_candidates.iter().find(|p| p.is_file()) {
            instances.push(build_instance(exe, false, &paths::code_extensions_root(false)));
        }
        if let Some(exe) = self.insiders_candidates.iter().find(|p| p.is_file()) {
            instances.push(build_instance(exe, true, &paths::code_extensions_root(true)));
        }

        debug!("editor probe found {} channel(s)", instances.len());
        instances
    }
}

/// Synthesize an instance for one editor channel. The instance id is a
/// fixed literal per channel, never derived from the binary.
pub(crate) fn build_instance(executable: &Path, insiders: bool, extensions_root: &Path) -> Instance {
    let installation_path = executable
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let (instance_id, display_name, edition, channel_id) = if insiders {
        (
            "vscode-insiders",
            "Visual Studio Code - Insiders",
            Edition::CodeInsiders,
            "VSCode.Insiders",
        )
    } else {
        ("vscode", "Visual Studio Code", Edition::Code, "VSCode.Stable")
    };

    Instance {
        instance_id: instance_id.to_string(),
        installation_path,
        installation_version: read_product_version(executable),
        display_name: display_name.to_string(),
        product_path: Some(executable.to_path_buf()),
        product: ProductVersion::Code,
        edition,
        is_prerelease: insiders,
        install_date: read_install_date(executable),
        channel_id: channel_id.to_string(),
        workloads: list_extension_ids(extensions_root),
        icon_path: None,
    }
}

/// The editor ships its version in `resources/app/package.json` next to the
/// executable; any read failure degrades to "Unknown".
fn read_product_version(executable: &Path) -> String {
    let Some(install_dir) = executable.parent() else {
        return "Unknown".to_string();
    };
    let package_json = install_dir.join("resources").join("app").join("package.json");

    std::fs::read_to_string(&package_json)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|value| value.get("version").and_then(|v| v.as_str()).map(String::from))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Executable creation time stands in for an install date.
fn read_install_date(executable: &Path) -> DateTime<Utc> {
    std::fs::metadata(executable)
        .and_then(|meta| meta.created())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

/// Installed extension identifiers: one per non-hidden subdirectory of the
/// extensions root, with the trailing version segment dropped, deduplicated
/// and sorted.
pub(crate) fn list_extension_ids(extensions_root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(extensions_root) else {
        return Vec::new();
    };

    let ids: BTreeSet<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| !name.starts_with('.'))
        .map(|name| strip_version_segment(&name))
        .collect();

    ids.into_iter().collect()
}

/// `publisher.extension-1.2.3` → `publisher.extension`. Directories with no
/// version-looking tail keep their full name.
fn strip_version_segment(dir_name: &str) -> String {
    match dir_name.rsplit_once('-') {
        Some((id, tail))
            if !id.is_empty() && tail.chars().next().is_some_and(|c| c.is_ascii_digit()) =>
        {
            id.to_string()
        }
        _ => dir_name.to_string(),
    }
}
