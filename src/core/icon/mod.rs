//! Icon enrichment.
//!
//! Purely cosmetic: each instance gets an icon file cached under a
//! deterministic per-instance path so the presentation layer can show it
//! without touching the install tree again. Extraction is a plain copy of
//! the first icon asset found near the product executable; a miss leaves
//! the instance without an icon and never disturbs detection.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::instance::Instance;
use crate::core::paths;

/// Attach cached icons to every instance, extracting on cache misses.
pub fn enrich_icons(instances: &mut [Instance]) {
    enrich_icons_in(&paths::icon_cache_dir(), instances);
}

/// Same, against an explicit cache directory.
pub fn enrich_icons_in(cache_dir: &Path, instances: &mut [Instance]) {
    if std::fs::create_dir_all(cache_dir).is_err() {
        debug!("icon cache {:?} is not writable", cache_dir);
        return;
    }

    for instance in instances {
        instance.icon_path = cached_or_extract(cache_dir, instance);
    }
}

fn cached_or_extract(cache_dir: &Path, instance: &Instance) -> Option<PathBuf> {
    let cache_path = cache_dir.join(format!("{}.ico", instance.instance_id));
    if cache_path.is_file() {
        return Some(cache_path);
    }

    for candidate in icon_candidates(instance) {
        if candidate.is_file() && std::fs::copy(&candidate, &cache_path).is_ok() {
            return Some(cache_path);
        }
    }

    None
}

/// Icon assets shipped with the products, most likely location first.
fn icon_candidates(instance: &Instance) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(exe) = &instance.product_path {
        candidates.push(exe.with_extension("ico"));
    }

    if instance.is_code() {
        candidates.push(
            instance
                .installation_path
                .join("resources")
                .join("app")
                .join("resources")
                .join("win32")
                .join("code.ico"),
        );
    } else {
        candidates.push(
            instance
                .installation_path
                .join("Common7")
                .join("IDE")
                .join("devenv.ico"),
        );
        candidates.push(instance.installation_path.join("devenv.ico"));
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instance::{Edition, ProductVersion};
    use chrono::Utc;
    use std::fs;

    fn code_instance(install: &Path) -> Instance {
        Instance {
            instance_id: "vscode".into(),
            installation_path: install.to_path_buf(),
            installation_version: "1.92.0".into(),
            display_name: "Visual Studio Code".into(),
            product_path: Some(install.join("Code.exe")),
            product: ProductVersion::Code,
            edition: Edition::Code,
            is_prerelease: false,
            install_date: Utc::now(),
            channel_id: "VSCode.Stable".into(),
            workloads: Vec::new(),
            icon_path: None,
        }
    }

    #[test]
    fn extracts_shipped_icon_into_cache() {
        let install = tempfile::tempdir().unwrap();
        let asset_dir = install
            .path()
            .join("resources")
            .join("app")
            .join("resources")
            .join("win32");
        fs::create_dir_all(&asset_dir).unwrap();
        fs::write(asset_dir.join("code.ico"), b"icon-bytes").unwrap();

        let cache = tempfile::tempdir().unwrap();
        let mut instances = vec![code_instance(install.path())];
        enrich_icons_in(cache.path(), &mut instances);

        let icon_path = instances[0].icon_path.as_ref().expect("icon cached");
        assert_eq!(icon_path, &cache.path().join("vscode.ico"));
        assert_eq!(fs::read(icon_path).unwrap(), b"icon-bytes");
    }

    #[test]
    fn cache_hit_skips_extraction() {
        let cache = tempfile::tempdir().unwrap();
        fs::write(cache.path().join("vscode.ico"), b"cached").unwrap();

        // No install tree at all — only the cache can satisfy this.
        let mut instances = vec![code_instance(Path::new("/nonexistent"))];
        enrich_icons_in(cache.path(), &mut instances);

        let icon_path = instances[0].icon_path.as_ref().expect("cache hit");
        assert_eq!(fs::read(icon_path).unwrap(), b"cached");
    }

    #[test]
    fn total_failure_leaves_icon_unset() {
        let cache = tempfile::tempdir().unwrap();
        let mut instances = vec![code_instance(Path::new("/nonexistent"))];
        enrich_icons_in(cache.path(), &mut instances);
        assert!(instances[0].icon_path.is_none());
    }
}
