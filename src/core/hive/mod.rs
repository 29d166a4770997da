//! Hive resolution.
//!
//! A Visual Studio instance keeps each isolated configuration set in a
//! directory named `{major}.0_{instanceId}{rootSuffix}` under the per-user
//! application-data root. The suffix selects the hive at launch time; an
//! empty suffix is the default hive, `Exp` the experimental one.

use std::path::Path;

use tracing::debug;

use crate::core::instance::{Hive, Instance, LaunchableInstance};
use crate::core::paths;

/// List the hives of one instance, default first, experimental second,
/// custom hives alphabetically after. Filesystem trouble yields an empty
/// list, never an error.
pub fn hives_for_instance(instance: &Instance) -> Vec<Hive> {
    hives_for_instance_in(&paths::visual_studio_appdata_root(), instance)
}

/// Same, against an explicit application-data root.
pub fn hives_for_instance_in(appdata_root: &Path, instance: &Instance) -> Vec<Hive> {
    if instance.is_code() {
        // The editor keeps one config tree per channel; there is no hive
        // directory convention to enumerate.
        return Vec::new();
    }

    let prefix = format!("{}.0_{}", instance.major_version(), instance.instance_id);

    let Ok(entries) = std::fs::read_dir(appdata_root) else {
        debug!("hive root {:?} is not readable", appdata_root);
        return Vec::new();
    };

    let mut hives: Vec<Hive> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let head = name.get(..prefix.len())?;
            if !head.eq_ignore_ascii_case(&prefix) {
                return None;
            }
            let root_suffix = name[prefix.len()..].to_string();
            Some(Hive {
                name,
                root_suffix,
                data_path: entry.path(),
                instance_id: instance.instance_id.clone(),
            })
        })
        .collect();

    hives.sort_by(|a, b| hive_rank(a).cmp(&hive_rank(b)).then_with(|| {
        a.root_suffix
            .to_ascii_lowercase()
            .cmp(&b.root_suffix.to_ascii_lowercase())
    }));
    hives
}

fn hive_rank(hive: &Hive) -> u8 {
    if hive.is_default() {
        0
    } else if hive.is_experimental() {
        1
    } else {
        2
    }
}

/// Flatten instances into the menu-visible launch targets: one default
/// entry per instance, then one entry per non-default hive.
pub fn launchables(instances: &[Instance]) -> Vec<LaunchableInstance> {
    launchables_in(&paths::visual_studio_appdata_root(), instances)
}

/// Same, against an explicit application-data root.
pub fn launchables_in(appdata_root: &Path, instances: &[Instance]) -> Vec<LaunchableInstance> {
    let mut targets = Vec::new();

    for instance in instances {
        targets.push(LaunchableInstance {
            instance: instance.clone(),
            hive: None,
        });

        for hive in hives_for_instance_in(appdata_root, instance) {
            if !hive.is_default() {
                targets.push(LaunchableInstance {
                    instance: instance.clone(),
                    hive: Some(hive),
                });
            }
        }
    }

    targets
}
