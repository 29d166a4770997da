use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::instance::{major_version, Edition, Instance, ProductVersion};
use crate::core::paths;

use super::InstanceSource;

/// Enumerates Visual Studio installations through `vswhere.exe`.
pub struct VswhereSource {
    executable: PathBuf,
}

/// Raw record as emitted by `vswhere -format json`. Field names arrive in
/// camelCase from current tool builds and PascalCase from some older ones.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VswhereRecord {
    #[serde(alias = "InstanceId")]
    instance_id: String,
    #[serde(alias = "InstallationPath")]
    installation_path: PathBuf,
    #[serde(alias = "InstallationVersion")]
    installation_version: String,
    #[serde(default, alias = "DisplayName")]
    display_name: String,
    #[serde(default, alias = "ProductPath")]
    product_path: Option<PathBuf>,
    #[serde(default, alias = "ProductId")]
    product_id: String,
    #[serde(default, alias = "IsPrerelease")]
    is_prerelease: bool,
    #[serde(default, alias = "InstallDate")]
    install_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "ChannelId")]
    channel_id: Option<String>,
}

impl VswhereSource {
    pub fn new() -> Self {
        Self {
            executable: paths::vswhere_path(),
        }
    }

    /// Use a different tool location (tests, portable setups).
    pub fn with_executable(executable: PathBuf) -> Self {
        Self { executable }
    }

    async fn run_vswhere(&self) -> Option<String> {
        let output = tokio::process::Command::new(&self.executable)
            .args(["-all", "-prerelease", "-products", "*", "-format", "json", "-utf8"])
            .output()
            .await;

        match output {
            Ok(output) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            Err(err) => {
                warn!("vswhere invocation failed: {err}");
                None
            }
        }
    }

    /// Parse the tool's stdout into instances. Each record is mapped in
    /// isolation so one malformed entry cannot sink the rest.
    fn parse_records(json: &str) -> Vec<Instance> {
        let records: Vec<serde_json::Value> = match serde_json::from_str(json) {
            Ok(records) => records,
            Err(err) => {
                warn!("vswhere output is not a JSON array: {err}");
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<VswhereRecord>(value) {
                Ok(record) => map_record(record),
                Err(err) => {
                    warn!("skipping unmappable vswhere record: {err}");
                    None
                }
            })
            .collect()
    }
}

impl Default for VswhereSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstanceSource for VswhereSource {
    fn available(&self) -> bool {
        self.executable.is_file()
    }

    async fn discover(&self) -> Vec<Instance> {
        if !self.available() {
            debug!("vswhere.exe not found at {:?}", self.executable);
            return Vec::new();
        }

        let Some(json) = self.run_vswhere().await else {
            return Vec::new();
        };
        if json.trim().is_empty() {
            return Vec::new();
        }

        let instances = Self::parse_records(&json);
        debug!("vswhere reported {} supported instance(s)", instances.len());
        instances
    }
}

/// Keep only supported generations; versions that do not parse are dropped
/// along with out-of-range majors.
fn map_record(record: VswhereRecord) -> Option<Instance> {
    let major = major_version(&record.installation_version);
    let product = ProductVersion::from_major(major)?;

    Some(Instance {
        instance_id: record.instance_id,
        installation_path: record.installation_path,
        installation_version: record.installation_version,
        display_name: record.display_name,
        product_path: record.product_path,
        product,
        edition: Edition::parse(&record.product_id),
        is_prerelease: record.is_prerelease,
        install_date: record.install_date.unwrap_or_else(Utc::now),
        channel_id: record.channel_id.unwrap_or_default(),
        workloads: Vec::new(),
        icon_path: None,
    })
}
