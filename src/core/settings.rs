//! User preferences.
//!
//! An explicitly constructed, explicitly passed value — no process-wide
//! singleton. Loading never fails (defaults cover every error) and saving
//! is best-effort, mirroring how instance metadata persistence behaves
//! elsewhere in the crate.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{ToolboxError, ToolboxResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolboxSettings {
    /// Include prerelease channels in scan results.
    pub include_prerelease: bool,
    /// Default cap for recovered recent projects.
    pub recent_limit: usize,
}

impl Default for ToolboxSettings {
    fn default() -> Self {
        Self {
            include_prerelease: true,
            recent_limit: 10,
        }
    }
}

impl ToolboxSettings {
    /// Read settings from disk; any failure yields the defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!("settings file {:?} is malformed, using defaults: {err}", path);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist settings, creating the parent directory when needed.
    pub fn save(&self, path: &Path) -> ToolboxResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ToolboxError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ToolboxError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
