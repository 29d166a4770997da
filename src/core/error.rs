use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the toolbox backend.
/// Every module returns `Result<T, ToolboxError>`.
///
/// Detection and recovery code absorbs its own failures and degrades to
/// empty results; the variants here surface only where the caller needs
/// actionable feedback (launching, explicit file operations).
#[derive(Debug, Error)]
pub enum ToolboxError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── XML ─────────────────────────────────────────────
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Launch preconditions ────────────────────────────
    #[error("Executable not found: {0}")]
    ExecutableNotFound(PathBuf),

    #[error("Project file not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("Installation path not found: {0}")]
    InstallPathNotFound(PathBuf),

    #[error("{0} has no launchable executable")]
    NotLaunchable(String),

    #[error("Dev shell script not found: {0}")]
    DevShellNotFound(PathBuf),

    #[error("Failed to spawn process: {0}")]
    Spawn(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type ToolboxResult<T> = Result<T, ToolboxError>;

impl From<std::io::Error> for ToolboxError {
    fn from(source: std::io::Error) -> Self {
        ToolboxError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
