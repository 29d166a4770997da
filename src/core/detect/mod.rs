//! Instance enumeration.
//!
//! Two independent sources feed one scan: the Visual Studio installer's
//! `vswhere.exe` (structured JSON over stdout) and filesystem probing for
//! VS Code channels. Each source is fault-isolated; a scan never fails,
//! it just finds fewer instances.

pub mod code;
pub mod vswhere;

use async_trait::async_trait;

use crate::core::instance::Instance;

pub use code::CodeSource;
pub use vswhere::VswhereSource;

/// One enumeration backend. Discovery is async so the caller can cancel a
/// scan at the external-tool boundary by dropping the future.
#[async_trait]
pub trait InstanceSource: Send + Sync {
    /// Cheap pre-flight check; callers may branch on this before scanning.
    fn available(&self) -> bool;

    /// Best-effort enumeration. Never errors; failures shrink the result.
    async fn discover(&self) -> Vec<Instance>;
}

/// Run all sources and concatenate their results.
pub async fn discover_instances() -> Vec<Instance> {
    let vswhere = VswhereSource::new();
    let code = CodeSource::new();

    let mut instances = vswhere.discover().await;
    instances.extend(code.discover().await);
    instances
}

/// Whether the external enumeration tool is installed at its well-known
/// location. Absence is a signal, not an error.
pub fn is_vswhere_available() -> bool {
    VswhereSource::new().available()
}
