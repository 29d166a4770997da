// ─── DevHive Core ───
// Modular backend for Visual Studio / VS Code instance discovery.
//
// Architecture:
//   core/
//     instance/   — Instance, Hive, LaunchableInstance, RecentProject models
//     detect/     — vswhere + VS Code instance enumeration
//     hive/       — per-instance isolated-state directory resolution
//     recent/     — layered recent-project recovery engine
//     launch/     — process spawner (rootSuffix / project / dev shell)
//     icon/       — icon cache enrichment
//     paths       — well-known filesystem roots
//     settings    — explicit user-preference store

pub mod detect;
pub mod error;
pub mod hive;
pub mod icon;
pub mod instance;
pub mod launch;
pub mod paths;
pub mod recent;
pub mod settings;
