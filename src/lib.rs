pub mod core;

pub use crate::core::error::{ToolboxError, ToolboxResult};
pub use crate::core::instance::{
    ChannelType, Edition, Hive, Instance, LaunchableInstance, ProductVersion, ProjectKind,
    RecentProject,
};
