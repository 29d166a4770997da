pub mod model;

pub use model::{
    major_version, ChannelType, Edition, Hive, Instance, LaunchableInstance, ProductVersion,
    ProjectKind, RecentProject,
};
