use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product generations the scanner recognizes — strongly typed, no magic
/// version numbers at call sites.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductVersion {
    Vs2019,
    Vs2022,
    Vs2026,
    Code,
}

impl ProductVersion {
    /// Map an installation version's major component to a generation.
    /// VS 2019 is 16.x, 2022 is 17.x, 2026 is 18.x.
    pub fn from_major(major: u32) -> Option<Self> {
        match major {
            16 => Some(ProductVersion::Vs2019),
            17 => Some(ProductVersion::Vs2022),
            18 => Some(ProductVersion::Vs2026),
            _ => None,
        }
    }

    pub fn year(&self) -> &'static str {
        match self {
            ProductVersion::Vs2019 => "2019",
            ProductVersion::Vs2022 => "2022",
            ProductVersion::Vs2026 => "2026",
            ProductVersion::Code => "Code",
        }
    }
}

/// Installed edition, parsed from the enumeration tool's product id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Edition {
    Community,
    Professional,
    Enterprise,
    BuildTools,
    Code,
    CodeInsiders,
    Unknown,
}

impl Edition {
    /// Case-insensitive substring match against known edition keywords,
    /// first match wins.
    pub fn parse(product_id: &str) -> Self {
        let lower = product_id.to_ascii_lowercase();
        if lower.contains("community") {
            Edition::Community
        } else if lower.contains("professional") {
            Edition::Professional
        } else if lower.contains("enterprise") {
            Edition::Enterprise
        } else if lower.contains("buildtools") {
            Edition::BuildTools
        } else {
            Edition::Unknown
        }
    }
}

impl std::fmt::Display for Edition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Edition::Community => "Community",
            Edition::Professional => "Professional",
            Edition::Enterprise => "Enterprise",
            Edition::BuildTools => "BuildTools",
            Edition::Code => "Code",
            Edition::CodeInsiders => "Code Insiders",
            Edition::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Release channel, parsed from the last dot-segment of the channel id
/// (`VisualStudio.17.Release`, `VSCode.Insiders`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelType {
    Stable,
    Preview,
    Canary,
    IntPreview,
    Unknown,
}

impl ChannelType {
    pub fn parse(channel_id: &str) -> Self {
        let segment = channel_id.rsplit('.').next().unwrap_or("");
        match segment.to_ascii_lowercase().as_str() {
            "release" | "stable" => ChannelType::Stable,
            "preview" | "insiders" => ChannelType::Preview,
            "canary" => ChannelType::Canary,
            "intpreview" => ChannelType::IntPreview,
            _ => ChannelType::Unknown,
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChannelType::Stable => "Stable",
            ChannelType::Preview => "Preview",
            ChannelType::Canary => "Canary",
            ChannelType::IntPreview => "Internal Preview",
            ChannelType::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// One physical product installation as reported by the enumeration tools.
///
/// Rebuilt from scratch on every scan; identity across scans is the
/// `instance_id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: String,
    pub installation_path: PathBuf,
    pub installation_version: String,
    pub display_name: String,
    /// Absent for headless installs (Build Tools).
    pub product_path: Option<PathBuf>,
    pub product: ProductVersion,
    pub edition: Edition,
    pub is_prerelease: bool,
    pub install_date: DateTime<Utc>,
    pub channel_id: String,
    /// VS workload ids, or installed extension ids for VS Code.
    pub workloads: Vec<String>,
    pub icon_path: Option<PathBuf>,
}

impl Instance {
    pub fn major_version(&self) -> u32 {
        major_version(&self.installation_version)
    }

    pub fn channel_type(&self) -> ChannelType {
        ChannelType::parse(&self.channel_id)
    }

    pub fn is_code(&self) -> bool {
        self.product == ProductVersion::Code
    }

    /// Menu-facing name: `Visual Studio {year} {edition}`, or the editor's
    /// own display name for VS Code channels.
    pub fn short_display_name(&self) -> String {
        if self.is_code() {
            self.display_name.clone()
        } else {
            format!("Visual Studio {} {}", self.product.year(), self.edition)
        }
    }

    /// Launchable only when the product executable is present and names the
    /// expected launcher binary for this product. A suffix check, since the
    /// enumeration tool reports Windows-style paths regardless of where the
    /// scan itself runs.
    pub fn can_launch(&self) -> bool {
        let Some(product_path) = &self.product_path else {
            return false;
        };
        let path = product_path.to_string_lossy().to_ascii_lowercase();
        self.expected_launchers()
            .iter()
            .any(|expected| path.ends_with(&expected.to_ascii_lowercase()))
    }

    fn expected_launchers(&self) -> &'static [&'static str] {
        match (self.product, self.edition) {
            (ProductVersion::Code, Edition::CodeInsiders) => {
                &["Code - Insiders.exe", "code-insiders"]
            }
            (ProductVersion::Code, _) => &["Code.exe", "code"],
            _ => &["devenv.exe"],
        }
    }
}

/// An isolated configuration directory belonging to one instance.
///
/// The owning instance is referenced by id only; hives are looked up per
/// instance and never outlive a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hive {
    /// Raw directory name, e.g. `17.0_abc123Exp`.
    pub name: String,
    /// Empty for the default hive, `Exp` for the experimental one.
    pub root_suffix: String,
    pub data_path: PathBuf,
    pub instance_id: String,
}

impl Hive {
    pub fn is_default(&self) -> bool {
        self.root_suffix.is_empty()
    }

    pub fn is_experimental(&self) -> bool {
        self.root_suffix.eq_ignore_ascii_case("Exp")
    }

    pub fn display_name(&self) -> &str {
        if self.is_default() {
            "Default"
        } else if self.is_experimental() {
            "Experimental"
        } else {
            &self.root_suffix
        }
    }
}

/// File-type classification of a recovered recent project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectKind {
    Solution,
    CSharpProject,
    VbProject,
    FSharpProject,
    CppProject,
    Folder,
    Project,
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectKind::Solution => "Solution",
            ProjectKind::CSharpProject => "C# Project",
            ProjectKind::VbProject => "VB.NET Project",
            ProjectKind::FSharpProject => "F# Project",
            ProjectKind::CppProject => "C++ Project",
            ProjectKind::Folder => "Folder",
            ProjectKind::Project => "Project",
        };
        write!(f, "{name}")
    }
}

/// A project/workspace recovered from an instance's persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentProject {
    pub name: String,
    pub path: PathBuf,
    pub last_accessed: DateTime<Utc>,
}

impl RecentProject {
    /// Classified from the path suffix; an existing extensionless directory
    /// is a folder workspace.
    pub fn kind(&self) -> ProjectKind {
        if has_extension(&self.path, "sln") {
            ProjectKind::Solution
        } else if has_extension(&self.path, "csproj") {
            ProjectKind::CSharpProject
        } else if has_extension(&self.path, "vbproj") {
            ProjectKind::VbProject
        } else if has_extension(&self.path, "fsproj") {
            ProjectKind::FSharpProject
        } else if has_extension(&self.path, "vcxproj") {
            ProjectKind::CppProject
        } else if self.path.is_dir() {
            ProjectKind::Folder
        } else {
            ProjectKind::Project
        }
    }

    /// Recomputed live — stale metadata routinely points at deleted paths.
    pub fn exists(&self) -> bool {
        self.path.is_file() || self.path.is_dir()
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// One menu-visible launch target: an instance paired with at most one
/// non-default hive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchableInstance {
    pub instance: Instance,
    pub hive: Option<Hive>,
}

impl LaunchableInstance {
    pub fn is_default_hive(&self) -> bool {
        self.hive.as_ref().map_or(true, Hive::is_default)
    }

    pub fn root_suffix(&self) -> Option<&str> {
        self.hive.as_ref().map(|h| h.root_suffix.as_str())
    }

    pub fn display_name(&self) -> String {
        match &self.hive {
            Some(hive) if !hive.is_default() => {
                format!("{} ({})", self.instance.short_display_name(), hive.display_name())
            }
            _ => self.instance.short_display_name(),
        }
    }

    pub fn can_launch(&self) -> bool {
        self.instance.can_launch()
    }
}

/// Extract the major component of a dotted version string.
/// Malformed input yields the sentinel `0`, never an error.
pub fn major_version(version: &str) -> u32 {
    version
        .split('.')
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
