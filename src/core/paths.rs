//! Well-known filesystem locations the scanners probe.
//!
//! Every function returns a plain `PathBuf`; callers that need a different
//! root (tests, portable installs) use the `_in`-suffixed entry points of
//! the individual services instead of overriding anything here.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "DevHive";

/// `vswhere.exe` ships with the Visual Studio Installer at a fixed path.
pub fn vswhere_path() -> PathBuf {
    program_files_x86()
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe")
}

/// Per-user Visual Studio application-data root; hive directories
/// (`17.0_<instanceId><suffix>`) live directly underneath.
pub fn visual_studio_appdata_root() -> PathBuf {
    local_data_dir().join("Microsoft").join("VisualStudio")
}

/// Candidate executable locations for VS Code / VS Code Insiders,
/// most specific first.
pub fn code_executable_candidates(insiders: bool) -> Vec<PathBuf> {
    if cfg!(windows) {
        let (dir, exe) = if insiders {
            ("Microsoft VS Code Insiders", "Code - Insiders.exe")
        } else {
            ("Microsoft VS Code", "Code.exe")
        };
        vec![
            local_data_dir().join("Programs").join(dir).join(exe),
            program_files().join(dir).join(exe),
        ]
    } else {
        let name = if insiders { "code-insiders" } else { "code" };
        vec![
            PathBuf::from("/usr/share").join(name).join(name),
            PathBuf::from("/usr/local/bin").join(name),
            PathBuf::from("/usr/bin").join(name),
        ]
    }
}

/// Per-channel VS Code roaming configuration root (`Code` or
/// `Code - Insiders` under the user's config directory).
pub fn code_config_root(insiders: bool) -> PathBuf {
    let folder = if insiders { "Code - Insiders" } else { "Code" };
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(folder)
}

/// Per-channel VS Code extensions directory under the user's home.
pub fn code_extensions_root(insiders: bool) -> PathBuf {
    let folder = if insiders { ".vscode-insiders" } else { ".vscode" };
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(folder)
        .join("extensions")
}

/// On-disk icon cache shared across scans.
pub fn icon_cache_dir() -> PathBuf {
    local_data_dir().join(APP_DIR_NAME).join("IconCache")
}

/// User-preference store location.
pub fn settings_path() -> PathBuf {
    local_data_dir().join(APP_DIR_NAME).join("settings.json")
}

fn local_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn program_files() -> PathBuf {
    std::env::var_os("ProgramFiles")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
}

fn program_files_x86() -> PathBuf {
    std::env::var_os("ProgramFiles(x86)")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"))
}
