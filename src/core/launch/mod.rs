// ─── Launch Dispatcher ───
// Spawns product processes with the correct hive and project arguments.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::core::error::{ToolboxError, ToolboxResult};
use crate::core::instance::Instance;

/// Developer command-prompt flavors shipped under `Common7\Tools`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevShell {
    Cmd,
    PowerShell,
}

/// Start an instance, optionally into a non-default hive.
///
/// Headless installs (Build Tools) have no product executable; for those a
/// file-manager window on the install directory is the only sensible
/// action. Returns immediately after spawning — the caller never waits.
pub fn launch(instance: &Instance, root_suffix: Option<&str>) -> ToolboxResult<()> {
    let Some(product_path) = &instance.product_path else {
        if instance.installation_path.is_dir() {
            return open_file_manager(&instance.installation_path);
        }
        return Err(ToolboxError::InstallPathNotFound(
            instance.installation_path.clone(),
        ));
    };

    if !product_path.is_file() {
        return Err(ToolboxError::ExecutableNotFound(product_path.clone()));
    }

    let args = build_launch_args(None, root_suffix);
    info!("launching {} ({:?})", instance.short_display_name(), product_path);
    spawn_detached(Command::new(product_path).args(&args))
}

/// Start an instance with a project/solution preloaded.
pub fn launch_with_project(
    instance: &Instance,
    project_path: &Path,
    root_suffix: Option<&str>,
) -> ToolboxResult<()> {
    let Some(product_path) = &instance.product_path else {
        return Err(ToolboxError::NotLaunchable(instance.short_display_name()));
    };

    if !product_path.is_file() {
        return Err(ToolboxError::ExecutableNotFound(product_path.clone()));
    }
    if !project_path.exists() {
        return Err(ToolboxError::ProjectNotFound(project_path.to_path_buf()));
    }

    let args = build_launch_args(Some(project_path), root_suffix);
    info!(
        "launching {} with {:?}",
        instance.short_display_name(),
        project_path
    );
    spawn_detached(Command::new(product_path).args(&args))
}

/// Argument list construction, kept pure for testing. The project path goes
/// first; `/rootSuffix <suffix>` follows and is omitted for the default
/// hive.
pub(crate) fn build_launch_args(project: Option<&Path>, root_suffix: Option<&str>) -> Vec<OsString> {
    let mut args = Vec::new();

    if let Some(project) = project {
        args.push(project.as_os_str().to_os_string());
    }

    if let Some(suffix) = root_suffix {
        if !suffix.is_empty() {
            args.push(OsString::from("/rootSuffix"));
            args.push(OsString::from(suffix));
        }
    }

    args
}

/// Resolve the developer shell bootstrap script for an instance.
pub fn dev_shell_script(instance: &Instance, shell: DevShell) -> ToolboxResult<PathBuf> {
    let file = match shell {
        DevShell::Cmd => "VsDevCmd.bat",
        DevShell::PowerShell => "Launch-VsDevShell.ps1",
    };
    let script = instance
        .installation_path
        .join("Common7")
        .join("Tools")
        .join(file);

    if script.is_file() {
        Ok(script)
    } else {
        Err(ToolboxError::DevShellNotFound(script))
    }
}

/// Open a developer command prompt configured for the instance. The install
/// dir is passed explicitly so the script does not fall back to its own
/// tool discovery.
pub fn launch_dev_shell(instance: &Instance, shell: DevShell) -> ToolboxResult<()> {
    let script = dev_shell_script(instance, shell)?;
    let install_dir = instance.installation_path.to_string_lossy().into_owned();

    match shell {
        DevShell::Cmd => {
            let mut install_dir = install_dir;
            if !install_dir.ends_with('\\') {
                install_dir.push('\\');
            }
            spawn_detached(Command::new("cmd.exe").arg("/k").arg(format!(
                "set \"VSINSTALLDIR={}\" && call \"{}\"",
                install_dir,
                script.display()
            )))
        }
        DevShell::PowerShell => spawn_detached(
            Command::new("pwsh.exe").arg("-NoExit").arg("-Command").arg(format!(
                "& '{}' -VsInstallPath '{}'",
                script.display(),
                install_dir
            )),
        ),
    }
}

fn open_file_manager(path: &Path) -> ToolboxResult<()> {
    let mut command = if cfg!(windows) {
        let mut c = Command::new("explorer.exe");
        c.arg(path);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    spawn_detached(&mut command)
}

/// Fire-and-forget spawn: the child is intentionally dropped, never awaited.
fn spawn_detached(command: &mut Command) -> ToolboxResult<()> {
    debug!("spawning {:?}", command);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
        .map_err(|err| ToolboxError::Spawn(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instance::{Edition, ProductVersion};
    use chrono::Utc;
    use std::fs;

    fn instance(product_path: Option<PathBuf>, installation_path: PathBuf) -> Instance {
        Instance {
            instance_id: "abc123".into(),
            installation_path,
            installation_version: "17.9.5".into(),
            display_name: "Visual Studio 2022".into(),
            product_path,
            product: ProductVersion::Vs2022,
            edition: Edition::BuildTools,
            is_prerelease: false,
            install_date: Utc::now(),
            channel_id: String::new(),
            workloads: Vec::new(),
            icon_path: None,
        }
    }

    #[test]
    fn arg_list_covers_all_combinations() {
        assert!(build_launch_args(None, None).is_empty());
        assert!(build_launch_args(None, Some("")).is_empty());

        let suffix_only = build_launch_args(None, Some("Exp"));
        assert_eq!(suffix_only, vec![OsString::from("/rootSuffix"), OsString::from("Exp")]);

        let project = PathBuf::from("/proj/App.sln");
        let both = build_launch_args(Some(&project), Some("Exp"));
        assert_eq!(
            both,
            vec![
                OsString::from("/proj/App.sln"),
                OsString::from("/rootSuffix"),
                OsString::from("Exp"),
            ]
        );

        let project_only = build_launch_args(Some(&project), None);
        assert_eq!(project_only, vec![OsString::from("/proj/App.sln")]);
    }

    #[test]
    fn launch_with_project_rejects_headless_installs() {
        let headless = instance(None, PathBuf::from("/opt/buildtools"));
        let result = launch_with_project(&headless, Path::new("/proj/App.sln"), None);
        assert!(matches!(result, Err(ToolboxError::NotLaunchable(_))));
    }

    #[test]
    fn launch_errors_on_missing_executable() {
        let broken = instance(
            Some(PathBuf::from("/nonexistent/devenv.exe")),
            PathBuf::from("/opt/vs"),
        );
        assert!(matches!(
            launch(&broken, None),
            Err(ToolboxError::ExecutableNotFound(_))
        ));
        assert!(matches!(
            launch_with_project(&broken, Path::new("/proj/App.sln"), None),
            Err(ToolboxError::ExecutableNotFound(_))
        ));
    }

    #[test]
    fn launch_with_project_errors_on_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("devenv.exe");
        fs::write(&exe, "").unwrap();

        let vs = instance(Some(exe), dir.path().to_path_buf());
        let result = launch_with_project(&vs, &dir.path().join("Missing.sln"), None);
        assert!(matches!(result, Err(ToolboxError::ProjectNotFound(_))));
    }

    #[test]
    fn headless_launch_without_install_dir_errors() {
        let gone = instance(None, PathBuf::from("/nonexistent/install"));
        assert!(matches!(
            launch(&gone, None),
            Err(ToolboxError::InstallPathNotFound(_))
        ));
    }

    #[test]
    fn dev_shell_script_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let tools = dir.path().join("Common7").join("Tools");
        fs::create_dir_all(&tools).unwrap();
        fs::write(tools.join("VsDevCmd.bat"), "").unwrap();

        let vs = instance(None, dir.path().to_path_buf());
        assert!(dev_shell_script(&vs, DevShell::Cmd).is_ok());
        assert!(matches!(
            dev_shell_script(&vs, DevShell::PowerShell),
            Err(ToolboxError::DevShellNotFound(_))
        ));
    }
}
