use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use devhive::core::{detect, hive, icon, launch, paths, recent, settings::ToolboxSettings};

#[derive(Parser)]
#[command(name = "devhive", about = "Visual Studio / VS Code instance discovery and launch toolbox")]
struct Cli {
    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover installed instances and their hives.
    Scan,
    /// List the recent projects of one instance.
    Recent {
        instance_id: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Start an instance, optionally with a hive and/or project.
    Launch {
        instance_id: String,
        #[arg(long)]
        root_suffix: Option<String>,
        #[arg(long)]
        project: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = ToolboxSettings::load(&paths::settings_path());

    match cli.command {
        Commands::Scan => scan(&settings, cli.json).await,
        Commands::Recent { instance_id, limit } => {
            recent_projects(&settings, &instance_id, limit, cli.json).await
        }
        Commands::Launch {
            instance_id,
            root_suffix,
            project,
        } => launch_instance(&instance_id, root_suffix.as_deref(), project.as_deref()).await,
    }
}

async fn scan(settings: &ToolboxSettings, json: bool) -> ExitCode {
    if !detect::is_vswhere_available() {
        tracing::info!("vswhere.exe not found; only VS Code channels can be detected");
    }

    let mut instances = detect::discover_instances().await;
    if !settings.include_prerelease {
        instances.retain(|instance| !instance.is_prerelease);
    }
    icon::enrich_icons(&mut instances);

    let targets = hive::launchables(&instances);

    if json {
        match serde_json::to_string_pretty(&targets) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if targets.is_empty() {
        println!("No instances found.");
        return ExitCode::SUCCESS;
    }

    for target in &targets {
        let marker = if target.can_launch() { "" } else { " [headless]" };
        let channel = target.instance.channel_type();
        println!(
            "{:<12} {:<45} {:<18} {}{}",
            target.instance.instance_id,
            target.display_name(),
            target.instance.installation_version,
            channel,
            marker
        );
    }
    println!("{} launch target(s).", targets.len());
    ExitCode::SUCCESS
}

async fn recent_projects(
    settings: &ToolboxSettings,
    instance_id: &str,
    limit: Option<usize>,
    json: bool,
) -> ExitCode {
    let Some(instance) = find_instance(instance_id).await else {
        eprintln!("error: no instance with id {instance_id}");
        return ExitCode::FAILURE;
    };

    let limit = limit.unwrap_or(settings.recent_limit);
    let projects = recent::recent_projects(&instance, limit);

    if json {
        match serde_json::to_string_pretty(&projects) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if projects.is_empty() {
        println!("No recent projects for {}.", instance.short_display_name());
        return ExitCode::SUCCESS;
    }

    for project in &projects {
        println!(
            "{:<30} {:<14} {}  {}",
            project.display_name(),
            project.kind().to_string(),
            project.last_accessed.format("%Y-%m-%d %H:%M"),
            project.path.display()
        );
    }
    ExitCode::SUCCESS
}

async fn launch_instance(
    instance_id: &str,
    root_suffix: Option<&str>,
    project: Option<&std::path::Path>,
) -> ExitCode {
    let Some(instance) = find_instance(instance_id).await else {
        eprintln!("error: no instance with id {instance_id}");
        return ExitCode::FAILURE;
    };

    let result = match project {
        Some(project) => launch::launch_with_project(&instance, project, root_suffix),
        None => launch::launch(&instance, root_suffix),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn find_instance(instance_id: &str) -> Option<devhive::Instance> {
    detect::discover_instances()
        .await
        .into_iter()
        .find(|instance| instance.instance_id.eq_ignore_ascii_case(instance_id))
}
