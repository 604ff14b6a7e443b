//! mg: generate OpenShift resources from component specs and apply them.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod flags;

use commands::create::KindArg;
use flags::CommonFlags;

#[derive(Parser)]
#[command(name = "mg")]
#[command(about = "Generate and reconcile OpenShift resources from component specs", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// User config file
    #[arg(long, env = "MG_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage a component in a development namespace
    Dev {
        #[command(subcommand)]
        command: DevCommands,
    },
    /// Create or update a single resource kind
    Create {
        /// Resource kind
        kind: KindArg,
        /// Path to the component spec
        spec: PathBuf,
        #[command(flatten)]
        flags: CommonFlags,
    },
    /// List the config maps and secrets a component needs
    Inspect {
        /// Path to the component spec
        spec: PathBuf,
        /// Suffix appended to resource names
        #[arg(long = "version")]
        version_override: Option<String>,
    },
    /// Generate auxiliary files
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
    /// Edit fields of a component spec file in place
    Inject {
        #[command(subcommand)]
        command: InjectCommands,
    },
}

#[derive(Subcommand)]
enum DevCommands {
    /// Create or update every resource of a component
    Up {
        /// Path to the component spec
        spec: PathBuf,
        #[command(flatten)]
        flags: CommonFlags,
    },
    /// Delete the resources of a component
    Down {
        /// Path to the component spec
        spec: PathBuf,
        #[command(flatten)]
        flags: CommonFlags,
    },
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Print a properties file with every declared variable
    Properties {
        /// Path to the component spec
        spec: PathBuf,
    },
}

#[derive(Subcommand)]
enum InjectCommands {
    /// Set an annotation
    Annotation {
        /// Path to the component spec
        spec: PathBuf,
        key: String,
        value: String,
    },
    /// Set the declared version
    Version {
        /// Path to the component spec
        spec: PathBuf,
        version: String,
    },
    /// Set the declared version, which must be a semantic version
    Semver {
        /// Path to the component spec
        spec: PathBuf,
        version: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let user = mg_config::load_user_config(cli.config.as_deref())
        .context("Failed to load user config")?;

    match cli.command {
        Commands::Dev { command } => match command {
            DevCommands::Up { spec, flags } => {
                commands::dev::up(&spec, flags, &user).await?;
            }
            DevCommands::Down { spec, flags } => {
                commands::dev::down(&spec, flags, &user).await?;
            }
        },
        Commands::Create { kind, spec, flags } => {
            commands::create::create(kind, &spec, flags, &user).await?;
        }
        Commands::Inspect {
            spec,
            version_override,
        } => {
            commands::inspect::run(&spec, version_override.as_deref())?;
        }
        Commands::Generate { command } => match command {
            GenerateCommands::Properties { spec } => {
                commands::generate::properties(&spec)?;
            }
        },
        Commands::Inject { command } => match command {
            InjectCommands::Annotation { spec, key, value } => {
                commands::inject::annotation(&spec, &key, &value)?;
            }
            InjectCommands::Version { spec, version } => {
                commands::inject::version(&spec, &version)?;
            }
            InjectCommands::Semver { spec, version } => {
                commands::inject::semver(&spec, &version)?;
            }
        },
    }

    Ok(())
}
