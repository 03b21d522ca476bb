mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitehost")]
#[command(about = "Inspect SiteHost cloud stack ids, environments and manifests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a stack id into server, project and service
    Id {
        /// Stack id or control panel URL
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the environment change-set between two settings files
    EnvDiff {
        /// Currently applied settings (YAML or JSON map)
        #[arg(short, long)]
        observed: PathBuf,
        /// Wanted settings (YAML or JSON map)
        #[arg(short, long)]
        desired: PathBuf,
        /// Upper-case variable names before diffing
        #[arg(short, long)]
        uppercase: bool,
        /// Print the wire entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show attributes derived from a stack's compose manifest
    Manifest {
        /// Compose file
        file: PathBuf,
        /// Service (stack) name
        #[arg(short, long)]
        service: String,
        /// Own label of the stack, excluded from aliases
        #[arg(short, long, default_value = "")]
        label: String,
    },
    /// Locate, load and validate the provider config
    Config {
        /// Config file to use instead of searching for one
        #[arg(short, long, env = sitehost_config::ENV_CONFIG_PATH)]
        file: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match cli.command {
        Commands::Id { id, json } => commands::id::handle(&id, json),
        Commands::EnvDiff {
            observed,
            desired,
            uppercase,
            json,
        } => commands::env_diff::handle(&observed, &desired, uppercase, json),
        Commands::Manifest {
            file,
            service,
            label,
        } => commands::manifest::handle(&file, &service, &label),
        Commands::Config { file } => commands::config::handle(file.as_deref()),
        Commands::Version => {
            println!("sitehost {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
