//! hmem CLI — the main entry point.
//!
//! Commands:
//! - `view`    — Print the budgeted (default) or full view of a snapshot
//! - `stats`   — Count records, nodes and tokens in a snapshot
//! - `config`  — Show the effective configuration or where it comes from

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "hmem",
    about = "hmem — budgeted views over agent memory snapshots",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what a consumer sees when reading a snapshot
    View {
        /// Snapshot file (.json or .jsonl)
        snapshot: PathBuf,

        /// Show everything instead of the budgeted bulk-read view
        #[arg(long)]
        full: bool,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,

        /// Config file to use instead of discovery
        #[arg(short, long, env = "HMEM_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Count records, nodes and tokens in a snapshot
    Stats {
        /// Snapshot file (.json or .jsonl)
        snapshot: PathBuf,

        /// Config file to use instead of discovery
        #[arg(short, long, env = "HMEM_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show {
        /// Resolve the config that applies to this snapshot
        snapshot: Option<PathBuf>,
    },
    /// Print the config file that would be used
    Path {
        /// Resolve the config that applies to this snapshot
        snapshot: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing (stderr, so stdout stays clean for --json)
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::View {
            snapshot,
            full,
            json,
            config,
        } => commands::view::run(&snapshot, config.as_deref(), full, json)?,
        Commands::Stats { snapshot, config } => {
            commands::stats::run(&snapshot, config.as_deref())?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { snapshot } => commands::config_cmd::show(snapshot.as_deref())?,
            ConfigAction::Path { snapshot } => commands::config_cmd::path(snapshot.as_deref())?,
        },
    }

    Ok(())
}
