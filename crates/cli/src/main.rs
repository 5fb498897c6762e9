//! Keeper CLI - keeper command

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::cmd;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keeper - retention-policy pruning for database backups
#[derive(Parser)]
#[command(name = "keeper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List backups, newest first
    List {
        /// Backup directory (default: storage.backup_dir from config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show which backups the retention policy keeps and deletes
    Plan {
        /// Backup directory (default: storage.backup_dir from config)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Policy override, e.g. none, simple:7 or smart:7,4,12,1
        #[arg(long)]
        policy: Option<String>,
        /// Show why each kept backup is retained
        #[arg(long)]
        explain: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the backups the retention policy does not keep
    Prune {
        /// Backup directory (default: storage.backup_dir from config)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Policy override, e.g. none, simple:7 or smart:7,4,12,1
        #[arg(long)]
        policy: Option<String>,
        /// Only show what would be deleted
        #[arg(long)]
        dry_run: bool,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
        /// Deletions in flight at once (default: prune.parallelism from config)
        #[arg(long)]
        parallelism: Option<usize>,
    },
    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Get a configuration value
    Get {
        /// Key, e.g. retention.policy
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key, e.g. retention.policy
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { dir } => cmd::list::run(dir).await,
        Commands::Plan { dir, policy, explain, json } => {
            cmd::plan::run(dir, policy, explain, json).await
        }
        Commands::Prune { dir, policy, dry_run, yes, parallelism } => {
            cmd::prune::run(dir, policy, dry_run, yes, parallelism).await
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list().await,
            ConfigCommands::Get { key } => cmd::config::run_get(&key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(&key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
