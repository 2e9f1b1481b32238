//! tabdo CLI
//!
//! Command-line interface for tabdo - to-do lists kept in a remote JSON store.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabdo_core::{Config, HttpStore, ListRegistry, Priority, RemoteStore, SyncEngine};

mod commands;
mod output;
mod session;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tabdo")]
#[command(about = "tabdo - Multi-list to-do client backed by a remote JSON store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List to work on (defaults to the configured default list)
    #[arg(short, long, global = true)]
    list: Option<String>,

    /// Save even if the list could not be loaded (overwrites the remote list)
    #[arg(long, global = true)]
    force: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the items of a list
    #[command(alias = "ls")]
    Show,
    /// Add an item
    Add {
        /// Item text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Priority (low, normal, high)
        #[arg(short, long, default_value = "normal")]
        priority: Priority,
    },
    /// Toggle an item between done and not done
    Done {
        /// Item ID (full ID or prefix)
        id: String,
    },
    /// Replace the text of an item
    Edit {
        /// Item ID (full ID or prefix)
        id: String,
        /// New text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID (full ID or prefix)
        id: String,
    },
    /// Move an item to another position
    #[command(alias = "mv")]
    Move {
        /// Current position (1-based)
        from: usize,
        /// New position (1-based)
        to: usize,
    },
    /// Show the configured lists
    Lists,
    /// Load every list and show its state
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (store_url, default_list, request_timeout_secs, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Register a list
    AddList {
        /// List name
        name: String,
        /// Document id in the remote store
        store_id: String,
    },
    /// Remove a list (the remote document is kept)
    RemoveList {
        /// List name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Commands that don't touch the remote store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let command = cli.command.unwrap_or(Commands::Show);
    if let Commands::Lists = command {
        return commands::lists::show(&config, &output);
    }

    let store: Arc<dyn RemoteStore> =
        Arc::new(HttpStore::from_config(&config).context("Failed to create HTTP client")?);

    if let Commands::Status = command {
        let registry = ListRegistry::from_config(&config).context("Invalid list configuration")?;
        let mut engine = SyncEngine::start(registry, store)?;
        return commands::status::show(&config, &mut engine, &output).await;
    }

    let mut engine = session::open(&config, store, cli.list.as_deref()).await?;
    handle_item_command(command, &mut engine, cli.force, &output).await
}

async fn handle_item_command(
    command: Commands,
    engine: &mut SyncEngine,
    force: bool,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Show => commands::item::show(engine, output),
        Commands::Add { text, priority } => {
            commands::item::add(engine, text.join(" "), priority, force, output).await
        }
        Commands::Done { id } => commands::item::toggle(engine, id, force, output).await,
        Commands::Edit { id, text } => {
            commands::item::edit(engine, id, text.join(" "), force, output).await
        }
        Commands::Delete { id } => commands::item::delete(engine, id, force, output).await,
        Commands::Move { from, to } => commands::item::move_item(engine, from, to, force, output).await,
        Commands::Lists | Commands::Status | Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
        Some(ConfigCommands::AddList { name, store_id }) => {
            commands::config::add_list(name, store_id, config_path, output)
        }
        Some(ConfigCommands::RemoveList { name }) => {
            commands::config::remove_list(name, config_path, output)
        }
    }
}

/// Initialize file logging
///
/// Only initializes if TABDO_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TABDO_LOG") else {
        return;
    };

    let log_path = config.debug_log_path();
    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory {:?}: {}", parent, e);
            return;
        }
    }

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("tabdo_core={},tabdo_cli={}", log_level, log_level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
