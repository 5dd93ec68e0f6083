use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use clap::{Parser, Subcommand};
use tracing_subscriber;

pub mod commands;

/// Algorand Ledger transaction review tool
#[derive(Parser)]
#[command(name = "algo-tx-review")]
#[command(about = "Decode Algorand signing requests and show them as Ledger review screens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Review a single msgpack-encoded transaction
    Tx(commands::tx::TxCommand),
    /// Review the members of an atomic transaction group
    Group(commands::group::GroupCommand),
    /// Review an arbitrary-data authentication request
    Data(commands::data::DataCommand),
}

pub fn run() -> AppResult<()> {
    let config = AppConfig::get_defaults()
        .map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))?;

    // Initialise tracing subscriber to capture debug!() and warn!() macros
    // Uses RUST_LOG environment variable (defaults to logging.filter if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tx(command) => command.run(&config),
        Commands::Group(command) => command.run(&config),
        Commands::Data(command) => command.run(&config),
    }
}
