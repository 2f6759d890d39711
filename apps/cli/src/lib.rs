//! # Compras CLI Library
//!
//! Argument parsing, configuration, state and command handlers for the
//! `compras` binary.
//!
//! ## Module Organization
//! ```text
//! compras_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (Database + BackupService + AppConfig)
//! │   └── config.rs   ◄─── compras.toml loading and saving
//! ├── commands/       ◄─── One module per command group
//! └── error.rs        ◄─── AppError / ErrorCode
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Initialize logging (RUST_LOG or "info,compras=debug,sqlx=warn")    │
//! │  2. Parse arguments                                                    │
//! │  3. Load config: defaults → compras.toml → COMPRAS_* env → validate    │
//! │  4. `config` commands run here, without touching the database          │
//! │  5. AppState::init: create data dir, open pool, run migrations         │
//! │  6. Dispatch the command                                               │
//! │  7. Stop the backup task and close the pool                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::config::ConfigCommand;
use error::AppResult;
use state::{AppConfig, AppState};

/// Runs one command.
pub async fn run(cli: Cli) -> AppResult<()> {
    let command = match cli.command {
        Command::Config(cmd) => {
            let config = match cmd {
                ConfigCommand::Init { .. } => AppConfig::load_or_default(cli.config.as_deref())?,
                _ => AppConfig::load(cli.config.as_deref())?,
            };
            return commands::config::run(&config, cli.config.as_deref(), cmd);
        }
        command => command,
    };

    let config = AppConfig::load(cli.config.as_deref())?;

    let state = AppState::init(config).await?;
    debug!(?command, "Dispatching command");

    let result = commands::dispatch(&state, command).await;
    state.close().await;

    result
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `RUST_LOG=compras_db=trace` - Trace the database layer only
/// - Default: `info,compras=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,compras=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
