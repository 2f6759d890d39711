//! # Command Handlers
//!
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (dispatch)
//! ├── item.rs         ◄─── Items and supplier quotes
//! ├── company.rs      ◄─── Buying company
//! ├── supplier.rs     ◄─── Supplier registry
//! ├── spreadsheet.rs  ◄─── CSV import/export
//! ├── report.rs       ◄─── Purchase orders, statistics
//! ├── backup.rs       ◄─── Backups
//! └── config.rs       ◄─── Config file
//! ```
//!
//! Each handler takes `&AppState` and returns `AppResult`. The thin `run`
//! functions print; the rest return data so they can be tested.

pub mod backup;
pub mod company;
pub mod config;
pub mod item;
pub mod report;
pub mod spreadsheet;
pub mod supplier;

use crate::cli::Command;
use crate::error::AppResult;
use crate::state::AppState;

/// Runs a database-backed command.
pub async fn dispatch(state: &AppState, command: Command) -> AppResult<()> {
    match command {
        Command::Item(cmd) => item::run(state, cmd).await,
        Command::Company(cmd) => company::run(state, cmd).await,
        Command::Supplier(cmd) => supplier::run(state, cmd).await,
        Command::Import { file } => spreadsheet::run_import(state, &file).await,
        Command::Export { file, supplier } => {
            spreadsheet::run_export(state, &file, supplier.as_deref()).await
        }
        Command::Order {
            supplier,
            output,
            print,
        } => report::run_order(state, supplier.as_deref(), output.as_deref(), print).await,
        Command::Stats => report::run_stats(state).await,
        Command::Backup(cmd) => backup::run(state, cmd).await,
        // `crate::run` handles these before the database is opened; here the
        // default config path applies.
        Command::Config(cmd) => config::run(state.config(), None, cmd),
    }
}
