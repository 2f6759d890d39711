//! # Backup Commands
//!
//! ```text
//! compras backup create --label antes_inventario
//! compras backup list
//! compras backup restore backup_20261016_091233_817230.db
//! compras backup run            # periodic backups until Ctrl-C
//! ```
//!
//! `restore` and `delete` accept a full path or a bare file name from the
//! backup directory.

use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use compras_backup::{BackupInfo, BackupSummary};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Copy the database to a new timestamped backup
    Create {
        #[arg(long)]
        label: Option<String>,
    },

    /// List backups, newest first
    List,

    /// Replace the database with a backup (a `before_restore` copy is kept)
    Restore { path: PathBuf },

    /// Delete a backup file
    Delete { path: PathBuf },

    /// Show backup settings and the latest backup
    Info,

    /// Take a backup every `interval_hours` until interrupted
    Run,
}

pub async fn run(state: &AppState, command: BackupCommand) -> AppResult<()> {
    let backup = state.backup();

    match command {
        BackupCommand::Create { label } => {
            let path = backup.create_backup(label.as_deref()).await?;
            println!("Backup created: {}", path.display());
        }
        BackupCommand::List => {
            let backups = backup.list_backups().await?;
            if backups.is_empty() {
                println!("No backups in {}", backup.backup_dir().display());
            }
            for info in &backups {
                println!("{}", line(info));
            }
        }
        BackupCommand::Restore { path } => {
            // The pool must not hold the file while it is replaced.
            state.db().close().await;
            backup.restore_backup(&path).await?;
            println!("Database restored from {}", path.display());
        }
        BackupCommand::Delete { path } => {
            backup.delete_backup(&path).await?;
            println!("Backup deleted: {}", path.display());
        }
        BackupCommand::Info => print!("{}", render_summary(&backup.backup_info().await?)),
        BackupCommand::Run => run_automatic(state).await?,
    }

    Ok(())
}

/// Starts the periodic task and blocks until Ctrl-C.
async fn run_automatic(state: &AppState) -> AppResult<()> {
    let backup = state.backup();

    if !state.config().backup.automatic {
        info!("Automatic backup is disabled in the configuration; running on request");
    }

    backup.start_automatic_backup().await;
    println!(
        "Automatic backup every {} h into {} (Ctrl-C to stop)",
        state.config().backup.interval_hours,
        backup.backup_dir().display()
    );

    tokio::signal::ctrl_c().await?;

    backup.stop_automatic_backup().await;
    println!("Automatic backup stopped");
    Ok(())
}

fn line(info: &BackupInfo) -> String {
    format!(
        "{}  {:>10} bytes  {}",
        info.created.format("%Y-%m-%d %H:%M:%S"),
        info.size,
        info.filename
    )
}

fn render_summary(summary: &BackupSummary) -> String {
    let latest = match &summary.latest_backup {
        Some(info) => line(info),
        None => "none".to_string(),
    };

    format!(
        "Database:        {}\n\
         Backup dir:      {}\n\
         Keep:            {} backups\n\
         Interval:        {} h\n\
         Backups stored:  {}\n\
         Automatic:       {}\n\
         Latest:          {}\n",
        summary.database_path.display(),
        summary.backup_dir.display(),
        summary.max_backups,
        summary.interval_hours,
        summary.total_backups,
        if summary.automatic_backup_running { "running" } else { "stopped" },
        latest
    )
}
