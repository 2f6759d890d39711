//! # Application State
//!
//! Everything a command handler needs, built once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppState                                        │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │    Database      │ │  BackupService   │ │     AppConfig        │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  • SqlitePool    │ │  • backup dir    │ │  • database path     │    │
//! │  │  • repositories  │ │  • retention     │ │  • backup settings   │    │
//! │  │                  │ │  • periodic task │ │  • validation bounds │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  Handlers take `&AppState`; nothing lives in globals.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{AppConfig, DatabaseSettings, CONFIG_FILE_NAME, DATABASE_FILE_NAME};

use tracing::info;

use compras_backup::BackupService;
use compras_db::{Database, DbConfig};

use crate::error::AppResult;

/// Shared state passed to every command handler.
#[derive(Debug)]
pub struct AppState {
    db: Database,
    backup: BackupService,
    config: AppConfig,
}

impl AppState {
    /// Assembles state from already-built parts.
    pub fn new(db: Database, backup: BackupService, config: AppConfig) -> Self {
        AppState { db, backup, config }
    }

    /// Opens the configured database (creating its directory and running
    /// migrations) and sets up the backup service for it.
    pub async fn init(config: AppConfig) -> AppResult<Self> {
        let db_path = config.database.path.clone();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db = Database::new(DbConfig::new(&db_path)).await?;
        let backup = BackupService::new(&config.backup, &db_path);

        info!(db = %db_path.display(), backups = %config.backup.dir.display(), "State initialized");

        Ok(AppState::new(db, backup, config))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn backup(&self) -> &BackupService {
        &self.backup
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Stops the backup task (if running) and closes the pool.
    pub async fn close(&self) {
        self.backup.stop_automatic_backup().await;
        self.db.close().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State over an in-memory database; the backup service points at a
    /// file that does not exist.
    pub async fn memory_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig::default();
        let backup = BackupService::new(&config.backup, "/nonexistent/compras.db");

        AppState::new(db, backup, config)
    }
}
