//! # Backup Configuration
//!
//! Settings for the backup service and the platform directories Compras
//! stores its files in.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     COMPRAS_BACKUP_DIR=/mnt/usb/compras                                │
//! │     COMPRAS_MAX_BACKUPS=10                                             │
//! │     COMPRAS_BACKUP_INTERVAL_HOURS=6                                    │
//! │                                                                         │
//! │  2. [backup] table of compras.toml                                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     <data dir>/backups, keep 30, every 24 hours, automatic on          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! [backup]
//! dir = "/home/maria/.local/share/compras/backups"
//! max_backups = 30
//! interval_hours = 24
//! automatic = true
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BackupError, BackupResult};

/// Platform directories for Compras.
///
/// - **Linux**: `~/.local/share/compras`, `~/.config/compras`
/// - **macOS**: `~/Library/Application Support/br.compras.compras`
/// - **Windows**: `%APPDATA%\compras\compras`
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("br", "compras", "compras")
}

/// Directory for the database file and backups (`./` when the platform has
/// no home directory).
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_backup_dir() -> PathBuf {
    default_data_dir().join("backups")
}

/// Longest accepted automatic backup interval: one year.
pub const MAX_INTERVAL_HOURS: u64 = 24 * 365;

/// Backup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Where backup files are written.
    pub dir: PathBuf,

    /// Number of backup files kept; older ones are deleted.
    pub max_backups: usize,

    /// Hours between automatic backups.
    pub interval_hours: u64,

    /// Informational only. `backup run` starts the periodic task either way
    /// and logs when this is `false`; no other command reads it.
    pub automatic: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        BackupConfig {
            dir: default_backup_dir(),
            max_backups: 30,
            interval_hours: 24,
            automatic: true,
        }
    }
}

impl BackupConfig {
    /// Applies `COMPRAS_BACKUP_*` environment overrides.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("COMPRAS_BACKUP_DIR") {
            debug!(dir = %dir, "Overriding backup directory from environment");
            self.dir = PathBuf::from(dir);
        }

        if let Ok(max) = std::env::var("COMPRAS_MAX_BACKUPS") {
            match max.parse::<usize>() {
                Ok(n) => self.max_backups = n,
                Err(_) => warn!(value = %max, "Ignoring invalid COMPRAS_MAX_BACKUPS"),
            }
        }

        if let Ok(hours) = std::env::var("COMPRAS_BACKUP_INTERVAL_HOURS") {
            match hours.parse::<u64>() {
                Ok(n) => self.interval_hours = n,
                Err(_) => warn!(value = %hours, "Ignoring invalid COMPRAS_BACKUP_INTERVAL_HOURS"),
            }
        }
    }

    /// Checks that retention is at least 1 and the interval is between 1 hour
    /// and [`MAX_INTERVAL_HOURS`].
    pub fn validate(&self) -> BackupResult<()> {
        if self.max_backups == 0 {
            return Err(BackupError::InvalidConfig(
                "max_backups must be at least 1".into(),
            ));
        }

        if self.interval_hours == 0 {
            return Err(BackupError::InvalidConfig(
                "interval_hours must be at least 1".into(),
            ));
        }

        if self.interval_hours > MAX_INTERVAL_HOURS {
            return Err(BackupError::InvalidConfig(format!(
                "interval_hours must be at most {} (one year)",
                MAX_INTERVAL_HOURS
            )));
        }

        Ok(())
    }
}
