//! # Application Configuration
//!
//! `compras.toml` plus environment overrides.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`COMPRAS_DB_PATH`, `COMPRAS_BACKUP_*`)
//! 2. Config file (`--config <path>` or `<platform config dir>/compras.toml`)
//! 3. Defaults (this file)
//!
//! ## File Format
//! ```toml
//! [database]
//! path = "/home/maria/.local/share/compras/compras.db"
//!
//! [backup]
//! dir = "/home/maria/.local/share/compras/backups"
//! max_backups = 30
//! interval_hours = 24
//! automatic = true
//!
//! [validation]
//! min_description_length = 3
//! max_price = 999999.99
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use compras_backup::{default_data_dir, project_dirs, BackupConfig};
use compras_core::ValidationConfig;

use crate::error::{AppError, AppResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "compras.toml";

/// Database file name inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "compras.db";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub backup: BackupConfig,
    pub validation: ValidationConfig,
}

/// `[database]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file. Its directory is created on startup.
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_data_dir().join(DATABASE_FILE_NAME),
        }
    }
}

impl AppConfig {
    /// Default config file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist. The default path is optional: when it is
    /// missing the defaults are used.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        Self::load_from(explicit, true)
    }

    /// Like [`AppConfig::load`], but a missing explicit file also falls back
    /// to the defaults. Used by `config init`, which creates that file.
    pub fn load_or_default(explicit: Option<&Path>) -> AppResult<Self> {
        Self::load_from(explicit, false)
    }

    fn load_from(explicit: Option<&Path>, require_explicit: bool) -> AppResult<Self> {
        let mut config = match explicit {
            Some(path) if !path.exists() && !require_explicit => {
                debug!(path = %path.display(), "Config file not created yet, using defaults");
                AppConfig::default()
            }
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file, using defaults");
                    AppConfig::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing tables and keys take their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(path = %path.display(), "Loading configuration");
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    pub fn to_toml(&self) -> AppResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Applies `COMPRAS_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("COMPRAS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        self.backup.apply_env_overrides();
    }

    /// Checks every section.
    pub fn validate(&self) -> AppResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(AppError::config("database.path cannot be empty"));
        }

        self.backup.validate()?;
        self.validation
            .validate()
            .map_err(|e| AppError::config(e.to_string()))?;

        Ok(())
    }
}
