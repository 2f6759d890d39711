//! # Config Commands
//!
//! These run before the database is opened.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{AppError, AppResult};
use crate::state::AppConfig;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment)
    Show,

    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(config: &AppConfig, config_path: Option<&Path>, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => print!("{}", config.to_toml()?),
        ConfigCommand::Init { force } => {
            let path = init(config, config_path, force)?;
            println!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Saves `config` to `config_path` (or the platform default location).
pub fn init(config: &AppConfig, config_path: Option<&Path>, force: bool) -> AppResult<PathBuf> {
    let path = config_path
        .map(Path::to_path_buf)
        .or_else(AppConfig::default_path)
        .ok_or_else(|| AppError::config("No config directory on this platform; pass --config"))?;

    if path.exists() && !force {
        return Err(AppError::config(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    config.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compras.toml");
        let config = AppConfig::default();

        assert_eq!(init(&config, Some(&path), false).unwrap(), path);
        assert_eq!(
            init(&config, Some(&path), false).unwrap_err().code,
            ErrorCode::ConfigError
        );
        assert!(init(&config, Some(&path), true).is_ok());

        assert_eq!(AppConfig::from_file(&path).unwrap(), config);
    }
}
