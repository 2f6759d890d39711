//! # Backup Error Types
//!
//! ```text
//! std::io::Error ──┐
//! DbError ─────────┼──► BackupError ──► AppError (CLI)
//! integrity check ─┘
//! ```
//!
//! Failures are returned to the caller and logged there; none of them stop
//! the periodic backup task.

use std::path::PathBuf;

use compras_db::DbError;
use thiserror::Error;

/// Backup service errors.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The database file to snapshot does not exist.
    #[error("Database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    /// The backup file named by the caller does not exist.
    #[error("Backup file not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    /// The copy was created but is empty.
    #[error("Backup file is empty: {}", .0.display())]
    EmptyBackup(PathBuf),

    /// A restored database failed verification; the pre-restore snapshot was
    /// copied back.
    ///
    /// ## When This Occurs
    /// - The chosen file is not a SQLite database
    /// - One of `items`, `company`, `suppliers` is missing
    /// - `PRAGMA integrity_check` did not return `ok`
    #[error("Restored database failed the integrity check: {}", .0.display())]
    IntegrityCheckFailed(PathBuf),

    /// Settings are out of range.
    #[error("Invalid backup configuration: {0}")]
    InvalidConfig(String),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database failure.
    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<sqlx::Error> for BackupError {
    fn from(err: sqlx::Error) -> Self {
        BackupError::Database(err.into())
    }
}

/// Result type for backup operations.
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_paths() {
        let err = BackupError::BackupNotFound(PathBuf::from("/tmp/backup_x.db"));
        assert_eq!(err.to_string(), "Backup file not found: /tmp/backup_x.db");
    }

    #[test]
    fn test_io_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(BackupError::from(io), BackupError::Io(_)));
    }
}
