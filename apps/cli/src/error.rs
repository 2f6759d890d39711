//! # Application Error Type
//!
//! Unified error type for command handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError / CoreError ──┐                                        │
//! │  DbError ──────────────────────┤                                        │
//! │  BackupError ──────────────────┼──► AppError { code, message }          │
//! │  io / csv / toml errors ───────┘          │                             │
//! │                                           ▼                             │
//! │                              main: "error: <message>"                   │
//! │                              exit status from ErrorCode                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Infrastructure failures are logged with their detail and shown to the
//! user as a short message.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use compras_backup::BackupError;
use compras_core::{CoreError, ValidationError};
use compras_db::DbError;

/// Error returned by every command handler.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error category
    pub code: ErrorCode,

    /// Human-readable message for the terminal
    pub message: String,
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record does not exist
    NotFound,

    /// User input was rejected
    ValidationError,

    /// A precondition such as "a company is registered" is not met
    BusinessLogic,

    /// Database operation failed
    DatabaseError,

    /// Backup, restore or verification failed
    BackupError,

    /// Config file unreadable or out of range
    ConfigError,

    /// File system failure
    IoError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this category.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::ValidationError | ErrorCode::BusinessLogic => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::ConfigError => 4,
            _ => 1,
        }
    }
}

/// Result type for command handlers.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, id),
            DbError::MissingId { .. } => AppError::new(ErrorCode::Internal, err.to_string()),
            DbError::UniqueViolation { field, value } => {
                AppError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::Serialization(e) => {
                error!("Stored data could not be decoded: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => AppError::not_found("Item", id),
            CoreError::CompanyNotFound(id) => AppError::not_found("Company", id),
            CoreError::SupplierNotFound(id) => AppError::not_found("Supplier", id),
            CoreError::NoDefaultCompany => AppError::new(ErrorCode::BusinessLogic, err.to_string()),
            CoreError::InvalidPriceMap(_) => AppError::new(ErrorCode::DatabaseError, err.to_string()),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::Invalid(errors) => AppError::validation(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<BackupError> for AppError {
    fn from(err: BackupError) -> Self {
        match err {
            BackupError::Database(e) => e.into(),
            BackupError::BackupNotFound(ref path) => {
                AppError::not_found("Backup", path.display())
            }
            BackupError::InvalidConfig(_) => AppError::config(err.to_string()),
            BackupError::Io(ref e) => {
                error!(?e, "Backup I/O failure");
                AppError::new(ErrorCode::IoError, err.to_string())
            }
            _ => AppError::new(ErrorCode::BackupError, err.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::new(ErrorCode::IoError, format!("Spreadsheet error: {}", err))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Invalid config file: {}", err))
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::new(ErrorCode::Internal, format!("Could not write config: {}", err))
    }
}
