//! # compras-backup: Backup Service for Compras
//!
//! Timestamped copies of the SQLite store, retention pruning, verified
//! restore and an optional periodic backup task.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   CLI (`compras backup ...`)                                           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │               compras-backup (THIS CRATE)                    │     │
//! │   │                                                              │     │
//! │   │   BackupConfig ──► BackupService ──► SchedulerHandle        │     │
//! │   │   (config.rs)      (service.rs)      (scheduler.rs)          │     │
//! │   └───────────────────────┬──────────────────────────────────────┘     │
//! │                           │ file copies, one-off sqlx connection       │
//! │                           ▼                                            │
//! │          compras.db  ──►  backups/backup_*.db                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let service = BackupService::new(&config.backup, &db_path);
//! let path = service.create_backup(Some("antes_inventario")).await?;
//! service.restore_backup(&path).await?;
//! ```
//!
//! There is no locking against writers: a backup taken while another
//! process writes may capture a half-written file.

pub mod config;
pub mod error;
mod scheduler;
pub mod service;

pub use config::{default_data_dir, project_dirs, BackupConfig, MAX_INTERVAL_HOURS};
pub use error::{BackupError, BackupResult};
pub use service::{BackupInfo, BackupService, BackupSummary, BEFORE_RESTORE_LABEL};
