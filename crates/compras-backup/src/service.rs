//! # Backup Service
//!
//! File-level snapshots of the SQLite store.
//!
//! ## Backup Directory
//! ```text
//! backups/
//! ├── backup_20261015_180000_000412.db                 ← automatic
//! ├── backup_antes_inventario_20261016_091233_817230.db ← labelled
//! └── backup_before_restore_20261016_101502_004981.db   ← taken by restore
//! ```
//!
//! The timestamp is always the last three `_` separated parts of the file
//! stem, so labels may contain underscores.
//!
//! ## Restore Flow
//! ```text
//! restore_backup(path)
//!    │
//!    ├── read chosen backup into memory
//!    ├── create_backup("before_restore")      (may prune old backups)
//!    ├── overwrite store file
//!    ├── verify_database(store)
//!    │       ├── ok   ──► done
//!    │       └── fail ──► copy before_restore snapshot back
//!    │                     └── Err(IntegrityCheckFailed)
//! ```
//!
//! The service works on the file only. Callers holding a pool on the store
//! must close it before a restore.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use compras_db::REQUIRED_TABLES;

use crate::config::{BackupConfig, MAX_INTERVAL_HOURS};
use crate::error::{BackupError, BackupResult};
use crate::scheduler::SchedulerHandle;

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_EXTENSION: &str = ".db";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Label of the snapshot taken before every restore.
pub const BEFORE_RESTORE_LABEL: &str = "before_restore";

// =============================================================================
// Types
// =============================================================================

/// A backup file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Timestamp from the file name, or the modification time when the name
    /// does not carry one.
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
}

/// Overview of the backup setup, for `backup info`.
#[derive(Debug, Clone, Serialize)]
pub struct BackupSummary {
    pub backup_dir: PathBuf,
    pub database_path: PathBuf,
    pub max_backups: usize,
    pub interval_hours: u64,
    pub total_backups: usize,
    pub automatic_backup_running: bool,
    pub latest_backup: Option<BackupInfo>,
}

// =============================================================================
// Service
// =============================================================================

/// Creates, lists, restores and prunes backups of one database file.
///
/// Clones share the automatic backup task.
#[derive(Debug, Clone)]
pub struct BackupService {
    backup_dir: PathBuf,
    database_path: PathBuf,
    max_backups: usize,
    interval: Duration,
    scheduler: Arc<Mutex<Option<SchedulerHandle>>>,
}

impl BackupService {
    /// Creates a service for `database_path` with the given settings.
    ///
    /// The interval is capped at [`MAX_INTERVAL_HOURS`] even when the config
    /// was not validated.
    pub fn new(config: &BackupConfig, database_path: impl Into<PathBuf>) -> Self {
        let hours = config.interval_hours.min(MAX_INTERVAL_HOURS);

        BackupService {
            backup_dir: config.dir.clone(),
            database_path: database_path.into(),
            max_backups: config.max_backups,
            interval: Duration::from_secs(hours.saturating_mul(3600)),
            scheduler: Arc::new(Mutex::new(None)),
        }
    }

    /// Overrides the automatic backup period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Resolves a bare file name against the backup directory.
    ///
    /// Paths with a directory part, and names that exist relative to the
    /// working directory, are returned unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() && path.components().count() == 1 && !path.exists() {
            self.backup_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    /// Copies the store to a new timestamped backup file.
    ///
    /// ## Rules
    /// - Name: `backup_[label_]YYYYMMDD_HHMMSS_ffffff.db`
    /// - The backup directory is created if missing
    /// - An empty copy is deleted and reported as [`BackupError::EmptyBackup`]
    /// - Afterwards only the newest `max_backups` files are kept
    ///
    /// ## Returns
    /// Path of the new backup file.
    pub async fn create_backup(&self, label: Option<&str>) -> BackupResult<PathBuf> {
        if tokio::fs::metadata(&self.database_path).await.is_err() {
            return Err(BackupError::DatabaseNotFound(self.database_path.clone()));
        }

        tokio::fs::create_dir_all(&self.backup_dir).await?;

        let prefix = match label.map(sanitize_label).filter(|l| !l.is_empty()) {
            Some(label) => format!("{BACKUP_PREFIX}{label}_"),
            None => BACKUP_PREFIX.to_string(),
        };

        let path = loop {
            let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            let candidate = self
                .backup_dir
                .join(format!("{prefix}{stamp}{BACKUP_EXTENSION}"));

            if !tokio::fs::try_exists(&candidate).await? {
                break candidate;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        };

        let copied = tokio::fs::copy(&self.database_path, &path).await?;
        if copied == 0 {
            tokio::fs::remove_file(&path).await?;
            return Err(BackupError::EmptyBackup(path));
        }

        info!(path = %path.display(), bytes = copied, "Backup created");

        let removed = self.prune().await?;
        if removed > 0 {
            debug!(removed, "Pruned old backups");
        }

        Ok(path)
    }

    /// Deletes backups beyond the retention count, oldest first.
    async fn prune(&self) -> BackupResult<usize> {
        let backups = self.list_backups().await?;
        let mut removed = 0;

        for old in backups.iter().skip(self.max_backups) {
            debug!(path = %old.path.display(), "Removing old backup");
            tokio::fs::remove_file(&old.path).await?;
            removed += 1;
        }

        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Restore
    // -------------------------------------------------------------------------

    /// Replaces the store with a backup.
    ///
    /// A `before_restore` snapshot of the current store is taken first (when
    /// the store exists). If the restored file fails [`verify_database`],
    /// that snapshot is copied back.
    ///
    /// [`verify_database`]: BackupService::verify_database
    pub async fn restore_backup(&self, backup_path: &Path) -> BackupResult<()> {
        let backup_path = self.resolve_path(backup_path);
        if tokio::fs::metadata(&backup_path).await.is_err() {
            return Err(BackupError::BackupNotFound(backup_path));
        }

        info!(from = %backup_path.display(), "Restoring backup");

        // Read first: the snapshot below may prune the chosen file.
        let contents = tokio::fs::read(&backup_path).await?;

        let snapshot = if tokio::fs::try_exists(&self.database_path).await? {
            Some(self.create_backup(Some(BEFORE_RESTORE_LABEL)).await?)
        } else {
            None
        };

        tokio::fs::write(&self.database_path, &contents).await?;

        if self.verify_database(&self.database_path).await? {
            info!("Backup restored");
            return Ok(());
        }

        warn!(from = %backup_path.display(), "Restored database failed verification, rolling back");
        if let Some(snapshot) = snapshot {
            tokio::fs::copy(&snapshot, &self.database_path).await?;
        }

        Err(BackupError::IntegrityCheckFailed(backup_path))
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    /// All `backup_*.db` files in the backup directory, newest first.
    ///
    /// A missing directory yields an empty list.
    pub async fn list_backups(&self) -> BackupResult<Vec<BackupInfo>> {
        let mut entries = match tokio::fs::read_dir(&self.backup_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut backups = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !is_backup_file_name(&filename) {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata
                .modified()
                .map(to_local_naive)
                .unwrap_or_else(|_| Local::now().naive_local());

            backups.push(BackupInfo {
                created: timestamp_from_name(&filename).unwrap_or(modified),
                path: entry.path(),
                size: metadata.len(),
                modified,
                filename,
            });
        }

        backups.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| b.filename.cmp(&a.filename))
        });

        Ok(backups)
    }

    pub async fn delete_backup(&self, backup_path: &Path) -> BackupResult<()> {
        let backup_path = self.resolve_path(backup_path);
        if tokio::fs::metadata(&backup_path).await.is_err() {
            return Err(BackupError::BackupNotFound(backup_path));
        }

        tokio::fs::remove_file(&backup_path).await?;
        info!(path = %backup_path.display(), "Backup deleted");
        Ok(())
    }

    /// Backup directory, settings and the latest backup.
    pub async fn backup_info(&self) -> BackupResult<BackupSummary> {
        let backups = self.list_backups().await?;

        Ok(BackupSummary {
            backup_dir: self.backup_dir.clone(),
            database_path: self.database_path.clone(),
            max_backups: self.max_backups,
            interval_hours: self.interval.as_secs() / 3600,
            total_backups: backups.len(),
            automatic_backup_running: self.is_running().await,
            latest_backup: backups.into_iter().next(),
        })
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Checks that `path` is a usable Compras database.
    ///
    /// ## Checks
    /// 1. Tables `items`, `company` and `suppliers` exist
    /// 2. `PRAGMA integrity_check` returns `ok`
    ///
    /// ## Returns
    /// * `Ok(false)` - The file opened but is not a healthy database
    /// * `Err(DatabaseNotFound)` - The file does not exist
    pub async fn verify_database(&self, path: &Path) -> BackupResult<bool> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(BackupError::DatabaseNotFound(path.to_path_buf()));
        }

        match check_integrity(path).await {
            Ok(healthy) => Ok(healthy),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Database verification failed");
                Ok(false)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Automatic Backup
    // -------------------------------------------------------------------------

    /// Starts the periodic backup task.
    ///
    /// Returns `false` when it was already running.
    pub async fn start_automatic_backup(&self) -> bool {
        let mut scheduler = self.scheduler.lock().await;
        if scheduler.is_some() {
            debug!("Automatic backup already running");
            return false;
        }

        *scheduler = Some(SchedulerHandle::spawn(self.clone(), self.interval));
        true
    }

    /// Stops the periodic backup task and waits for it to end.
    ///
    /// Returns `false` when it was not running.
    pub async fn stop_automatic_backup(&self) -> bool {
        let handle = self.scheduler.lock().await.take();

        match handle {
            Some(handle) => {
                handle.shutdown().await;
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self) -> bool {
        self.scheduler.lock().await.is_some()
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn check_integrity(path: &Path) -> Result<bool, sqlx::Error> {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await?;

    for table in REQUIRED_TABLES {
        let found: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
                .bind(table)
                .fetch_optional(&mut conn)
                .await?;

        if found.is_none() {
            warn!(table, "Required table missing");
            conn.close().await?;
            return Ok(false);
        }
    }

    let result: String = sqlx::query_scalar("PRAGMA integrity_check")
        .fetch_one(&mut conn)
        .await?;
    conn.close().await?;

    Ok(result == "ok")
}

/// Keeps letters, digits and `-`; everything else becomes `_`.
fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

fn is_backup_file_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_EXTENSION)
}

/// Parses `..._YYYYMMDD_HHMMSS_ffffff.db`.
fn timestamp_from_name(name: &str) -> Option<NaiveDateTime> {
    let stem = name.strip_suffix(BACKUP_EXTENSION)?;
    let mut parts = stem.rsplitn(4, '_');

    let micros: u32 = parts.next()?.parse().ok()?;
    let time = parts.next()?;
    let date = parts.next()?;

    if micros >= 1_000_000 {
        return None;
    }

    NaiveDateTime::parse_from_str(&format!("{date}_{time}"), "%Y%m%d_%H%M%S")
        .ok()?
        .with_nanosecond(micros * 1000)
}

fn to_local_naive(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use compras_core::{Item, SupplierPrices};
    use compras_db::{Database, DbConfig};
    use tempfile::TempDir;

    async fn setup(max_backups: usize) -> (TempDir, BackupService) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("compras.db");

        let db = Database::new(DbConfig::new(&db_path)).await.unwrap();
        db.items()
            .create(&Item::new(
                "Parafuso",
                "P001",
                "ABC",
                10.0,
                SupplierPrices::single("Fornecedor A", 5.5),
            ))
            .await
            .unwrap();
        db.close().await;

        let config = BackupConfig {
            dir: dir.path().join("backups"),
            max_backups,
            ..Default::default()
        };
        let service = BackupService::new(&config, &db_path);

        (dir, service)
    }

    async fn item_count(path: &Path) -> i64 {
        let db = Database::new(DbConfig::new(path)).await.unwrap();
        let count = db.items().count().await.unwrap();
        db.close().await;
        count
    }

    #[test]
    fn test_timestamp_from_name() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_micro_opt(9, 12, 33, 817_230)
            .unwrap();

        assert_eq!(
            timestamp_from_name("backup_20261016_091233_817230.db"),
            Some(expected)
        );
        assert_eq!(
            timestamp_from_name("backup_before_restore_20261016_091233_817230.db"),
            Some(expected)
        );
        assert_eq!(timestamp_from_name("backup_manual.db"), None);
        assert_eq!(timestamp_from_name("backup_2026_0916_x.db"), None);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("antes do inventário"), "antes_do_inventário");
        assert_eq!(sanitize_label("  ../x  "), "x");
        assert_eq!(sanitize_label("///"), "");
    }

    #[tokio::test]
    async fn test_create_backup_names_and_copies() {
        let (_dir, service) = setup(30).await;

        let plain = service.create_backup(None).await.unwrap();
        let labelled = service.create_backup(Some("fim de mês")).await.unwrap();

        let plain_name = plain.file_name().unwrap().to_string_lossy().into_owned();
        let labelled_name = labelled.file_name().unwrap().to_string_lossy().into_owned();
        assert!(timestamp_from_name(&plain_name).is_some());
        assert!(labelled_name.starts_with("backup_fim_de_mês_"));

        assert_eq!(item_count(&labelled).await, 1);
        assert!(service.verify_database(&plain).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_database_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackupConfig {
            dir: dir.path().join("backups"),
            ..Default::default()
        };
        let service = BackupService::new(&config, dir.path().join("missing.db"));

        assert!(matches!(
            service.create_backup(None).await,
            Err(BackupError::DatabaseNotFound(_))
        ));
        assert!(service.list_backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retention_removes_oldest() {
        let (_dir, service) = setup(3).await;

        let mut created = Vec::new();
        for _ in 0..4 {
            created.push(service.create_backup(None).await.unwrap());
        }

        let backups = service.list_backups().await.unwrap();
        assert_eq!(backups.len(), 3);
        assert!(!created[0].exists());

        let listed: Vec<_> = backups.iter().map(|b| b.path.clone()).collect();
        assert_eq!(listed, vec![created[3].clone(), created[2].clone(), created[1].clone()]);
    }

    #[tokio::test]
    async fn test_list_ignores_other_files() {
        let (dir, service) = setup(30).await;
        service.create_backup(None).await.unwrap();

        let backups_dir = dir.path().join("backups");
        std::fs::write(backups_dir.join("notes.txt"), "x").unwrap();
        std::fs::write(backups_dir.join("backup_manual.db"), "x").unwrap();

        let backups = service.list_backups().await.unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups.iter().all(|b| b.filename.starts_with("backup_")));

        let manual = backups.iter().find(|b| b.filename == "backup_manual.db").unwrap();
        assert_eq!(manual.created, manual.modified);
        assert_eq!(manual.size, 1);
    }

    #[tokio::test]
    async fn test_restore_replaces_store() {
        let (_dir, service) = setup(30).await;
        let backup = service.create_backup(None).await.unwrap();

        let db = Database::new(DbConfig::new(service.database_path())).await.unwrap();
        db.items()
            .create(&Item::new(
                "Porca",
                "P002",
                "XYZ",
                1.0,
                SupplierPrices::single("Fornecedor B", 1.0),
            ))
            .await
            .unwrap();
        db.close().await;
        assert_eq!(item_count(service.database_path()).await, 2);

        let name = PathBuf::from(backup.file_name().unwrap());
        service.restore_backup(&name).await.unwrap();

        assert_eq!(item_count(service.database_path()).await, 1);

        let backups = service.list_backups().await.unwrap();
        assert!(backups[0].filename.starts_with("backup_before_restore_"));
        assert_eq!(item_count(&backups[0].path).await, 2);
    }

    #[tokio::test]
    async fn test_failed_restore_rolls_back() {
        let (dir, service) = setup(30).await;

        let garbage = dir.path().join("backup_garbage.db");
        std::fs::write(&garbage, b"this is not a sqlite database, just text").unwrap();

        let result = service.restore_backup(&garbage).await;
        assert!(matches!(result, Err(BackupError::IntegrityCheckFailed(_))));

        assert!(service.verify_database(service.database_path()).await.unwrap());
        assert_eq!(item_count(service.database_path()).await, 1);
    }

    #[tokio::test]
    async fn test_restore_missing_file() {
        let (_dir, service) = setup(30).await;

        let result = service.restore_backup(Path::new("backup_nope.db")).await;
        assert!(matches!(result, Err(BackupError::BackupNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_and_info() {
        let (_dir, service) = setup(30).await;
        let first = service.create_backup(None).await.unwrap();
        let second = service.create_backup(Some("x")).await.unwrap();

        let info = service.backup_info().await.unwrap();
        assert_eq!(info.total_backups, 2);
        assert_eq!(info.max_backups, 30);
        assert_eq!(info.interval_hours, 24);
        assert!(!info.automatic_backup_running);
        assert_eq!(info.latest_backup.unwrap().path, second);

        service.delete_backup(&first).await.unwrap();
        assert_eq!(service.list_backups().await.unwrap().len(), 1);
        assert!(matches!(
            service.delete_backup(&first).await,
            Err(BackupError::BackupNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_interval_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackupConfig {
            dir: dir.path().join("backups"),
            interval_hours: u64::MAX,
            ..Default::default()
        };
        let service = BackupService::new(&config, dir.path().join("compras.db"));

        let info = service.backup_info().await.unwrap();
        assert_eq!(info.interval_hours, MAX_INTERVAL_HOURS);

        assert!(service.start_automatic_backup().await);
        assert!(service.stop_automatic_backup().await);
    }

    #[tokio::test]
    async fn test_automatic_backup_start_stop() {
        let (_dir, service) = setup(30).await;
        let service = service.with_interval(Duration::from_millis(50));

        assert!(service.start_automatic_backup().await);
        assert!(!service.start_automatic_backup().await);
        assert!(service.is_running().await);

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(service.stop_automatic_backup().await);
        assert!(!service.stop_automatic_backup().await);
        assert!(!service.is_running().await);

        let taken = service.list_backups().await.unwrap().len();
        assert!(taken >= 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(service.list_backups().await.unwrap().len(), taken);
    }
}
