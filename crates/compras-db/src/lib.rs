//! # compras-db: Database Layer for Compras
//!
//! This crate provides database access for Compras using a single SQLite
//! file and sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Compras Data Flow                                │
//! │                                                                         │
//! │  CLI command (item list --supplier "Fornecedor A")                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    compras-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepo      │    │ 001_initial_ │  │   │
//! │  │   │ SqlitePool    │◄───│ CompanyRepo   │    │ schema.sql   │  │   │
//! │  │   │               │    │ SupplierRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   import.rs: applies compras-core import plans                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        <platform data dir>/compras.db (DELETE journal)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use compras_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("compras.db")).await?;
//! let to_buy = db.items().get_by_status(ItemStatus::ToBuy).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use import::import_rows;
pub use migrations::REQUIRED_TABLES;
pub use pool::{Database, DbConfig};

pub use repository::company::CompanyRepository;
pub use repository::item::ItemRepository;
pub use repository::supplier::SupplierRepository;
