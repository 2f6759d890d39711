//! # compras-core: Purchasing Domain Logic
//!
//! Items, supplier quotes, companies, suppliers, and every rule that can be
//! checked without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Compras Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    compras CLI (apps/cli)                       │   │
//! │  │    item / company / supplier / import / order / backup         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ compras-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  prices   │  │   cnpj    │  │ validation│  │   │
//! │  │   │   Item    │  │ Supplier  │  │ checksum  │  │   rules   │  │   │
//! │  │   │  Company  │  │  Prices   │  │  format   │  │  config   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                │   │
//! │  │   │  import   │  │  report   │                                │   │
//! │  │   │ row merge │  │  orders   │                                │   │
//! │  │   └───────────┘  └───────────┘                                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        compras-db (SQLite)        compras-backup (snapshots)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Item, Company, Supplier, ItemStatus, ItemStatistics
//! - [`prices`] - Supplier name → price map
//! - [`cnpj`] - CNPJ checksum and formatting
//! - [`validation`] - Field and composite validators
//! - [`import`] - Spreadsheet row normalisation and merge planning
//! - [`report`] - Purchase order text and export rows
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use compras_core::{Item, SupplierPrices};
//! use compras_core::validation::{validate_item, ValidationConfig};
//!
//! let item = Item::new("Parafuso", "P001", "ABC", 10.0, SupplierPrices::single("Fornecedor A", 5.5));
//!
//! assert!(validate_item(&item, &ValidationConfig::default()).is_empty());
//! assert_eq!(item.total_value(), 55.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cnpj;
pub mod error;
pub mod import;
pub mod prices;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use prices::SupplierPrices;
pub use types::*;
pub use validation::ValidationConfig;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Brand stored when none is given.
pub const NOT_AVAILABLE: &str = "N/A";
