//! # Repository Module
//!
//! Database repository implementations for Compras.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.items().get_by_supplier("Fornecedor A")                    │
//! │       ▼                                                                 │
//! │  ItemRepository / CompanyRepository / SupplierRepository              │
//! │  ├── create(&self, value)   → id                                       │
//! │  ├── get_by_id(&self, id)   → Option<value>                            │
//! │  ├── get_all(&self)         → Vec<value>                               │
//! │  ├── update(&self, value)   → NotFound if no row matched               │
//! │  └── delete(&self, id)      → NotFound if no row matched               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call decodes fresh values; repositories cache nothing.
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Items, supplier filters, statistics
//! - [`CompanyRepository`](company::CompanyRepository) - Buying company, default lookup
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers and name lists

pub mod company;
pub mod item;
pub mod supplier;
