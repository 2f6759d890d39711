//! # Spreadsheet Import
//!
//! Normalises spreadsheet rows and plans how they merge into existing items.
//!
//! ## Merge Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SpreadsheetRow (raw text)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize_row: trim, upper-case description/brand, blank brand → N/A  │
//! │       │                                                                 │
//! │       ├── missing description/code/supplier ──► skipped                │
//! │       ├── validate_spreadsheet_row errors ────► skipped                │
//! │       ▼                                                                 │
//! │  NormalizedRow                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  match (description, code, brand), case-insensitive                    │
//! │       │                                                                 │
//! │       ├── found  → prices[supplier] = price, quantity replaced         │
//! │       └── absent → new item, status To Buy                             │
//! │       │                                                                 │
//! │       └── validate_item errors on the result ───► skipped              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are applied in order, so a later row can match an item created by an
//! earlier row of the same file. The status column is ignored.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::prices::SupplierPrices;
use crate::types::{brand_or_default, Item};
use crate::validation::{parse_decimal, validate_item, validate_spreadsheet_row, ValidationConfig};

/// Column order of the spreadsheet layout (import and export).
pub const SPREADSHEET_HEADER: [&str; 7] = [
    "description",
    "code",
    "brand",
    "supplier",
    "price",
    "quantity",
    "status",
];

/// One spreadsheet row as read from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetRow {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub status: String,
}

/// A row that passed normalisation and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub description: String,
    pub code: String,
    pub brand: String,
    pub supplier: String,
    pub price: f64,
    pub quantity: f64,
}

impl NormalizedRow {
    /// Applies this row to a matching item.
    pub fn merge_into(&self, item: &mut Item) {
        item.prices.insert(self.supplier.clone(), self.price);
        item.quantity = self.quantity;
    }

    /// Builds the new `To Buy` item for an unmatched row.
    pub fn into_item(self) -> Item {
        Item::new(
            self.description,
            self.code,
            self.brand,
            self.quantity,
            SupplierPrices::single(self.supplier, self.price),
        )
    }
}

/// Normalises and validates one row.
///
/// ## Example
/// ```rust
/// use compras_core::import::{normalize_row, SpreadsheetRow};
/// use compras_core::validation::ValidationConfig;
///
/// let row = SpreadsheetRow {
///     description: " parafuso ".into(),
///     code: "P001".into(),
///     brand: "".into(),
///     supplier: "Fornecedor A".into(),
///     price: "R$ 5,50".into(),
///     quantity: "10".into(),
///     status: "".into(),
/// };
/// let normalized = normalize_row(&row, &ValidationConfig::default()).unwrap();
/// assert_eq!(normalized.description, "PARAFUSO");
/// assert_eq!(normalized.brand, "N/A");
/// assert_eq!(normalized.price, 5.5);
/// ```
pub fn normalize_row(
    row: &SpreadsheetRow,
    config: &ValidationConfig,
) -> Result<NormalizedRow, Vec<ValidationError>> {
    let description = row.description.trim().to_uppercase();
    let code = row.code.trim().to_string();
    let brand = brand_or_default(row.brand.trim().to_uppercase());
    let supplier = row.supplier.trim().to_string();
    let price = row.price.trim();
    let quantity = row.quantity.trim();

    let mut missing = Vec::new();
    for (value, field) in [
        (&description, "Description"),
        (&code, "Code"),
        (&supplier, "Supplier"),
    ] {
        if value.is_empty() {
            missing.push(ValidationError::required(field));
        }
    }
    if !missing.is_empty() {
        return Err(missing);
    }

    let columns = [
        description.as_str(),
        code.as_str(),
        brand.as_str(),
        supplier.as_str(),
        price,
        quantity,
    ];
    let errors = validate_spreadsheet_row(&columns, config);
    if !errors.is_empty() {
        return Err(errors);
    }

    let price = parse_decimal(price).ok_or_else(|| {
        vec![ValidationError::NotANumber {
            field: "Price".to_string(),
        }]
    })?;
    let quantity = parse_decimal(quantity).ok_or_else(|| {
        vec![ValidationError::NotANumber {
            field: "Quantity".to_string(),
        }]
    })?;

    Ok(NormalizedRow {
        description,
        code,
        brand,
        supplier,
        price,
        quantity,
    })
}

// =============================================================================
// Import Plan
// =============================================================================

/// A row that was not imported.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub reasons: Vec<ValidationError>,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.reasons.iter().map(ToString::to_string).collect();
        write!(f, "row {}: {}", self.row, reasons.join("; "))
    }
}

/// Counts reported after an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    /// Rows merged into an item that already existed (or was created by an
    /// earlier row).
    pub updated: usize,
    /// Rows that created a new item.
    pub added: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Writes an import needs to perform.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Existing items (with ids) whose prices or quantity changed.
    pub updates: Vec<Item>,
    /// New items to insert, in row order.
    pub creates: Vec<Item>,
    pub summary: ImportSummary,
}

/// Plans the merge of `rows` into `existing` without touching storage.
///
/// ## Example
/// ```rust
/// use compras_core::import::{plan_import, SpreadsheetRow};
/// use compras_core::validation::ValidationConfig;
///
/// let row = |supplier: &str, price: &str| SpreadsheetRow {
///     description: "Parafuso".into(),
///     code: "P001".into(),
///     brand: "ABC".into(),
///     supplier: supplier.into(),
///     price: price.into(),
///     quantity: "10".into(),
///     status: String::new(),
/// };
///
/// let plan = plan_import(&[], &[row("A", "5,50"), row("B", "4,00")], &ValidationConfig::default());
/// assert_eq!(plan.creates.len(), 1);
/// assert_eq!(plan.creates[0].prices.len(), 2);
/// assert_eq!((plan.summary.added, plan.summary.updated), (1, 1));
/// ```
pub fn plan_import(
    existing: &[Item],
    rows: &[SpreadsheetRow],
    config: &ValidationConfig,
) -> ImportPlan {
    let mut working: Vec<Item> = existing.to_vec();
    let mut touched = BTreeSet::new();
    let mut summary = ImportSummary::default();

    for (index, row) in rows.iter().enumerate() {
        let normalized = match normalize_row(row, config) {
            Ok(normalized) => normalized,
            Err(reasons) => {
                summary.skipped.push(SkippedRow {
                    row: index + 1,
                    reasons,
                });
                continue;
            }
        };

        let found = working.iter().position(|item| {
            item.matches_identity(&normalized.description, &normalized.code, &normalized.brand)
        });

        let candidate = match found {
            Some(position) => {
                let mut merged = working[position].clone();
                normalized.merge_into(&mut merged);
                merged
            }
            None => normalized.into_item(),
        };

        let reasons = validate_item(&candidate, config);
        if !reasons.is_empty() {
            summary.skipped.push(SkippedRow {
                row: index + 1,
                reasons,
            });
            continue;
        }

        match found {
            Some(position) => {
                working[position] = candidate;
                if position < existing.len() {
                    touched.insert(position);
                }
                summary.updated += 1;
            }
            None => {
                working.push(candidate);
                summary.added += 1;
            }
        }
    }

    let creates = working.split_off(existing.len());
    let updates = touched.into_iter().map(|i| working[i].clone()).collect();

    ImportPlan {
        updates,
        creates,
        summary,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
