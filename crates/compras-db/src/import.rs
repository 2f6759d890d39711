//! # Import Application
//!
//! Writes a spreadsheet import planned by `compras_core::import`.
//!
//! ```text
//! rows ──► plan_import(existing items, rows) ──► updates ──► ItemRepository::update
//!                                           └──► creates ──► ItemRepository::create
//! ```
//!
//! There is no surrounding transaction: a failure part-way leaves the rows
//! written so far in place.

use tracing::{info, warn};

use compras_core::import::{plan_import, ImportSummary, SpreadsheetRow};
use compras_core::ValidationConfig;

use crate::error::DbResult;
use crate::pool::Database;

/// Merges spreadsheet rows into the item table.
pub async fn import_rows(
    db: &Database,
    rows: &[SpreadsheetRow],
    config: &ValidationConfig,
) -> DbResult<ImportSummary> {
    let items = db.items();
    let existing = items.get_all().await?;

    let plan = plan_import(&existing, rows, config);

    for item in &plan.updates {
        items.update(item).await?;
    }
    for item in &plan.creates {
        items.create(item).await?;
    }

    for skipped in &plan.summary.skipped {
        warn!(row = skipped.row, reasons = %skipped, "Skipped spreadsheet row");
    }

    info!(
        updated = plan.summary.updated,
        added = plan.summary.added,
        skipped = plan.summary.skipped.len(),
        "Import complete"
    );

    Ok(plan.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use compras_core::{Item, ItemStatus, SupplierPrices};

    fn row(supplier: &str, price: &str, quantity: &str) -> SpreadsheetRow {
        SpreadsheetRow {
            description: "parafuso sextavado".to_string(),
            code: "P001".to_string(),
            brand: "abc".to_string(),
            supplier: supplier.to_string(),
            price: price.to_string(),
            quantity: quantity.to_string(),
            status: String::new(),
        }
    }

    #[tokio::test]
    async fn test_matching_row_updates_existing_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = db
            .items()
            .create(&Item::new(
                "PARAFUSO SEXTAVADO",
                "P001",
                "ABC",
                5.0,
                SupplierPrices::single("Fornecedor A", 5.5),
            ))
            .await
            .unwrap();

        let summary = import_rows(&db, &[row("Fornecedor B", "R$ 4,90", "12")], &ValidationConfig::default())
            .await
            .unwrap();

        assert_eq!((summary.updated, summary.added), (1, 0));
        assert_eq!(db.items().count().await.unwrap(), 1);

        let item = db.items().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(item.prices.get("Fornecedor A"), Some(5.5));
        assert_eq!(item.prices.get("Fornecedor B"), Some(4.9));
        assert_eq!(item.quantity, 12.0);
    }

    #[tokio::test]
    async fn test_unmatched_row_creates_one_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let rows = [
            row("Fornecedor A", "5,50", "10"),
            row("Fornecedor B", "6", "10"),
            row("", "1", "1"),
        ];
        let summary = import_rows(&db, &rows, &ValidationConfig::default())
            .await
            .unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped.len(), 1);

        let items = db.items().get_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "PARAFUSO SEXTAVADO");
        assert_eq!(items[0].brand, "ABC");
        assert_eq!(items[0].status, ItemStatus::ToBuy);
        assert_eq!(items[0].prices.len(), 2);
    }

    #[tokio::test]
    async fn test_non_positive_values_never_reach_the_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ValidationConfig {
            min_price: -100.0,
            min_quantity: -100.0,
            ..Default::default()
        };

        let summary = import_rows(&db, &[row("Fornecedor A", "-5", "-3")], &config)
            .await
            .unwrap();

        assert_eq!((summary.updated, summary.added), (0, 0));
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(db.items().count().await.unwrap(), 0);
    }
}
