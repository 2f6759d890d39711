//! # Item Repository
//!
//! Database operations for items and their supplier quotes.
//!
//! ## Price Map Column
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items                                                                  │
//! │  ┌────┬─────────────┬──────┬───────┬─────────┬──────────┬────────────┐ │
//! │  │ id │ description │ code │ brand │ status  │ quantity │ suppliers_ │ │
//! │  │    │             │      │       │         │          │ prices     │ │
//! │  ├────┼─────────────┼──────┼───────┼─────────┼──────────┼────────────┤ │
//! │  │ 1  │ PARAFUSO    │ P001 │ ABC   │ to_buy  │ 10.0     │ {"Fornece- │ │
//! │  │    │             │      │       │         │          │ dor A":5.5}│ │
//! │  └────┴─────────────┴──────┴───────┴─────────┴──────────┴────────────┘ │
//! │                                                                         │
//! │  write: SupplierPrices::to_json   read: SupplierPrices::from_json      │
//! │  A row whose JSON does not decode surfaces DbError::Serialization.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Supplier filtering decodes every row and checks for an exact key, so a
//! supplier named "Fornecedor A" never matches "Fornecedor AB".

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use compras_core::{Item, ItemStatistics, ItemStatus, SupplierPrices};

const SELECT_ITEMS: &str = r#"
    SELECT id, description, code, brand, status, quantity, suppliers_prices
    FROM items
"#;

/// Raw `items` row before the price map is decoded.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    description: String,
    code: String,
    brand: String,
    status: ItemStatus,
    quantity: f64,
    suppliers_prices: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> DbResult<Self> {
        let prices = SupplierPrices::from_json(&row.suppliers_prices).map_err(|e| {
            DbError::Serialization(format!("item {}: {}", row.id, e))
        })?;

        Ok(Item {
            id: Some(row.id),
            description: row.description,
            code: row.code,
            brand: row.brand,
            status: row.status,
            quantity: row.quantity,
            prices,
        })
    }
}

fn decode_all(rows: Vec<ItemRow>) -> DbResult<Vec<Item>> {
    rows.into_iter().map(Item::try_from).collect()
}

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let id = repo.create(&item).await?;
/// let quoted_by_a = repo.get_by_supplier("Fornecedor A").await?;
/// repo.update_status(id, ItemStatus::Purchased).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts an item and returns the id assigned by the store.
    ///
    /// The item's own `id` is ignored. The store accepts an empty price map;
    /// rejecting one is the validators' job.
    pub async fn create(&self, item: &Item) -> DbResult<i64> {
        debug!(description = %item.description, code = %item.code, "Creating item");

        let prices = item.prices.to_json()?;

        let result = sqlx::query(
            r#"
            INSERT INTO items (description, code, brand, status, quantity, suppliers_prices)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.description)
        .bind(&item.code)
        .bind(&item.brand)
        .bind(item.status)
        .bind(item.quantity)
        .bind(prices)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Item created");
        Ok(id)
    }

    /// Gets an item by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        debug!(id, "Fetching item");

        let row = sqlx::query_as::<_, ItemRow>(&format!("{} WHERE id = ?1", SELECT_ITEMS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Item::try_from).transpose()
    }

    /// All items, newest first.
    pub async fn get_all(&self) -> DbResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!("{} ORDER BY id DESC", SELECT_ITEMS))
            .fetch_all(&self.pool)
            .await?;

        let items = decode_all(rows)?;
        debug!(count = items.len(), "Fetched all items");
        Ok(items)
    }

    /// Items with the given status, newest first.
    pub async fn get_by_status(&self, status: ItemStatus) -> DbResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE status = ?1 ORDER BY id DESC",
            SELECT_ITEMS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        let items = decode_all(rows)?;
        debug!(status = %status, count = items.len(), "Fetched items by status");
        Ok(items)
    }

    /// Items whose price map has `supplier` as an exact key, newest first.
    pub async fn get_by_supplier(&self, supplier: &str) -> DbResult<Vec<Item>> {
        let items: Vec<Item> = self
            .get_all()
            .await?
            .into_iter()
            .filter(|item| item.prices.contains(supplier))
            .collect();

        debug!(supplier = %supplier, count = items.len(), "Fetched items by supplier");
        Ok(items)
    }

    /// Items with `status` that are also quoted by `supplier`.
    pub async fn get_by_status_and_supplier(
        &self,
        status: ItemStatus,
        supplier: &str,
    ) -> DbResult<Vec<Item>> {
        Ok(self
            .get_by_status(status)
            .await?
            .into_iter()
            .filter(|item| item.prices.contains(supplier))
            .collect())
    }

    /// First item matching (description, code, brand), ignoring case and
    /// surrounding whitespace.
    pub async fn find_by_identity(
        &self,
        description: &str,
        code: &str,
        brand: &str,
    ) -> DbResult<Option<Item>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|item| item.matches_identity(description, code, brand)))
    }

    /// Rewrites every column of a stored item.
    ///
    /// ## Returns
    /// * `Err(DbError::MissingId)` - The item was never stored
    /// * `Err(DbError::NotFound)` - No row has that id
    pub async fn update(&self, item: &Item) -> DbResult<()> {
        let id = item.id.ok_or_else(|| DbError::missing_id("Item"))?;
        debug!(id, "Updating item");

        let prices = item.prices.to_json()?;

        let result = sqlx::query(
            r#"
            UPDATE items SET
                description = ?2,
                code = ?3,
                brand = ?4,
                status = ?5,
                quantity = ?6,
                suppliers_prices = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&item.description)
        .bind(&item.code)
        .bind(&item.brand)
        .bind(item.status)
        .bind(item.quantity)
        .bind(prices)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Moves an item to a new status.
    pub async fn update_status(&self, id: i64, status: ItemStatus) -> DbResult<()> {
        debug!(id, status = %status, "Updating item status");

        let result = sqlx::query("UPDATE items SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes an item permanently.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Totals for the dashboard.
    pub async fn statistics(&self) -> DbResult<ItemStatistics> {
        let items = self.get_all().await?;
        Ok(ItemStatistics::from_items(&items))
    }

    /// Counts stored items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use compras_core::{Item, ItemStatus, SupplierPrices};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn parafuso() -> Item {
        Item::new(
            "Parafuso",
            "P001",
            "ABC",
            10.0,
            SupplierPrices::single("Fornecedor A", 5.5),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_all_total_value() {
        let db = db().await;
        let repo = db.items();

        let id = repo.create(&parafuso()).await.unwrap();

        let items = repo.get_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, Some(id));
        assert_eq!(items[0].total_value(), 55.0);
        assert_eq!(items[0].status, ItemStatus::ToBuy);
    }

    #[tokio::test]
    async fn test_price_map_survives_round_trip() {
        let db = db().await;
        let repo = db.items();

        let prices = SupplierPrices::from([
            ("Fornecedor A", 5.5),
            ("Fornecedor B", 4.99),
            ("Distribuidora São Paulo", 0.01),
        ]);
        let mut item = parafuso();
        item.prices = prices.clone();

        let id = repo.create(&item).await.unwrap();
        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.prices, prices);

        let mut empty = parafuso();
        empty.prices = SupplierPrices::new();
        let id = repo.create(&empty).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().unwrap().prices.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_is_newest_first() {
        let db = db().await;
        let repo = db.items();

        let first = repo.create(&parafuso()).await.unwrap();
        let second = repo.create(&parafuso()).await.unwrap();

        let ids: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![Some(second), Some(first)]);
    }

    #[tokio::test]
    async fn test_get_by_supplier_is_exact_key_match() {
        let db = db().await;
        let repo = db.items();

        let a = repo.create(&parafuso()).await.unwrap();

        let mut ab = parafuso();
        ab.prices = SupplierPrices::single("Fornecedor AB", 3.0);
        let ab = repo.create(&ab).await.unwrap();

        let mut both = parafuso();
        both.prices = SupplierPrices::from([("Fornecedor A", 1.0), ("Fornecedor B", 2.0)]);
        let both = repo.create(&both).await.unwrap();

        let ids: Vec<_> = repo
            .get_by_supplier("Fornecedor A")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![Some(both), Some(a)]);

        let ids: Vec<_> = repo
            .get_by_supplier("Fornecedor AB")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![Some(ab)]);

        assert!(repo.get_by_supplier("fornecedor a").await.unwrap().is_empty());
        assert!(repo.get_by_supplier("Fornecedor").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_filters_and_intersection() {
        let db = db().await;
        let repo = db.items();

        let a = repo.create(&parafuso()).await.unwrap();
        let mut other = parafuso();
        other.prices = SupplierPrices::single("Fornecedor B", 2.0);
        let b = repo.create(&other).await.unwrap();

        repo.update_status(a, ItemStatus::Purchased).await.unwrap();
        repo.update_status(b, ItemStatus::Purchased).await.unwrap();

        assert_eq!(repo.get_by_status(ItemStatus::Purchased).await.unwrap().len(), 2);
        assert!(repo.get_by_status(ItemStatus::ToBuy).await.unwrap().is_empty());

        let both = repo
            .get_by_status_and_supplier(ItemStatus::Purchased, "Fornecedor B")
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, Some(b));

        assert!(repo
            .get_by_status_and_supplier(ItemStatus::ToBuy, "Fornecedor B")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_and_missing_rows() {
        let db = db().await;
        let repo = db.items();

        let id = repo.create(&parafuso()).await.unwrap();
        let mut item = repo.get_by_id(id).await.unwrap().unwrap();
        item.quantity = 3.5;
        item.prices.insert("Fornecedor B", 4.0);
        repo.update(&item).await.unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 3.5);
        assert_eq!(stored.prices.len(), 2);

        item.id = Some(9999);
        assert!(repo.update(&item).await.unwrap_err().is_not_found());

        item.id = None;
        assert!(matches!(
            repo.update(&item).await,
            Err(DbError::MissingId { .. })
        ));

        assert!(repo
            .update_status(9999, ItemStatus::Purchased)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let db = db().await;
        let repo = db.items();

        let id = repo.create(&parafuso()).await.unwrap();
        repo.delete(id).await.unwrap();

        for _ in 0..3 {
            assert!(repo.get_by_id(id).await.unwrap().is_none());
        }
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_identity_ignores_case() {
        let db = db().await;
        let repo = db.items();

        let id = repo.create(&parafuso()).await.unwrap();

        let found = repo.find_by_identity("PARAFUSO", "p001", "abc").await.unwrap();
        assert_eq!(found.and_then(|i| i.id), Some(id));
        assert!(repo
            .find_by_identity("PARAFUSO", "P001", "XYZ")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_corrupt_price_map_is_a_serialization_error() {
        let db = db().await;
        let repo = db.items();

        let id = repo.create(&parafuso()).await.unwrap();
        sqlx::query("UPDATE items SET suppliers_prices = 'not json' WHERE id = ?1")
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            repo.get_by_id(id).await,
            Err(DbError::Serialization(_))
        ));
        assert!(matches!(repo.get_all().await, Err(DbError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_statistics() {
        let db = db().await;
        let repo = db.items();

        let a = repo.create(&parafuso()).await.unwrap();
        repo.create(&parafuso()).await.unwrap();
        repo.update_status(a, ItemStatus::PartiallyPurchased).await.unwrap();

        let stats = repo.statistics().await.unwrap();
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.count(ItemStatus::ToBuy), 1);
        assert_eq!(stats.count(ItemStatus::PartiallyPurchased), 1);
        assert_eq!(stats.total_value, 110.0);
    }
}
