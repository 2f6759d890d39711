//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! Items refer to suppliers by name inside their price map. Renaming or
//! deleting a supplier here leaves those keys as they are.

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use compras_core::Supplier;

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: i64,
    name: String,
    cnpj: String,
    seller_name: String,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: Some(row.id),
            name: row.name,
            cnpj: row.cnpj,
            seller_name: row.seller_name,
        }
    }
}

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Inserts a supplier and returns its id.
    pub async fn create(&self, supplier: &Supplier) -> DbResult<i64> {
        debug!(name = %supplier.name, "Creating supplier");

        let result =
            sqlx::query("INSERT INTO suppliers (name, cnpj, seller_name) VALUES (?1, ?2, ?3)")
                .bind(&supplier.name)
                .bind(&supplier.cnpj)
                .bind(&supplier.seller_name)
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        debug!(id, "Fetching supplier");

        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, cnpj, seller_name FROM suppliers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Supplier::from))
    }

    /// All suppliers, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, cnpj, seller_name FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Supplier names in alphabetical order, for selection lists.
    pub async fn get_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM suppliers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }

    /// Rewrites a stored supplier. Item price maps are not touched.
    pub async fn update(&self, supplier: &Supplier) -> DbResult<()> {
        let id = supplier.id.ok_or_else(|| DbError::missing_id("Supplier"))?;
        debug!(id, "Updating supplier");

        let result = sqlx::query(
            "UPDATE suppliers SET name = ?2, cnpj = ?3, seller_name = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&supplier.name)
        .bind(&supplier.cnpj)
        .bind(&supplier.seller_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use compras_core::{Item, Supplier, SupplierPrices};

    #[tokio::test]
    async fn test_names_are_sorted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        for name in ["Zeta Ferragens", "Alfa Parafusos", "Metalúrgica Beta"] {
            repo.create(&Supplier::new(name, "11.222.333/0001-81", "Carlos"))
                .await
                .unwrap();
        }

        assert_eq!(
            repo.get_names().await.unwrap(),
            vec!["Alfa Parafusos", "Metalúrgica Beta", "Zeta Ferragens"]
        );
        assert_eq!(repo.get_all().await.unwrap()[0].name, "Alfa Parafusos");
    }

    #[tokio::test]
    async fn test_rename_leaves_item_keys_untouched() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let id = repo
            .create(&Supplier::new("Fornecedor A", "11.222.333/0001-81", "Carlos"))
            .await
            .unwrap();
        let item_id = db
            .items()
            .create(&Item::new(
                "Parafuso",
                "P001",
                "ABC",
                1.0,
                SupplierPrices::single("Fornecedor A", 2.0),
            ))
            .await
            .unwrap();

        let mut supplier = repo.get_by_id(id).await.unwrap().unwrap();
        supplier.name = "Fornecedor Novo".to_string();
        repo.update(&supplier).await.unwrap();

        let item = db.items().get_by_id(item_id).await.unwrap().unwrap();
        assert!(item.prices.contains("Fornecedor A"));

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert_eq!(db.items().get_by_supplier("Fornecedor A").await.unwrap().len(), 1);
    }
}
