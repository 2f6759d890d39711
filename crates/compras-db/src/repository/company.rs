//! # Company Repository
//!
//! Database operations for the buying company.
//!
//! Several companies may be stored; purchase orders use the one with the
//! lowest id (see [`CompanyRepository::get_default`]).

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use compras_core::Company;

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: i64,
    name: String,
    cnpj: String,
    buyer_name: String,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: Some(row.id),
            name: row.name,
            cnpj: row.cnpj,
            buyer_name: row.buyer_name,
        }
    }
}

/// Repository for company database operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Inserts a company and returns its id.
    pub async fn create(&self, company: &Company) -> DbResult<i64> {
        debug!(name = %company.name, "Creating company");

        let result = sqlx::query("INSERT INTO company (name, cnpj, buyer_name) VALUES (?1, ?2, ?3)")
            .bind(&company.name)
            .bind(&company.cnpj)
            .bind(&company.buyer_name)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Company>> {
        debug!(id, "Fetching company");

        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, cnpj, buyer_name FROM company WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Company::from))
    }

    /// All companies, newest first.
    pub async fn get_all(&self) -> DbResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, cnpj, buyer_name FROM company ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// The company printed on purchase orders: the lowest id.
    ///
    /// ## Returns
    /// * `Ok(None)` - No company registered yet
    pub async fn get_default(&self) -> DbResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, cnpj, buyer_name FROM company ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Company::from))
    }

    /// Rewrites a stored company.
    pub async fn update(&self, company: &Company) -> DbResult<()> {
        let id = company.id.ok_or_else(|| DbError::missing_id("Company"))?;
        debug!(id, "Updating company");

        let result = sqlx::query(
            "UPDATE company SET name = ?2, cnpj = ?3, buyer_name = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&company.name)
        .bind(&company.cnpj)
        .bind(&company.buyer_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Company", id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting company");

        let result = sqlx::query("DELETE FROM company WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Company", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use compras_core::Company;

    #[tokio::test]
    async fn test_default_is_lowest_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();

        assert!(repo.get_default().await.unwrap().is_none());

        let first = repo
            .create(&Company::new("ACME", "11.222.333/0001-81", "Maria"))
            .await
            .unwrap();
        let second = repo
            .create(&Company::new("Filial", "45.997.418/0001-53", "João"))
            .await
            .unwrap();

        assert_eq!(repo.get_default().await.unwrap().unwrap().id, Some(first));

        let ids: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Some(second), Some(first)]);

        repo.delete(first).await.unwrap();
        assert_eq!(repo.get_default().await.unwrap().unwrap().id, Some(second));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();

        let id = repo
            .create(&Company::new("ACME", "11.222.333/0001-81", "Maria"))
            .await
            .unwrap();

        let mut company = repo.get_by_id(id).await.unwrap().unwrap();
        company.buyer_name = "Ana".to_string();
        repo.update(&company).await.unwrap();
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().buyer_name, "Ana");

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
        assert!(repo.update(&company).await.unwrap_err().is_not_found());
    }
}
