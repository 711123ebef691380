use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::{Result, SaleRecord};

/// SQLite-backed sales store.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct SalesStore {
    pool: SqlitePool,
}

impl SalesStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `url` and wraps it in a pool.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Inserts records without touching existing rows.
    ///
    /// All inserts run in one transaction: either every record lands or
    /// none do.
    pub async fn append(&self, records: &[SaleRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        insert_all(&mut tx, records).await?;
        tx.commit().await?;

        tracing::debug!(rows = records.len(), "appended sale records");
        Ok(records.len() as u64)
    }

    /// Empties the fact table and inserts the given records.
    ///
    /// Delete and inserts share one transaction, so a failure partway
    /// leaves the table in its prior state.
    pub async fn replace(&self, records: &[SaleRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM sales").execute(&mut *tx).await?;
        insert_all(&mut tx, records).await?;
        tx.commit().await?;

        tracing::debug!(rows = records.len(), "replaced sale records");
        Ok(records.len() as u64)
    }

    /// Number of rows currently in the fact table.
    pub async fn row_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

async fn insert_all(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    records: &[SaleRecord],
) -> Result<()> {
    for record in records {
        sqlx::query(
            r#"
            INSERT INTO sales
                (order_id, product, category, region, customer_id, sale_date,
                 quantity, unit_price, revenue)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.order_id)
        .bind(&record.product)
        .bind(&record.category)
        .bind(&record.region)
        .bind(&record.customer_id)
        .bind(record.sale_date)
        .bind(record.quantity)
        .bind(record.unit_price)
        .bind(record.revenue())
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SalesStore {
        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SalesStore::new(pool);
        store.run_migrations().await.unwrap();
        store
    }

    fn record(order_id: &str, quantity: i64, unit_price: f64) -> SaleRecord {
        SaleRecord {
            order_id: order_id.to_string(),
            product: "Widget".to_string(),
            category: "Hardware".to_string(),
            region: "North".to_string(),
            customer_id: "CUST-1".to_string(),
            sale_date: "2024-01-05".parse().unwrap(),
            quantity,
            unit_price,
        }
    }

    #[tokio::test]
    async fn append_accumulates_rows() {
        let store = test_store().await;
        let batch = vec![record("ORD-1", 2, 10.0), record("ORD-2", 1, 5.0)];

        store.append(&batch).await.unwrap();
        assert_eq!(store.row_count().await.unwrap(), 2);

        store.append(&batch).await.unwrap();
        assert_eq!(store.row_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn replace_discards_prior_rows() {
        let store = test_store().await;
        store
            .append(&vec![record("ORD-1", 2, 10.0), record("ORD-2", 1, 5.0)])
            .await
            .unwrap();

        store.replace(&vec![record("ORD-3", 4, 2.5)]).await.unwrap();
        assert_eq!(store.row_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn replace_with_empty_batch_clears_table() {
        let store = test_store().await;
        store.append(&vec![record("ORD-1", 2, 10.0)]).await.unwrap();

        store.replace(&[]).await.unwrap();
        assert_eq!(store.row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn revenue_column_is_derived_on_insert() {
        let store = test_store().await;
        store
            .append(&vec![record("ORD-1", 2, 10.0), record("ORD-2", 1, 5.0)])
            .await
            .unwrap();

        let total: f64 = sqlx::query_scalar("SELECT SUM(revenue) FROM sales")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(total, 25.0);
    }
}
