// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{ProductStore, StoreError, TableName};
use crate::models::product::Product;

/// Columns are cast so the row decodes the same whether the table stores
/// prices as NUMERIC, REAL or INTEGER.
const SELECT_COLUMNS: &str = "id::INT8 AS id,
                purchaseprice::FLOAT8 AS purchase_price,
                saleprice::FLOAT8     AS sale_price";

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
    list_sql: String,
    get_sql: String,
    update_sql: String,
}

impl PgProductStore {
    pub fn new(pool: PgPool, table: &TableName) -> Self {
        Self {
            pool,
            list_sql: format!("SELECT {SELECT_COLUMNS} FROM {table}"),
            get_sql: format!("SELECT {SELECT_COLUMNS} FROM {table} WHERE id = $1::INT8"),
            update_sql: format!(
                "UPDATE {table} SET purchaseprice = $1, saleprice = $2 WHERE id = $3::INT8"
            ),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&self.list_sql)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&self.get_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn update_by_id(
        &self,
        id: &str,
        purchase_price: f64,
        sale_price: f64,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(&self.update_sql)
            .bind(purchase_price)
            .bind(sale_price)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
