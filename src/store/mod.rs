// src/store/mod.rs
pub mod memory;
pub mod postgres;
pub mod table;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::product::Product;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;
pub use table::{TableName, TableNameError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed product id `{0}`")]
    MalformedId(String),
}

/// Storage gateway for the products table.
///
/// Ids arrive exactly as the client sent them; parsing them is the store's
/// job, so a bad id surfaces as a [`StoreError`] rather than a not-found.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every row, in whatever order the store returns them.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Overwrites both prices. Returns the number of rows touched (0 or 1).
    async fn update_by_id(
        &self,
        id: &str,
        purchase_price: f64,
        sale_price: f64,
    ) -> Result<u64, StoreError>;
}
