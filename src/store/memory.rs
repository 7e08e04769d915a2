// src/store/memory.rs
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ProductStore, StoreError};
use crate::models::product::Product;

/// In-process products table, keyed and ordered by id.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    rows: RwLock<BTreeMap<i64, Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let rows = products.into_iter().map(|p| (p.id, p)).collect();
        Self { rows: RwLock::new(rows) }
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.rows.read().await.values().cloned().collect()
    }
}

fn parse_id(id: &str) -> Result<i64, StoreError> {
    id.trim()
        .parse()
        .map_err(|_| StoreError::MalformedId(id.to_string()))
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.snapshot().await)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update_by_id(
        &self,
        id: &str,
        purchase_price: f64,
        sale_price: f64,
    ) -> Result<u64, StoreError> {
        let id = parse_id(id)?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(product) => {
                product.purchase_price = purchase_price;
                product.sale_price = sale_price;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
