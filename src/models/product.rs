use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub purchase_price: f64,
    pub sale_price: f64,
}

impl Product {
    pub fn new(id: i64, purchase_price: f64, sale_price: f64) -> Self {
        Self { id, purchase_price, sale_price }
    }
}
