// src/dtos/product.rs
use serde_json::{Map, Value};

use crate::error::AppError;

/// Body of `PUT /product/{id}`.
///
/// Fields are kept as raw JSON so presence is judged by truthiness: a
/// missing field, `null`, `false`, `0` and `""` all count as empty.
#[derive(Debug, Default)]
pub struct UpdatePricesRequest {
    pub purchase_price: Value,
    pub sale_price: Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceUpdate {
    pub purchase_price: f64,
    pub sale_price: f64,
}

impl UpdatePricesRequest {
    /// Only a JSON object carries fields; any other body reads as empty.
    pub fn from_json(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self {
                purchase_price: take(&mut fields, "purchasePrice"),
                sale_price: take(&mut fields, "salePrice"),
            },
            _ => Self::default(),
        }
    }

    pub fn into_update(self) -> Result<PriceUpdate, AppError> {
        if !is_truthy(&self.purchase_price) || !is_truthy(&self.sale_price) {
            return Err(AppError::validation("Parameters empty"));
        }

        Ok(PriceUpdate {
            purchase_price: coerce_price(&self.purchase_price)?,
            sale_price: coerce_price(&self.sale_price)?,
        })
    }
}

fn take(fields: &mut Map<String, Value>, key: &str) -> Value {
    fields.remove(key).unwrap_or(Value::Null)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Numeric strings are accepted the way the database would cast them.
fn coerce_price(value: &Value) -> Result<f64, AppError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::validation(format!("Invalid price value: {value}")))
}
