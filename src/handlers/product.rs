// src/handlers/product.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::dtos::product::UpdatePricesRequest;
use crate::error::AppError;
use crate::models::product::Product;
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product not found";

// GET /products - List all products
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.products.list_all().await?;
    Ok(Json(products))
}

// GET /product/{id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(PRODUCT_NOT_FOUND))?;

    Ok(Json(product))
}

// PUT /product/{id} - Update purchase and sale prices
#[instrument(skip(state, payload))]
pub async fn update_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    // An unreadable body is judged like an empty one.
    let request = match payload {
        Ok(Json(body)) => UpdatePricesRequest::from_json(body),
        Err(rejection) => {
            debug!(%rejection, "Unreadable update body");
            UpdatePricesRequest::default()
        }
    };
    let update = request.into_update()?;

    let updated = state
        .products
        .update_by_id(&id, update.purchase_price, update.sale_price)
        .await?;

    if updated == 0 {
        return Err(AppError::not_found(PRODUCT_NOT_FOUND));
    }

    info!(
        purchase_price = update.purchase_price,
        sale_price = update.sale_price,
        "Product prices updated"
    );
    Ok(StatusCode::NO_CONTENT)
}
