use axum::{routing::get, Router};
use crate::handlers::product::{get_products, get_product, update_product};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(get_products))
        .route("/product/{id}", get(get_product).put(update_product))
}
