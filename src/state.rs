// src/state.rs
use std::sync::Arc;

use crate::store::ProductStore;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }
}
