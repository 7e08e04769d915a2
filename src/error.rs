// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    NotFound(String),
    /// Reported through the generic failure path, not as a 400.
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::NotFound(msg) => json!({ "message": msg }),
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                json!({ "error": "Database error occurred" })
            }
            AppError::Validation(msg) => {
                tracing::warn!(%msg, "Rejected request");
                json!({ "error": msg })
            }
        };

        (status, Json(body)).into_response()
    }
}
