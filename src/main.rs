// src/main.rs
use std::process::ExitCode;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use products_api::config::Config;
use products_api::store::{PgProductStore, ProductStore};
use products_api::server::{self, shutdown_signal};
use products_api::{database, drift, routes, state};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(table = %config.database.table, "Configuration loaded");

    // Create database pool
    let db_pool = match database::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return ExitCode::FAILURE;
        }
    };
    let store = PgProductStore::new(db_pool, &config.database.table);
    let pool = store.pool().clone();
    let products: Arc<dyn ProductStore> = Arc::new(store);

    let drift_task = config
        .drift_interval
        .map(|period| drift::spawn(products.clone(), period));

    let app = routes::create_router(state::AppState::new(products));

    let listener = match server::bind(&config.http.host, config.http.port).await {
        Ok(listener) => listener,
        Err(_) => return ExitCode::FAILURE,
    };

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(task) = drift_task {
        task.abort();
    }
    pool.close().await;

    match served {
        Ok(()) => {
            tracing::info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
