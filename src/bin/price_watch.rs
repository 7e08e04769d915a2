// src/bin/price_watch.rs
use std::process::ExitCode;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use products_api::config::{DatabaseConfig, WatchConfig};
use products_api::database;
use products_api::server::{self, shutdown_signal};
use products_api::store::{PgProductStore, ProductStore};
use products_api::watch;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (database_config, watch_config) = match (DatabaseConfig::from_env(), WatchConfig::from_env()) {
        (Ok(database), Ok(watch)) => (database, watch),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let db_pool = match database::create_pool(&database_config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return ExitCode::FAILURE;
        }
    };
    let store = PgProductStore::new(db_pool, &database_config.table);
    let pool = store.pool().clone();
    let products: Arc<dyn ProductStore> = Arc::new(store);

    let listener = match server::bind(&watch_config.host, watch_config.port).await {
        Ok(listener) => listener,
        Err(_) => return ExitCode::FAILURE,
    };
    tracing::info!(
        poll_ms = watch_config.poll_interval.as_millis() as u64,
        "Price watch ready"
    );

    let result = tokio::select! {
        served = watch::serve(listener, products, watch_config.poll_interval) => served,
        _ = shutdown_signal() => Ok(()),
    };
    pool.close().await;

    match result {
        Ok(()) => {
            tracing::info!("Price watch stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Price watch failed");
            ExitCode::FAILURE
        }
    }
}
