// src/database.rs
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::{DatabaseConfig, DatabaseConnection};

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new().max_connections(config.max_connections);

    match &config.connection {
        DatabaseConnection::Url(url) => options.connect(url).await,
        DatabaseConnection::Parts { host, port, user, password, database } => {
            let connect = PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(database);
            options.connect_with(connect).await
        }
    }
}
