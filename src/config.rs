// src/config.rs
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::store::{TableName, TableNameError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("DB_TABLE is invalid: {0}")]
    Table(#[from] TableNameError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    /// `None` keeps the drift task switched off.
    pub drift_interval: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection: DatabaseConnection,
    pub table: TableName,
    pub max_connections: u32,
}

#[derive(Clone)]
pub enum DatabaseConnection {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
}

// Keeps credentials out of logs.
impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseConnection::Url(_) => f.write_str("Url(..)"),
            DatabaseConnection::Parts { host, port, user, database, .. } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

/// The TCP price-watch server's settings.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub host: String,
    pub port: u16,
    /// How often each watched product is re-read.
    pub poll_interval: Duration,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = non_blank(&lookup);

        let http = HttpConfig {
            host: var("HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or("PORT", var("PORT"), 3000)?,
        };

        let drift_ms: u64 = parse_or("DRIFT_INTERVAL_MS", var("DRIFT_INTERVAL_MS"), 0)?;
        let drift_interval = (drift_ms > 0).then(|| Duration::from_millis(drift_ms));

        Ok(Self {
            http,
            database: DatabaseConfig::from_lookup(&lookup)?,
            drift_interval,
        })
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = non_blank(&lookup);

        let connection = match var("DATABASE_URL") {
            Some(url) => DatabaseConnection::Url(url),
            None => DatabaseConnection::Parts {
                host: var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or("DB_PORT", var("DB_PORT"), 5432)?,
                user: var("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: var("DB_DATABASE").ok_or(ConfigError::Missing("DB_DATABASE"))?,
            },
        };

        Ok(Self {
            connection,
            table: var("DB_TABLE").as_deref().unwrap_or("products").parse()?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), 5)?,
        })
    }
}

impl WatchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = non_blank(&lookup);

        let poll_ms: u64 = parse_or("WATCH_INTERVAL_MS", var("WATCH_INTERVAL_MS"), 10_000)?;
        if poll_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "WATCH_INTERVAL_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            host: var("SOCKET_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or("SOCKET_PORT", var("SOCKET_PORT"), 8050)?,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

/// Blank values count as unset.
fn non_blank<F>(lookup: &F) -> impl Fn(&str) -> Option<String> + '_
where
    F: Fn(&str) -> Option<String>,
{
    move |name: &str| lookup(name).filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("`{raw}`: {e}"),
        }),
        None => Ok(default),
    }
}
