// src/watch.rs
//! TCP price watch. A client connects and sends a product id; the server
//! re-reads that product on a fixed period and pushes its JSON every time
//! either price changes.
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::models::product::Product;
use crate::store::{ProductStore, StoreError};

/// Longest id request read from a client.
pub const MAX_REQUEST_LEN: usize = 16;

pub const NOT_FOUND_REPLY: &[u8] = b"Product not found";
pub const SERVER_ERROR_REPLY: &[u8] = b"Socket Server Error";

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode product: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a watch session ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEnd {
    /// Nothing usable was sent; the connection is dropped silently.
    InvalidId(String),
    NotFound,
    ClientClosed,
}

/// Accepts `<digits>` surrounded by optional whitespace.
pub fn parse_product_id(raw: &[u8]) -> Option<String> {
    let id = std::str::from_utf8(raw).ok()?.trim();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(id.to_string())
}

/// Remembers the last prices pushed to one client.
#[derive(Debug, Default)]
pub struct PriceTracker {
    last: Option<(f64, f64)>,
}

impl PriceTracker {
    /// Returns `true` when `product` should be pushed: the first reading and
    /// every reading whose prices differ from the previous push.
    pub fn observe(&mut self, product: &Product) -> bool {
        let prices = (product.purchase_price, product.sale_price);
        if self.last == Some(prices) {
            return false;
        }
        self.last = Some(prices);
        true
    }
}

/// Serves watch sessions until the listener fails. Each client runs on its own task.
pub async fn serve(
    listener: TcpListener,
    store: Arc<dyn ProductStore>,
    period: Duration,
) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "Watch client connected");

        let store = store.clone();
        tokio::spawn(async move {
            match handle_client(stream, store.as_ref(), period).await {
                Ok(end) => info!(%peer, ?end, "Watch client finished"),
                Err(e) => warn!(%peer, error = %e, "Watch session failed"),
            }
        });
    }
}

/// Runs one watch session over `stream`.
#[instrument(skip_all)]
pub async fn handle_client<S>(
    stream: S,
    store: &dyn ProductStore,
    period: Duration,
) -> Result<WatchEnd, WatchError>
where
    S: AsyncRead + AsyncWrite + Send,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    let mut request = [0u8; MAX_REQUEST_LEN];
    let read = reader.read(&mut request).await?;
    if read == 0 {
        return Ok(WatchEnd::ClientClosed);
    }
    let Some(id) = parse_product_id(&request[..read]) else {
        let raw = String::from_utf8_lossy(&request[..read]).into_owned();
        debug!(%raw, "Rejected watch request");
        return Ok(WatchEnd::InvalidId(raw));
    };
    info!(%id, "Watching product");

    let mut tracker = PriceTracker::default();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut scratch = [0u8; 64];

    loop {
        let due = tokio::select! {
            _ = ticker.tick() => true,
            read = reader.read(&mut scratch) => match read {
                Ok(0) | Err(_) => return Ok(WatchEnd::ClientClosed),
                // Input after the id is ignored.
                Ok(_) => false,
            },
        };
        if !due {
            continue;
        }

        match store.get_by_id(&id).await {
            Ok(Some(product)) => {
                if tracker.observe(&product) {
                    writer.write_all(&serde_json::to_vec(&product)?).await?;
                    writer.flush().await?;
                } else {
                    debug!(%id, "No price change");
                }
            }
            Ok(None) => {
                writer.write_all(NOT_FOUND_REPLY).await?;
                writer.shutdown().await?;
                return Ok(WatchEnd::NotFound);
            }
            Err(e) => {
                // Best effort; the store error is what gets reported.
                let _ = writer.write_all(SERVER_ERROR_REPLY).await;
                let _ = writer.shutdown().await;
                return Err(e.into());
            }
        }
    }
}
