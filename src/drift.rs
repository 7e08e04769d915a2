// src/drift.rs
//! Background price drift: every tick one random product has both prices
//! nudged by an independent whole-number delta.
use std::sync::Arc;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::store::{ProductStore, StoreError};

/// Largest absolute change applied to a price in one drift step.
pub const MAX_DELTA: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DriftOutcome {
    pub id: i64,
    pub old_purchase_price: f64,
    pub new_purchase_price: f64,
    pub old_sale_price: f64,
    pub new_sale_price: f64,
    /// Rows the update touched; 0 if the product vanished between the read and the write.
    pub updated: u64,
}

/// Performs a single drift step. Returns `None` when there is nothing to drift.
pub async fn run_once<R>(
    store: &dyn ProductStore,
    rng: &mut R,
) -> Result<Option<DriftOutcome>, StoreError>
where
    R: Rng + Send,
{
    let products = store.list_all().await?;
    if products.is_empty() {
        return Ok(None);
    }

    let product = &products[rng.random_range(0..products.len())];
    let purchase_delta = rng.random_range(-MAX_DELTA..=MAX_DELTA) as f64;
    let sale_delta = rng.random_range(-MAX_DELTA..=MAX_DELTA) as f64;

    let new_purchase_price = product.purchase_price + purchase_delta;
    let new_sale_price = product.sale_price + sale_delta;

    let updated = store
        .update_by_id(&product.id.to_string(), new_purchase_price, new_sale_price)
        .await?;

    Ok(Some(DriftOutcome {
        id: product.id,
        old_purchase_price: product.purchase_price,
        new_purchase_price,
        old_sale_price: product.sale_price,
        new_sale_price,
        updated,
    }))
}

/// Runs [`run_once`] immediately and then every `period` until the handle is
/// aborted. Failures are logged and the loop carries on.
///
/// `period` must be non-zero.
pub fn spawn(store: Arc<dyn ProductStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let seed = rand::rng().random::<[u8; 32]>();
        let mut rng = StdRng::from_seed(seed);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_ms = period.as_millis() as u64, "Price drift task started");
        loop {
            ticker.tick().await;
            match run_once(store.as_ref(), &mut rng).await {
                Ok(Some(outcome)) => info!(
                    id = outcome.id,
                    old_purchase_price = outcome.old_purchase_price,
                    new_purchase_price = outcome.new_purchase_price,
                    old_sale_price = outcome.old_sale_price,
                    new_sale_price = outcome.new_sale_price,
                    updated = outcome.updated,
                    "Drifted product prices"
                ),
                Ok(None) => info!("No products to drift"),
                Err(e) => warn!(error = %e, "Price drift failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Product;
    use crate::store::MemoryProductStore;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, 100.0, 110.0),
            Product::new(2, 200.0, 210.0),
            Product::new(3, 300.0, 310.0),
        ]
    }

    #[tokio::test]
    async fn each_step_moves_exactly_one_product_within_bounds() {
        let store = MemoryProductStore::with_products(catalog());
        let mut rng = StdRng::seed_from_u64(7);
        let mut picked = HashSet::new();

        for _ in 0..200 {
            let before = store.snapshot().await;
            let outcome = run_once(&store, &mut rng).await.unwrap().unwrap();
            let after = store.snapshot().await;

            assert_eq!(outcome.updated, 1);
            picked.insert(outcome.id);

            for (old, new) in before.iter().zip(&after) {
                if old.id != outcome.id {
                    assert_eq!(old, new);
                    continue;
                }
                assert_eq!(old.purchase_price, outcome.old_purchase_price);
                assert_eq!(new.purchase_price, outcome.new_purchase_price);
                assert_eq!(new.sale_price, outcome.new_sale_price);
                for delta in [new.purchase_price - old.purchase_price, new.sale_price - old.sale_price] {
                    assert_eq!(delta.fract(), 0.0);
                    assert!((-5.0..=5.0).contains(&delta), "delta {delta} out of range");
                }
            }
        }

        assert_eq!(picked, HashSet::from([1, 2, 3]));
    }

    #[tokio::test]
    async fn prices_may_go_negative() {
        let store = MemoryProductStore::with_products([Product::new(1, 0.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut went_negative = false;
        for _ in 0..50 {
            let outcome = run_once(&store, &mut rng).await.unwrap().unwrap();
            went_negative |= outcome.new_purchase_price < 0.0 || outcome.new_sale_price < 0.0;
        }
        assert!(went_negative);
    }

    #[tokio::test]
    async fn empty_table_is_a_no_op() {
        let store = MemoryProductStore::new();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(run_once(&store, &mut rng).await.unwrap(), None);
    }

    struct BrokenStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProductStore for BrokenStore {
        async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn get_by_id(&self, _id: &str) -> Result<Option<Product>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn update_by_id(&self, _id: &str, _p: f64, _s: f64) -> Result<u64, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn spawned_task_survives_store_failures() {
        let store = Arc::new(BrokenStore { calls: AtomicUsize::new(0) });
        let handle = spawn(store.clone(), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(!handle.is_finished());
        assert!(store.calls.load(Ordering::SeqCst) >= 2);
        handle.abort();
    }

    struct CountingStore {
        inner: MemoryProductStore,
        updates: AtomicUsize,
    }

    #[async_trait]
    impl ProductStore for CountingStore {
        async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
            self.inner.list_all().await
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
            self.inner.get_by_id(id).await
        }

        async fn update_by_id(&self, id: &str, p: f64, s: f64) -> Result<u64, StoreError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update_by_id(id, p, s).await
        }
    }

    #[tokio::test]
    async fn spawned_task_runs_once_at_startup() {
        let store = Arc::new(CountingStore {
            inner: MemoryProductStore::with_products(catalog()),
            updates: AtomicUsize::new(0),
        });
        let handle = spawn(store.clone(), Duration::from_secs(3600));

        for _ in 0..100 {
            if store.updates.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();

        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
    }
}
