//! Memo Cache Engine
//!
//! Store-backed implementation of the [`Cache`] contract.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, CachedValue};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::memo::Cache;
use crate::metrics::CacheMetrics;
use crate::tasks::spawn_cleanup_task;

// == Memo Cache ==
/// Memoizing cache over a bounded [`CacheStore`].
///
/// Every entry is charged `average_item_cost`, whatever its real size.
/// Clones share the same store and metrics sink.
pub struct MemoCache<M> {
    store: Arc<CacheStore>,
    metrics: Arc<M>,
    item_cost: u32,
    min_item_cost: usize,
    max_item_cost: usize,
    ttl: Duration,
    cleanup_interval: Duration,
    cleanup: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<M> Clone for MemoCache<M> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
            item_cost: self.item_cost,
            min_item_cost: self.min_item_cost,
            max_item_cost: self.max_item_cost,
            ttl: self.ttl,
            cleanup_interval: self.cleanup_interval,
            cleanup: Arc::clone(&self.cleanup),
        }
    }
}

impl<M: CacheMetrics> MemoCache<M> {
    // == Constructor ==
    /// Builds the store sized from `config`.
    ///
    /// Fails with [`CacheError::Construction`](crate::CacheError::Construction)
    /// if the configuration cannot produce a valid store.
    pub fn new(metrics: M, config: CacheConfig) -> Result<Self> {
        let store_config = config.store_config()?;
        let store = CacheStore::new(store_config)?;

        info!(
            "Cache created: items_num={}, max_cost={}, item_cost={}, ttl={:?}",
            config.items_num, store_config.max_cost, store_config.item_cost, config.ttl
        );

        Ok(Self {
            store: Arc::new(store),
            metrics: Arc::new(metrics),
            item_cost: store_config.item_cost,
            min_item_cost: config.min_item_cost,
            max_item_cost: config.max_item_cost,
            ttl: config.ttl,
            cleanup_interval: config.cleanup_interval,
            cleanup: Arc::new(Mutex::new(None)),
        })
    }

    // == Admission ==
    /// Size filter for objects: `size >= min_item_cost || size <= max_item_cost`.
    ///
    /// With `min_item_cost <= max_item_cost + 1` every size passes, so the
    /// filter only refuses anything when the bounds are inverted with a gap.
    fn admits_size(&self, size: usize) -> bool {
        size >= self.min_item_cost || size <= self.max_item_cost
    }

    /// Encodes `object` to measure it and stores it if the size filter passes.
    fn admit<T>(&self, key: &str, object: &T) -> Result<bool>
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        let size = serde_json::to_vec(object)?.len();
        if !self.admits_size(size) {
            debug!(key, size, "Object size outside cacheable bounds");
            return Ok(false);
        }

        self.store.set_with_ttl(
            key,
            CachedValue::object(object.clone()),
            self.item_cost,
            self.ttl,
        );
        Ok(true)
    }

    // == Background Cleanup ==
    /// Starts the periodic expiry sweep if it is not running yet.
    ///
    /// Must be called from within a tokio runtime. Returns false if a sweep
    /// was already running.
    pub fn start_cleanup(&self) -> bool {
        let mut cleanup = self.cleanup.lock();
        if cleanup.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        *cleanup = Some(spawn_cleanup_task(
            Arc::clone(&self.store),
            self.cleanup_interval,
        ));
        true
    }

    // == Shutdown ==
    /// Stops the expiry sweep and drops every entry.
    pub fn shutdown(&self) {
        if let Some(handle) = self.cleanup.lock().take() {
            handle.abort();
        }
        self.store.clear();
        info!("Cache shut down");
    }

    /// Returns the store statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Returns the metrics sink.
    pub fn metrics(&self) -> &M {
        &self.metrics
    }
}

impl<M: CacheMetrics> Cache for MemoCache<M> {
    fn do_with_error<F, Fut, E>(
        &self,
        cached_fn: F,
        key: &str,
        operation: &str,
    ) -> impl Future<Output = std::result::Result<(), E>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<(), E>> + Send,
        E: Send,
    {
        async move {
            if self.store.get(key).is_some() {
                self.metrics.inc_hits(operation);
                debug!(key, operation, "Cache hit");
                return Ok(());
            }

            self.metrics.inc_misses(operation);
            debug!(key, operation, "Cache miss");

            cached_fn().await?;

            self.store
                .set_with_ttl(key, CachedValue::Done, self.item_cost, self.ttl);
            debug!(key, operation, "Recorded completion");

            Ok(())
        }
    }

    fn get_object_with_error<T, F, Fut, E>(
        &self,
        cached_fn: F,
        key: &str,
        operation: &str,
    ) -> impl Future<Output = std::result::Result<T, E>> + Send
    where
        T: Serialize + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
        E: Send,
    {
        async move {
            let cached = self
                .store
                .get(key)
                .map(|value| value.downcast_ref::<T>().cloned());

            match cached {
                Some(Some(object)) => {
                    self.metrics.inc_hits(operation);
                    debug!(key, operation, "Cache hit");
                    return Ok(object);
                }
                Some(None) => {
                    warn!(
                        key,
                        operation,
                        expected = std::any::type_name::<T>(),
                        "Cached entry has a different type, recomputing"
                    );
                }
                None => {}
            }

            self.metrics.inc_misses(operation);
            debug!(key, operation, "Cache miss");

            let object = cached_fn().await?;

            match self.admit(key, &object) {
                Ok(stored) => debug!(key, operation, stored, "Offered object to cache"),
                Err(err) => warn!(key, operation, error = %err, "Object not cached"),
            }

            Ok(object)
        }
    }
}
