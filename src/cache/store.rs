//! Cache Store Module
//!
//! Cost-bounded key/value store with per-entry TTL, backed by a
//! `moka::sync::Cache`. Moka handles frequency-aware admission and eviction;
//! this layer charges weights, maps TTLs and keeps the counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::notification::RemovalCause;
use moka::sync::Cache;
use moka::Expiry;
use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::cache::{CacheStats, CachedValue};
use crate::error::{CacheError, Result};

// == Store Config ==
/// Sizing parameters of a [`CacheStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Total weight the store may hold
    pub max_cost: u64,
    /// Weight charged for every entry
    pub item_cost: u32,
    /// Expected number of entries, used to presize the map
    pub initial_capacity: usize,
}

/// Per-entry expiry: each entry lives for the TTL it was inserted with.
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

// == Cache Store ==
/// Main cache storage. Cheap to share behind an `Arc`; every method takes
/// `&self`.
pub struct CacheStore {
    cache: Cache<String, CacheEntry>,
    counters: Arc<Counters>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new store. Fails if the cost budget is zero.
    pub fn new(config: StoreConfig) -> Result<Self> {
        if config.max_cost == 0 {
            return Err(CacheError::Construction("max_cost can't be zero".to_string()));
        }

        let counters = Arc::new(Counters::default());
        let removals = Arc::clone(&counters);

        let cache = Cache::builder()
            .max_capacity(config.max_cost)
            .initial_capacity(config.initial_capacity)
            .weigher(|_key: &String, entry: &CacheEntry| entry.cost)
            .expire_after(EntryExpiry)
            .eviction_listener(move |key: Arc<String>, _entry: CacheEntry, cause: RemovalCause| {
                match cause {
                    RemovalCause::Expired => {
                        removals.expirations.fetch_add(1, Ordering::Relaxed);
                    }
                    RemovalCause::Size => {
                        removals.evictions.fetch_add(1, Ordering::Relaxed);
                        debug!(key = %key, "Evicted entry to stay within cost budget");
                    }
                    RemovalCause::Explicit | RemovalCause::Replaced => {}
                }
            })
            .build();

        Ok(Self { cache, counters })
    }

    // == Get ==
    /// Returns the value under `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        match self.cache.get(key) {
            Some(entry) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    // == Set ==
    /// Offers `value` under `key`, charged `cost` and living for `ttl`
    /// (zero = no expiry). An existing entry is replaced.
    ///
    /// Admission is not guaranteed: when the budget is full, moka may refuse
    /// a newcomer that is requested less often than the entries it would
    /// displace.
    pub fn set_with_ttl(&self, key: &str, value: CachedValue, cost: u32, ttl: Duration) {
        self.cache
            .insert(key.to_string(), CacheEntry::new(value, cost, ttl));
    }

    // == Cleanup ==
    /// Runs moka's pending maintenance, which drops expired entries and
    /// applies evictions. Returns how many entries expired meanwhile.
    pub fn cleanup_expired(&self) -> u64 {
        let before = self.counters.expirations.load(Ordering::Relaxed);
        self.cache.run_pending_tasks();
        self.counters
            .expirations
            .load(Ordering::Relaxed)
            .saturating_sub(before)
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    // == Stats ==
    /// Returns a snapshot of the counters, after flushing pending maintenance
    /// so that entry count and cost are current.
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
            total_entries: self.cache.entry_count(),
            cost_used: self.cache.weighted_size(),
        }
    }
}
