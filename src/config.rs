//! Configuration Module
//!
//! Handles building cache configuration, optionally from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::StoreConfig;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// Immutable once handed to [`MemoCache::new`](crate::MemoCache::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Target capacity in number of entries
    pub items_num: usize,
    /// Cost charged per stored entry, whatever its real size
    pub average_item_cost: usize,
    /// Lower bound on the encoded size of a cacheable object, in bytes
    pub min_item_cost: usize,
    /// Upper bound on the encoded size of a cacheable object, in bytes
    pub max_item_cost: usize,
    /// Lifetime of an entry from insertion; zero disables expiry
    pub ttl: Duration,
    /// Interval of the background expiry sweep
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UCACHE_ITEMS_NUM` - Target number of entries (default: 1000)
    /// - `UCACHE_AVERAGE_ITEM_COST` - Cost per entry (default: 1)
    /// - `UCACHE_MIN_ITEM_COST` - Minimum cacheable size in bytes (default: 0)
    /// - `UCACHE_MAX_ITEM_COST` - Maximum cacheable size in bytes (default: 1 MiB)
    /// - `UCACHE_TTL_SECS` - Entry TTL in seconds (default: 300)
    /// - `UCACHE_CLEANUP_INTERVAL_SECS` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            items_num: env_or("UCACHE_ITEMS_NUM", defaults.items_num),
            average_item_cost: env_or("UCACHE_AVERAGE_ITEM_COST", defaults.average_item_cost),
            min_item_cost: env_or("UCACHE_MIN_ITEM_COST", defaults.min_item_cost),
            max_item_cost: env_or("UCACHE_MAX_ITEM_COST", defaults.max_item_cost),
            ttl: Duration::from_secs(env_or("UCACHE_TTL_SECS", defaults.ttl.as_secs())),
            cleanup_interval: Duration::from_secs(env_or(
                "UCACHE_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval.as_secs(),
            )),
        }
    }

    /// Checks the invariants `items_num > 0` and `average_item_cost > 0`.
    ///
    /// The admission bounds are deliberately left unchecked.
    pub fn validate(&self) -> Result<()> {
        if self.items_num == 0 {
            return Err(CacheError::Construction(
                "items_num must be greater than zero".to_string(),
            ));
        }
        if self.average_item_cost == 0 {
            return Err(CacheError::Construction(
                "average_item_cost must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    // == Store Sizing ==
    /// Derives the store parameters: a cost budget of
    /// `items_num * average_item_cost`, with every entry weighing
    /// `average_item_cost`.
    pub fn store_config(&self) -> Result<StoreConfig> {
        self.validate()?;

        let item_cost = u32::try_from(self.average_item_cost).map_err(|_| {
            CacheError::Construction(format!(
                "average_item_cost {} exceeds the maximum entry weight {}",
                self.average_item_cost,
                u32::MAX
            ))
        })?;
        let max_cost = self
            .items_num
            .checked_mul(self.average_item_cost)
            .ok_or_else(|| {
                CacheError::Construction(
                    "items_num * average_item_cost overflows the cost budget".to_string(),
                )
            })?;

        Ok(StoreConfig {
            max_cost: max_cost as u64,
            item_cost,
            initial_capacity: self.items_num,
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            items_num: 1000,
            average_item_cost: 1,
            min_item_cost: 0,
            max_item_cost: 1024 * 1024,
            ttl: Duration::from_secs(300),
            cleanup_interval: Duration::from_secs(1),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
