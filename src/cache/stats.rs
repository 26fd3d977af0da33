//! Cache Statistics Module
//!
//! Snapshot of store-level counters: lookups, evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Store performance counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to stay within the cost budget
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries
    pub total_entries: u64,
    /// Current total cost charged
    pub cost_used: u64,
}
