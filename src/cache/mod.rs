//! Cache Module
//!
//! Bounded in-memory store with per-entry TTL and a cost budget, built on
//! moka's TinyLFU cache.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CachedValue;
pub use stats::CacheStats;
pub use store::{CacheStore, StoreConfig};
