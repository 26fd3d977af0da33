//! Metrics Module
//!
//! Hit/miss reporting per operation label.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

// == Metrics Sink ==
/// Receives one increment per memoized call, keyed by operation label.
pub trait CacheMetrics: Send + Sync {
    fn inc_hits(&self, operation: &str);
    fn inc_misses(&self, operation: &str);
}

impl<M: CacheMetrics + ?Sized> CacheMetrics for Arc<M> {
    fn inc_hits(&self, operation: &str) {
        (**self).inc_hits(operation);
    }

    fn inc_misses(&self, operation: &str) {
        (**self).inc_misses(operation);
    }
}

/// Discards every increment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    fn inc_hits(&self, _operation: &str) {}
    fn inc_misses(&self, _operation: &str) {}
}

// == Operation Stats ==
/// Counters for a single operation label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub hits: u64,
    pub misses: u64,
}

impl OperationStats {
    /// Returns hits / (hits + misses), or 0.0 if nothing was recorded.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Operation Metrics ==
/// In-process counters grouped by operation label.
#[derive(Debug, Default)]
pub struct OperationMetrics {
    counters: Mutex<HashMap<String, OperationStats>>,
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self, operation: &str) -> u64 {
        self.get(operation).hits
    }

    pub fn misses(&self, operation: &str) -> u64 {
        self.get(operation).misses
    }

    /// Returns the counters of one label, zeroed if it was never reported.
    pub fn get(&self, operation: &str) -> OperationStats {
        self.counters
            .lock()
            .get(operation)
            .copied()
            .unwrap_or_default()
    }

    /// Returns all labels in sorted order.
    pub fn snapshot(&self) -> BTreeMap<String, OperationStats> {
        self.counters
            .lock()
            .iter()
            .map(|(operation, stats)| (operation.clone(), *stats))
            .collect()
    }

    fn update(&self, operation: &str, apply: impl FnOnce(&mut OperationStats)) {
        let mut counters = self.counters.lock();
        match counters.get_mut(operation) {
            Some(stats) => apply(stats),
            None => apply(counters.entry(operation.to_string()).or_default()),
        }
    }
}

impl CacheMetrics for OperationMetrics {
    fn inc_hits(&self, operation: &str) {
        self.update(operation, |stats| stats.hits += 1);
    }

    fn inc_misses(&self, operation: &str) {
        self.update(operation, |stats| stats.misses += 1);
    }
}
