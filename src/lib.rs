//! ucache - A universal memoizing cache
//!
//! Wraps arbitrary async computations so that repeated calls with the same key
//! skip recomputation, subject to a TTL and a cost-bounded admission policy.
//! Hits and misses are reported per operation label.

pub mod cache;
pub mod config;
pub mod error;
pub mod memo;
pub mod metrics;
pub mod tasks;

pub use cache::CacheStats;
pub use config::CacheConfig;
pub use error::CacheError;
pub use memo::{Cache, MemoCache};
pub use metrics::{CacheMetrics, NoopMetrics, OperationMetrics, OperationStats};
pub use tasks::spawn_cleanup_task;
