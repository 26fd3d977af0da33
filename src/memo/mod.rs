//! Memoization Module
//!
//! The [`Cache`] contract and its store-backed implementation, [`MemoCache`].

mod engine;

use std::future::Future;

use serde::Serialize;

pub use engine::MemoCache;

// == Cache Contract ==
/// Wraps computations so that repeated calls with the same key skip
/// recomputation while a successful result is cached.
///
/// `key` must uniquely encode the logical operation and its arguments.
/// `operation` only labels the hit/miss metrics and is not part of the key.
///
/// Both calls are async; dropping the returned future cancels the wrapped
/// computation and leaves the cache untouched. Errors of the computation are
/// returned unchanged and are never cached. Concurrent misses on the same key
/// are not coalesced: every caller runs its own computation and the last
/// insert wins.
pub trait Cache: Send + Sync {
    /// Runs `cached_fn` unless a success was recorded for `key` within the TTL.
    fn do_with_error<F, Fut, E>(
        &self,
        cached_fn: F,
        key: &str,
        operation: &str,
    ) -> impl Future<Output = Result<(), E>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<(), E>> + Send,
        E: Send;

    /// Returns the cached value for `key`, or runs `cached_fn` and offers its
    /// result to the cache.
    ///
    /// `T` must be serializable because the encoded size feeds the admission
    /// check. A value that fails to serialize is still returned, just not cached.
    fn get_object_with_error<T, F, Fut, E>(
        &self,
        cached_fn: F,
        key: &str,
        operation: &str,
    ) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Serialize + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        E: Send;
}
