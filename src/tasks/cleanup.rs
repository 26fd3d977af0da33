//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task only holds a weak reference to the store and exits on its own
/// once every other handle to the store has been dropped. Lookups already
/// refuse expired entries; the sweep runs the store's pending maintenance so
/// their memory and cost are released without waiting for more traffic.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::new(config)?);
/// let cleanup_handle = spawn_cleanup_task(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<CacheStore>, interval: Duration) -> JoinHandle<()> {
    let store: Weak<CacheStore> = Arc::downgrade(&store);

    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                debug!("Cache store dropped, stopping TTL cleanup task");
                break;
            };

            let removed = store.cleanup_expired();
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
