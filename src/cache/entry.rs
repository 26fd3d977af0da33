//! Cache Entry Module
//!
//! Defines stored values and the per-entry cost and TTL bookkeeping.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// == Cached Value ==
/// What a key maps to in the store.
#[derive(Clone)]
pub enum CachedValue {
    /// Marker recording that an error-only computation succeeded recently
    Done,
    /// A memoized object, type-erased so one store can hold any value type
    Object(Arc<dyn Any + Send + Sync>),
}

impl CachedValue {
    /// Wraps an owned value.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        CachedValue::Object(Arc::new(value))
    }

    /// Borrows the stored object as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            CachedValue::Done => None,
            CachedValue::Object(object) => object.downcast_ref::<T>(),
        }
    }
}

impl fmt::Debug for CachedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachedValue::Done => f.write_str("Done"),
            CachedValue::Object(_) => f.write_str("Object(..)"),
        }
    }
}

// == Cache Entry ==
/// A stored value with the weight and lifetime the store charges it.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) value: CachedValue,
    /// Weight counted against the store capacity
    pub(crate) cost: u32,
    /// Lifetime from insertion, None = no expiration
    pub(crate) ttl: Option<Duration>,
}

impl CacheEntry {
    /// Creates a new entry. A zero `ttl` means the entry never expires.
    pub(crate) fn new(value: CachedValue, cost: u32, ttl: Duration) -> Self {
        Self {
            value,
            cost,
            ttl: (!ttl.is_zero()).then_some(ttl),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_zero_ttl_never_expires() {
        let entry = CacheEntry::new(CachedValue::Done, 1, Duration::ZERO);
        assert!(entry.ttl.is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(CachedValue::object(42u32), 3, Duration::from_secs(60));

        assert_eq!(entry.cost, 3);
        assert_eq!(entry.ttl, Some(Duration::from_secs(60)));
        assert_eq!(entry.value.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_downcast_wrong_type() {
        let value = CachedValue::object("text".to_string());

        assert!(value.downcast_ref::<u32>().is_none());
        assert!(CachedValue::Done.downcast_ref::<String>().is_none());
        assert_eq!(format!("{:?}", value), "Object(..)");
    }
}
