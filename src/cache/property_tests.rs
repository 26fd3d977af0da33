//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store and memoization invariants over random inputs.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::cache::{CacheStore, CachedValue, StoreConfig};
use crate::memo::{Cache, MemoCache};
use crate::metrics::OperationMetrics;
use crate::CacheConfig;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

fn test_store(max_cost: u64) -> CacheStore {
    CacheStore::new(StoreConfig {
        max_cost,
        item_cost: 1,
        initial_capacity: 16,
    })
    .unwrap()
}

fn test_cache() -> MemoCache<OperationMetrics> {
    MemoCache::new(
        OperationMetrics::new(),
        CacheConfig {
            items_num: 100,
            average_item_cost: 1,
            ttl: TEST_TTL,
            ..CacheConfig::default()
        },
    )
    .unwrap()
}

// == Strategies ==
/// Generates cache keys from a small alphabet so that operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, cost: u32 },
    Get { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), 1u32..5).prop_map(|(key, cost)| StoreOp::Set { key, cost }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, every lookup is counted exactly once
    // as either a hit or a miss.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(store_op_strategy(), 1..80)) {
        let store = test_store(10);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                StoreOp::Set { key, cost } => {
                    store.set_with_ttl(&key, CachedValue::Done, cost, TEST_TTL);
                }
                StoreOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert!(stats.cost_used <= 10, "Cost {} exceeds budget", stats.cost_used);
    }

    // The charged cost never exceeds the budget, whatever gets admitted.
    #[test]
    fn prop_cost_budget_enforcement(ops in prop::collection::vec(store_op_strategy(), 1..200)) {
        let max_cost = 8;
        let store = test_store(max_cost);

        for op in ops {
            match op {
                StoreOp::Set { key, cost } => {
                    store.set_with_ttl(&key, CachedValue::Done, cost, TEST_TTL);
                }
                StoreOp::Get { key } => {
                    store.get(&key);
                }
            }
            let cost_used = store.stats().cost_used;
            prop_assert!(
                cost_used <= max_cost,
                "Cost {} exceeds budget {}",
                cost_used,
                max_cost
            );
        }
    }

    // N calls with the same key: one miss, N - 1 hits, one computation.
    #[test]
    fn prop_metrics_accounting(key in key_strategy(), calls in 1usize..20) {
        let cache = test_cache();
        let runs = AtomicUsize::new(0);
        let counter = &runs;

        tokio_test::block_on(async {
            for _ in 0..calls {
                let result: Result<(), String> = cache
                    .do_with_error(
                        move || async move {
                            counter.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        },
                        &key,
                        "prop",
                    )
                    .await;
                assert!(result.is_ok());
            }
        });

        prop_assert_eq!(runs.load(Ordering::SeqCst), 1);
        prop_assert_eq!(cache.metrics().misses("prop"), 1);
        prop_assert_eq!(cache.metrics().hits("prop"), calls as u64 - 1);
    }

    // A hit returns the value computed on the first successful miss.
    #[test]
    fn prop_value_fidelity(key in key_strategy(), first in any::<Vec<i64>>(), second in any::<Vec<i64>>()) {
        let cache = test_cache();

        let first_value = first.clone();
        let (computed, cached) = tokio_test::block_on(async {
            let computed = cache
                .get_object_with_error(move || async move { Ok::<_, String>(first_value) }, &key, "prop")
                .await;
            let cached = cache
                .get_object_with_error(move || async move { Ok::<_, String>(second) }, &key, "prop")
                .await;
            (computed, cached)
        });

        prop_assert_eq!(computed, Ok(first.clone()));
        prop_assert_eq!(cached, Ok(first));
    }

    // Failures never short-circuit later calls.
    #[test]
    fn prop_failure_never_cached(key in key_strategy(), failures in 1usize..10) {
        let cache = test_cache();
        let runs = AtomicUsize::new(0);
        let counter = &runs;

        tokio_test::block_on(async {
            for _ in 0..failures {
                let result: Result<u8, String> = cache
                    .get_object_with_error(
                        move || async move {
                            counter.fetch_add(1, Ordering::SeqCst);
                            Err("unavailable".to_string())
                        },
                        &key,
                        "prop",
                    )
                    .await;
                assert!(result.is_err());
            }
        });

        prop_assert_eq!(runs.load(Ordering::SeqCst), failures);
        prop_assert_eq!(cache.metrics().hits("prop"), 0);
        prop_assert_eq!(cache.stats().total_entries, 0);
    }
}
