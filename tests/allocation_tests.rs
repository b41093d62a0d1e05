//! Allocation behavior of the cache manager.
//!
//! Both arenas recycle freed slots, so once a full cache has been through one
//! round of churn, adds that evict and lookups must not touch the allocator.
//! This file holds a single test because the global allocator counters are
//! shared by every test running in the process.

use chain_cache::config::CacheManagerConfig;
use chain_cache::CacheManager;
use stats_alloc::{Region, StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

#[test]
fn test_steady_state_churn_does_not_allocate() {
    const CAPACITY: i64 = 64;
    let mut cache: CacheManager<u64> =
        CacheManager::init(CacheManagerConfig::new(17, CAPACITY as usize).unwrap());

    // Fill the cache and run one full round of evictions, replacements and
    // removals so every internal free list has reached its working size.
    for key in 0..CAPACITY * 3 {
        cache.add(key, key as u64);
    }
    for key in CAPACITY * 2..CAPACITY * 3 {
        cache.add(key, 0);
        cache.remove(key);
        cache.add(key, 1);
    }

    let region = Region::new(GLOBAL);
    for key in CAPACITY * 3..CAPACITY * 20 {
        cache.add(key, key as u64);
        cache.get_item(key - 1);
        cache.contains(key - 2);
        cache.add(key, 0);
    }
    for key in CAPACITY * 19..CAPACITY * 20 {
        cache.remove(key);
        cache.add(key, 2);
    }
    let change = region.change();

    assert_eq!(change.allocations, 0, "steady-state churn allocated");
    assert_eq!(change.reallocations, 0, "steady-state churn reallocated");
    assert_eq!(cache.len(), CAPACITY as usize);
}
