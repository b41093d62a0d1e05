//! Cache Metrics
//!
//! Counters maintained by the [`CacheManager`](crate::CacheManager) and
//! reported through the [`CacheMetrics`] trait as a `BTreeMap`, so metric names
//! always come out in the same (alphabetical) order. That keeps printed
//! summaries and CSV exports reproducible between runs.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters common to every cache operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get_item` and `contains`).
    pub requests: u64,

    /// Lookups that found the key.
    pub cache_hits: u64,

    /// Entries added under a key that was not present.
    pub insertions: u64,

    /// Entries added under a key that was already present.
    pub replacements: u64,

    /// Entries removed by an explicit `remove`.
    pub removals: u64,

    /// Entries evicted from the tail to stay within capacity.
    pub evictions: u64,

    /// Number of `clear` calls.
    pub clears: u64,
}

impl CoreCacheMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an add of a new key.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an add that replaced an existing key.
    pub fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    /// Records an explicit removal.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Records a capacity eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records a clear.
    pub fn record_clear(&mut self) {
        self.clears += 1;
    }

    /// Lookups that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Ratio of hits to lookups in `0.0..=1.0`, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Ratio of misses to lookups in `0.0..=1.0`, or 0.0 before any lookup.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Ratio of evictions to adds, or 0.0 before any add.
    pub fn eviction_rate(&self) -> f64 {
        let adds = self.insertions + self.replacements;
        if adds > 0 {
            self.evictions as f64 / adds as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a map keyed by metric name.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("clears".to_string(), self.clears as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("replacements".to_string(), self.replacements as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());
        metrics.insert("eviction_rate".to_string(), self.eviction_rate());

        metrics
    }
}

/// Uniform metrics reporting.
pub trait CacheMetrics {
    /// Returns all metrics as name/value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name of the eviction policy, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_before_any_request() {
        let metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert_eq!(metrics.eviction_rate(), 0.0);
    }

    #[test]
    fn test_hits_and_misses() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        assert_eq!(metrics.requests, 4);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);
    }

    #[test]
    fn test_btreemap_is_sorted_and_complete() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_insertion();
        metrics.record_insertion();
        metrics.record_replacement();
        metrics.record_eviction();
        metrics.record_removal();
        metrics.record_clear();

        let map = metrics.to_btreemap();
        assert_eq!(map.get("insertions"), Some(&2.0));
        assert_eq!(map.get("replacements"), Some(&1.0));
        assert_eq!(map.get("evictions"), Some(&1.0));
        assert_eq!(map.get("removals"), Some(&1.0));
        assert_eq!(map.get("clears"), Some(&1.0));
        assert_eq!(map.get("eviction_rate"), Some(&(1.0 / 3.0)));

        let names: alloc::vec::Vec<&str> = map.keys().map(String::as_str).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
