//! Cache Manager
//!
//! The single entry point that keeps a [`ChainedHashTable`] and an
//! [`OrderList`] consistent with each other and enforces the capacity bound.
//!
//! # Algorithm
//!
//! Every live key has a node in the ordering list (which owns the payload) and
//! an entry in the hash table (which maps the key to the node's handle). The
//! list head is the most recently used entry and the tail the least recently
//! used one:
//!
//! - `add` of a present key removes the old pair first, then inserts a fresh
//!   pair at the head.
//! - `add` of a new key at capacity evicts the tail pair first.
//! - `get_item`, `contains` and `touch` on a present key move its node to the
//!   head. Lookups are not read-only with respect to ordering.
//!
//! # Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `add` | O(chain length) |
//! | `remove` | O(chain length) |
//! | `get_item` / `contains` | O(chain length) |
//! | `clear` | O(buckets + capacity) |
//!
//! Chain length averages `len / bucket_count`. List relocation is O(1)
//! because the hash entry carries the node's handle.
//!
//! # Thread Safety
//!
//! `CacheManager` is single-threaded. Every mutating operation, lookups
//! included, takes `&mut self`.

extern crate alloc;

use crate::config::CacheManagerConfig;
use crate::entry::{Key, NodeHandle};
use crate::hash_table::ChainedHashTable;
use crate::list::{Iter, OrderList};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use core::num::NonZeroUsize;

/// What an [`add`](CacheManager::add) did besides inserting the new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome<V> {
    /// The key was new and the cache had room.
    Inserted,
    /// The key was present; its old payload was discarded and is returned.
    Replaced(V),
    /// The key was new and the cache was full; the tail entry was evicted.
    Evicted {
        /// Key of the evicted entry.
        key: Key,
        /// Payload of the evicted entry.
        payload: V,
    },
}

impl<V> AddOutcome<V> {
    /// Returns the evicted key, if this add evicted an entry.
    pub fn evicted_key(&self) -> Option<Key> {
        match self {
            AddOutcome::Evicted { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Returns true if this add replaced an existing entry.
    pub fn is_replacement(&self) -> bool {
        matches!(self, AddOutcome::Replaced(_))
    }
}

/// A fixed-capacity LRU cache over integer keys.
///
/// # Examples
///
/// ```
/// use chain_cache::{AddOutcome, CacheManager};
/// use core::num::NonZeroUsize;
///
/// let mut cache = CacheManager::new(
///     NonZeroUsize::new(7).unwrap(),
///     NonZeroUsize::new(3).unwrap(),
/// );
/// cache.add(1, "one");
/// cache.add(2, "two");
/// cache.add(3, "three");
///
/// // Accessing 1 makes it the most recently used entry.
/// assert_eq!(cache.get_item(1), Some(&"one"));
///
/// // 2 is now the least recently used entry and gets evicted.
/// let outcome = cache.add(4, "four");
/// assert_eq!(outcome, AddOutcome::Evicted { key: 2, payload: "two" });
/// assert_eq!(cache.keys().collect::<Vec<_>>(), vec![4, 1, 3]);
/// ```
pub struct CacheManager<V> {
    config: CacheManagerConfig,
    table: ChainedHashTable<NodeHandle>,
    list: OrderList<V>,
    metrics: CoreCacheMetrics,
}

impl<V> CacheManager<V> {
    /// Creates an empty cache from a configuration.
    pub fn init(config: CacheManagerConfig) -> Self {
        CacheManager {
            config,
            table: ChainedHashTable::new(config.bucket_count),
            list: OrderList::with_capacity(config.capacity.get()),
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Creates an empty cache with `bucket_count` hash buckets holding at most
    /// `capacity` entries.
    pub fn new(bucket_count: NonZeroUsize, capacity: NonZeroUsize) -> Self {
        Self::init(CacheManagerConfig {
            bucket_count,
            capacity,
        })
    }

    /// Returns the configuration this cache was created with.
    #[inline]
    pub fn config(&self) -> CacheManagerConfig {
        self.config
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn max_cache_size(&self) -> usize {
        self.config.capacity.get()
    }

    /// Returns the number of hash buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the operation counters.
    #[inline]
    pub fn core_metrics(&self) -> &CoreCacheMetrics {
        &self.metrics
    }

    /// Adds `payload` under `key` at the head of the recency order.
    ///
    /// A present key is removed before the new entry is inserted, so the new
    /// entry never inherits the old entry's position. When the cache is full
    /// and `key` is new, the least recently used entry is evicted first.
    pub fn add(&mut self, key: Key, payload: V) -> AddOutcome<V> {
        let outcome = if let Some(old) = self.take(key) {
            self.metrics.record_replacement();
            AddOutcome::Replaced(old)
        } else if self.list.len() >= self.max_cache_size() {
            match self.evict_tail() {
                Some((old_key, old_payload)) => AddOutcome::Evicted {
                    key: old_key,
                    payload: old_payload,
                },
                None => AddOutcome::Inserted,
            }
        } else {
            AddOutcome::Inserted
        };
        if !outcome.is_replacement() {
            self.metrics.record_insertion();
        }

        let handle = self.list.insert_at_head(key, payload);
        let displaced = self.table.add(key, handle);
        debug_assert!(displaced.is_none());
        debug_assert!(self.list.len() <= self.max_cache_size());

        outcome
    }

    /// Removes `key` and returns its payload, or `None` if it was not present.
    pub fn remove(&mut self, key: Key) -> Option<V> {
        let payload = self.take(key)?;
        self.metrics.record_removal();
        Some(payload)
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get_item(&mut self, key: Key) -> Option<&V> {
        let handle = self.promote(key)?;
        self.list.get(handle).map(|node| &node.payload)
    }

    /// Looks up `key` for mutation, promoting it to most recently used on a hit.
    pub fn get_item_mut(&mut self, key: Key) -> Option<&mut V> {
        let handle = self.promote(key)?;
        self.list.get_mut(handle)
    }

    /// Returns true if `key` is present, promoting it to most recently used.
    pub fn contains(&mut self, key: Key) -> bool {
        self.promote(key).is_some()
    }

    /// Looks up `key` without touching the recency order or the metrics.
    pub fn peek(&self, key: Key) -> Option<&V> {
        let handle = *self.table.get(key)?;
        self.list.get(handle).map(|node| &node.payload)
    }

    /// Promotes `key` to most recently used without counting a lookup.
    ///
    /// Returns false if `key` is not present.
    pub fn touch(&mut self, key: Key) -> bool {
        match self.table.get(key) {
            Some(&handle) => self.list.move_to_head(handle),
            None => false,
        }
    }

    /// Removes every entry. The cache stays usable with the same configuration.
    pub fn clear(&mut self) {
        self.list.clear();
        self.table.clear();
        self.metrics.record_clear();
    }

    /// Iterates over `(key, payload)` from most to least recently used.
    ///
    /// Call `.rev()` for least to most recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        self.list.iter()
    }

    /// Iterates over keys from most to least recently used.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = Key> + ExactSizeIterator + '_ {
        self.list.keys()
    }

    /// Read-only access to the hash table, for displaying bucket layout.
    pub fn table(&self) -> &ChainedHashTable<NodeHandle> {
        &self.table
    }

    /// Read-only access to the ordering list.
    pub fn list(&self) -> &OrderList<V> {
        &self.list
    }

    /// Checks both structures on their own and against each other: counts
    /// match, the capacity bound holds, and every hash entry's handle resolves
    /// to the list node with the same key. Runs in O(n + buckets).
    pub fn is_consistent(&self) -> bool {
        if !self.table.is_consistent() || !self.list.is_consistent() {
            return false;
        }
        if self.table.len() != self.list.len() || self.list.len() > self.max_cache_size() {
            return false;
        }
        self.table.buckets().all(|bucket| {
            bucket.entries().all(|entry| {
                self.list
                    .get(entry.value)
                    .is_some_and(|node| node.key == entry.key)
            })
        })
    }

    /// Removes the pair for `key` from the list, then from the table.
    fn take(&mut self, key: Key) -> Option<V> {
        let handle = *self.table.get(key)?;
        let removed = self.list.remove_node(handle);
        self.table.remove(key);
        debug_assert!(removed.as_ref().is_some_and(|(k, _)| *k == key));
        removed.map(|(_, payload)| payload)
    }

    fn evict_tail(&mut self) -> Option<(Key, V)> {
        let (key, payload) = self.list.remove_tail_node()?;
        self.table.remove(key);
        self.metrics.record_eviction();
        Some((key, payload))
    }

    fn promote(&mut self, key: Key) -> Option<NodeHandle> {
        match self.table.get(key).copied() {
            Some(handle) => {
                self.list.move_to_head(handle);
                self.metrics.record_hit();
                Some(handle)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }
}

impl<V> CacheMetrics for CacheManager<V> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<V> fmt::Debug for CacheManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .field("len", &self.table.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    fn make_cache<V>(buckets: usize, capacity: usize) -> CacheManager<V> {
        CacheManager::init(CacheManagerConfig::new(buckets, capacity).unwrap())
    }

    fn keys<V>(cache: &CacheManager<V>) -> Vec<Key> {
        cache.keys().collect()
    }

    #[test]
    fn test_add_and_get_item() {
        let mut cache = make_cache(5, 3);
        assert_eq!(cache.add(1, "one"), AddOutcome::Inserted);
        assert_eq!(cache.add(2, "two"), AddOutcome::Inserted);
        assert_eq!(cache.get_item(1), Some(&"one"));
        assert_eq!(cache.get_item(2), Some(&"two"));
        assert_eq!(cache.get_item(3), None);
        assert_eq!(cache.len(), 2);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_capacity_two_evicts_oldest() {
        let mut cache = make_cache(11, 2);
        cache.add(1, 'a');
        cache.add(2, 'b');
        let outcome = cache.add(3, 'c');
        assert_eq!(
            outcome,
            AddOutcome::Evicted {
                key: 1,
                payload: 'a'
            }
        );
        assert_eq!(keys(&cache), vec![3, 2]);
        assert!(cache.peek(1).is_none());
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_access_protects_from_eviction() {
        let mut cache = make_cache(11, 3);
        cache.add(1, 10);
        cache.add(2, 20);
        cache.add(3, 30);
        assert_eq!(cache.get_item(1), Some(&10));
        assert_eq!(cache.add(4, 40).evicted_key(), Some(2));
        assert_eq!(keys(&cache), vec![4, 1, 3]);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_replace_resets_position_without_growing() {
        let mut cache = make_cache(3, 3);
        cache.add(1, "a".to_string());
        cache.add(2, "b".to_string());
        cache.add(3, "c".to_string());
        assert_eq!(keys(&cache), vec![3, 2, 1]);

        let outcome = cache.add(1, "A".to_string());
        assert_eq!(outcome, AddOutcome::Replaced("a".to_string()));
        assert_eq!(cache.len(), 3);
        assert_eq!(keys(&cache), vec![1, 3, 2]);
        assert_eq!(cache.peek(1).map(String::as_str), Some("A"));
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_replace_at_capacity_does_not_evict() {
        let mut cache = make_cache(5, 2);
        cache.add(1, 1);
        cache.add(2, 2);
        assert_eq!(cache.add(2, 22), AddOutcome::Replaced(2));
        assert_eq!(keys(&cache), vec![2, 1]);
        assert_eq!(cache.core_metrics().evictions, 0);
    }

    #[test]
    fn test_contains_promotes() {
        let mut cache = make_cache(5, 3);
        cache.add(1, ());
        cache.add(2, ());
        cache.add(3, ());
        assert!(cache.contains(1));
        assert_eq!(keys(&cache), vec![1, 3, 2]);
        // idempotent once at head
        assert!(cache.contains(1));
        assert_eq!(keys(&cache), vec![1, 3, 2]);
        assert!(!cache.contains(9));
        assert_eq!(keys(&cache), vec![1, 3, 2]);
    }

    #[test]
    fn test_get_item_twice_keeps_position() {
        let mut cache = make_cache(5, 3);
        cache.add(1, ());
        cache.add(2, ());
        cache.get_item(1);
        let after_first = keys(&cache);
        cache.get_item(1);
        assert_eq!(keys(&cache), after_first);
    }

    #[test]
    fn test_remove_absent_key_changes_nothing() {
        let mut cache = make_cache(5, 3);
        cache.add(1, 'x');
        cache.add(6, 'y');
        let before = keys(&cache);
        let buckets_before: Vec<Vec<Key>> =
            cache.table().buckets().map(|b| b.keys().collect()).collect();

        assert_eq!(cache.remove(11), None);

        assert_eq!(keys(&cache), before);
        let buckets_after: Vec<Vec<Key>> =
            cache.table().buckets().map(|b| b.keys().collect()).collect();
        assert_eq!(buckets_after, buckets_before);
        assert_eq!(cache.core_metrics().removals, 0);
    }

    #[test]
    fn test_remove_present_key() {
        let mut cache = make_cache(5, 3);
        cache.add(1, 'x');
        cache.add(2, 'y');
        assert_eq!(cache.remove(1), Some('x'));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_item(1), None);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut cache = make_cache(5, 3);
        for key in 0..3 {
            cache.add(key, key);
        }
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!((0..3).all(|key| cache.get_item(key).is_none()));
        assert!(cache.is_consistent());

        cache.add(7, 7);
        assert_eq!(keys(&cache), vec![7]);
        assert_eq!(cache.max_cache_size(), 3);
    }

    #[test]
    fn test_touch_and_peek() {
        let mut cache = make_cache(5, 3);
        cache.add(1, 'a');
        cache.add(2, 'b');
        assert_eq!(cache.peek(1), Some(&'a'));
        assert_eq!(keys(&cache), vec![2, 1]);
        assert!(cache.touch(1));
        assert_eq!(keys(&cache), vec![1, 2]);
        assert!(!cache.touch(5));
        assert_eq!(cache.core_metrics().requests, 0);
    }

    #[test]
    fn test_get_item_mut() {
        let mut cache = make_cache(5, 2);
        cache.add(1, 10);
        cache.add(2, 20);
        if let Some(value) = cache.get_item_mut(1) {
            *value += 1;
        }
        assert_eq!(cache.peek(1), Some(&11));
        assert_eq!(keys(&cache), vec![1, 2]);
    }

    #[test]
    fn test_iter_reverse_is_eviction_order() {
        let mut cache = make_cache(5, 4);
        for key in 1..=4 {
            cache.add(key, key * 100);
        }
        cache.get_item(2);
        let oldest_first: Vec<(Key, i64)> = cache.iter().rev().map(|(k, v)| (k, *v)).collect();
        assert_eq!(oldest_first, vec![(1, 100), (3, 300), (4, 400), (2, 200)]);
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = make_cache(1, 1);
        cache.add(1, ());
        assert_eq!(cache.add(2, ()).evicted_key(), Some(1));
        assert_eq!(cache.add(3, ()).evicted_key(), Some(2));
        assert_eq!(keys(&cache), vec![3]);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_metrics() {
        let mut cache = make_cache(5, 2);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests"), Some(&0.0));

        cache.add(1, ());
        cache.add(2, ());
        cache.get_item(1);
        cache.contains(3);
        cache.add(3, ());
        cache.add(3, ());
        cache.remove(1);

        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests"), Some(&2.0));
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("cache_misses"), Some(&1.0));
        assert_eq!(metrics.get("insertions"), Some(&3.0));
        assert_eq!(metrics.get("replacements"), Some(&1.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(metrics.get("removals"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "LRU");
    }

    #[test]
    fn test_negative_keys() {
        let mut cache = make_cache(4, 4);
        for key in [-1, -5, 3, 7] {
            cache.add(key, key);
        }
        assert_eq!(cache.table().chain(3).map(|e| e.key).collect::<Vec<_>>(), vec![7, 3, -5, -1]);
        assert_eq!(cache.remove(-5), Some(-5));
        assert!(cache.is_consistent());
    }
}
