#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Structure
//!
//! ```text
//!             CacheManager
//!  ┌─────────────────────────────────────────────────────────┐
//!  │  ChainedHashTable<NodeHandle>        OrderList<V>       │
//!  │   ┌────┐                                                │
//!  │   │ b0 │─▶ [k=4]  ─ ─ ─ ─ ─ ─ ─▶  head [4]              │
//!  │   │ b1 │─▶ [k=9] ⇄ [k=1] ─ ─ ─ ─▶      [9]              │
//!  │   │ b2 │                   └ ─ ─▶      [1]              │
//!  │   └────┘                          tail [7] ◀─ evicted   │
//!  │           handles (non-owning)          next            │
//!  └─────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`ChainedHashTable`](hash_table::ChainedHashTable): fixed bucket array,
//!   `hash(key) = key mod bucket_count`, doubly linked chains per bucket.
//! - [`OrderList`](list::OrderList): arena-backed doubly linked list in recency
//!   order, head = most recently used.
//! - [`CacheManager`]: composes the two, evicts the tail when full and promotes
//!   entries to the head on every access.
//!
//! ## Example
//!
//! ```rust
//! use chain_cache::config::CacheManagerConfig;
//! use chain_cache::CacheManager;
//! use core::num::NonZeroUsize;
//!
//! let config = CacheManagerConfig {
//!     bucket_count: NonZeroUsize::new(5).unwrap(),
//!     capacity: NonZeroUsize::new(2).unwrap(),
//! };
//! let mut cache = CacheManager::init(config);
//! cache.add(1, "a");
//! cache.add(2, "b");
//! cache.add(3, "c");      // 1 evicted (least recently used)
//! assert!(cache.get_item(1).is_none());
//! assert_eq!(cache.keys().collect::<Vec<_>>(), vec![3, 2]);
//! ```
//!
//! ## Modules
//!
//! - [`entry`]: key type, node handles, and the two per-entry records
//! - [`list`]: the ordering list
//! - [`hash_table`]: the chained hash table
//! - [`manager`]: the cache manager
//! - [`view`]: bucket and empty-range views for display
//! - [`config`]: configuration
//! - [`metrics`]: operation counters

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

/// Key type, node handles, and the list/hash records that make up an entry.
pub mod entry;

/// Arena-backed doubly linked list tracking recency order.
///
/// Nodes are addressed by generational [`NodeHandle`](entry::NodeHandle)s, so
/// relocation and removal of a known node are O(1).
pub mod list;

/// Fixed-size chained hash table.
pub mod hash_table;

/// Cache manager keeping the hash table and the ordering list consistent.
pub mod manager;

/// Read-only bucket views and empty bucket range compression.
pub mod view;

/// Cache configuration.
pub mod config;

/// Operation counters and the metrics reporting trait.
pub mod metrics;

pub use config::CacheManagerConfig;
pub use entry::{HashEntry, Key, ListNode, NodeHandle};
pub use hash_table::ChainedHashTable;
pub use list::OrderList;
pub use manager::{AddOutcome, CacheManager};
pub use metrics::{CacheMetrics, CoreCacheMetrics};
pub use view::{BucketView, EmptyRange};
