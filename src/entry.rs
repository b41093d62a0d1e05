//! Cache Entry Records
//!
//! An entry conceptually exists once per key but is stored as two cooperating
//! records:
//!
//! - [`ListNode`]: owned by the ordering list arena. Holds the key, the payload,
//!   and the links to its neighbours in recency order.
//! - [`HashEntry`]: owned by the hash table arena. Holds the key, its bucket
//!   index, the links to its neighbours in the bucket chain, and a reference
//!   into the list (a [`NodeHandle`] when used by the cache manager).
//!
//! # Handles
//!
//! A [`NodeHandle`] is an index into the list arena paired with the generation
//! of the slot at the time the node was created. When a node is removed its slot
//! generation is bumped, so a handle that outlives its node never resolves to a
//! different node that later reuses the slot.
//!
//! ```text
//!   hash table arena                  list arena
//!  ┌──────────────────┐            ┌───────────────────┐
//!  │ HashEntry { k=7, │  handle    │ slot 3 (gen 2)    │
//!  │   value: (3, 2) ─┼───────────▶│ ListNode { k=7 }  │
//!  └──────────────────┘            └───────────────────┘
//! ```

use core::fmt;

/// Integer key used to address cache entries.
pub type Key = i64;

/// Stable reference to a node in an [`OrderList`](crate::list::OrderList).
///
/// Handles are cheap to copy and compare. A handle only resolves while the
/// node it was issued for is still linked into the list that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeHandle {
    /// Arena slot index this handle points at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Slot generation this handle was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({}v{})", self.index, self.generation)
    }
}

/// A node of the ordering list.
///
/// Exactly one `ListNode` exists per live key. The node owns the payload.
pub struct ListNode<V> {
    /// The key this node was inserted under.
    pub key: Key,
    /// The cached payload.
    pub payload: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<V> ListNode<V> {
    pub(crate) fn new(key: Key, payload: V) -> Self {
        ListNode {
            key,
            payload,
            prev: None,
            next: None,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ListNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListNode")
            .field("key", &self.key)
            .field("payload", &self.payload)
            .finish()
    }
}

/// An entry of a bucket chain in the [`ChainedHashTable`](crate::hash_table::ChainedHashTable).
///
/// `T` is whatever the table maps keys to. The cache manager stores the
/// [`NodeHandle`] of the matching [`ListNode`], which is a non-owning reference.
pub struct HashEntry<T> {
    /// The key this entry was added under.
    pub key: Key,
    /// Bucket index computed from `key` when the entry was added.
    pub hash_code: usize,
    /// The mapped value.
    pub value: T,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<T> HashEntry<T> {
    pub(crate) fn new(key: Key, hash_code: usize, value: T) -> Self {
        HashEntry {
            key,
            hash_code,
            value,
            prev: None,
            next: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HashEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashEntry")
            .field("key", &self.key)
            .field("hash_code", &self.hash_code)
            .field("value", &self.value)
            .finish()
    }
}
