//! Arena-backed doubly linked ordering list.
//!
//! Nodes are stored in a `Vec` of slots and linked by slot index, so no node is
//! ever individually heap allocated and no raw pointers are involved. Freed
//! slots go on a free list and are recycled by later insertions. Every slot
//! carries a generation counter that is bumped when its node is removed; a
//! [`NodeHandle`] records the generation it was issued for and stops resolving
//! once that node is gone.
//!
//! The head of the list is the most recently positioned node, the tail the
//! least recently positioned one.

extern crate alloc;

use crate::entry::{Key, ListNode, NodeHandle};
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

struct Slot<V> {
    generation: u32,
    node: Option<ListNode<V>>,
}

/// A doubly linked list of keyed nodes with O(1) relocation.
///
/// Positional operations (`insert_at_head`, `remove_tail_node`, `move_to_head`,
/// ...) run in O(1). Operations addressed by key (`remove`, `move_node_to_head`,
/// ...) scan the list from the head and run in O(n).
///
/// # Examples
///
/// ```
/// use chain_cache::list::OrderList;
///
/// let mut list = OrderList::new();
/// list.insert_at_head(1, "one");
/// list.insert_at_head(2, "two");
/// list.insert_at_tail(3, "three");
/// assert_eq!(list.keys().collect::<Vec<_>>(), vec![2, 1, 3]);
///
/// list.move_node_to_head(3);
/// assert_eq!(list.keys().rev().collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
pub struct OrderList<V> {
    slots: Vec<Slot<V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<V> OrderList<V> {
    /// Creates an empty list.
    pub fn new() -> Self {
        OrderList {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes before the arena
    /// has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderList {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of nodes in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the node at the head of the list.
    pub fn head(&self) -> Option<&ListNode<V>> {
        self.head.and_then(|idx| self.node_at(idx))
    }

    /// Returns the node at the tail of the list.
    pub fn tail(&self) -> Option<&ListNode<V>> {
        self.tail.and_then(|idx| self.node_at(idx))
    }

    /// Returns the handle of the head node.
    pub fn head_handle(&self) -> Option<NodeHandle> {
        self.head.map(|idx| self.handle_at(idx))
    }

    /// Returns the handle of the tail node.
    pub fn tail_handle(&self) -> Option<NodeHandle> {
        self.tail.map(|idx| self.handle_at(idx))
    }

    /// Resolves a handle to its node, or `None` if the node has been removed.
    pub fn get(&self, handle: NodeHandle) -> Option<&ListNode<V>> {
        self.resolve(handle).and_then(|idx| self.node_at(idx))
    }

    /// Resolves a handle to a mutable reference to the node's payload.
    ///
    /// Only the payload is exposed mutably; the key and the links are owned by
    /// the list.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut V> {
        let idx = self.resolve(handle)?;
        self.node_at_mut(idx).map(|node| &mut node.payload)
    }

    /// Returns the handle of the first node (from the head) carrying `key`.
    pub fn find(&self, key: Key) -> Option<NodeHandle> {
        let mut current = self.head;
        while let Some(idx) = current {
            let node = self.node_at(idx)?;
            if node.key == key {
                return Some(self.handle_at(idx));
            }
            current = node.next;
        }
        None
    }

    /// Inserts a new node at the head of the list.
    pub fn insert_at_head(&mut self, key: Key, payload: V) -> NodeHandle {
        let handle = self.alloc(ListNode::new(key, payload));
        self.attach_head(handle.index);
        self.len += 1;
        handle
    }

    /// Inserts a new node at the tail of the list.
    pub fn insert_at_tail(&mut self, key: Key, payload: V) -> NodeHandle {
        let handle = self.alloc(ListNode::new(key, payload));
        self.attach_tail(handle.index);
        self.len += 1;
        handle
    }

    /// Removes the first node carrying `key`, wherever it sits in the list.
    ///
    /// Returns the removed key and payload, or `None` if no node has that key.
    pub fn remove(&mut self, key: Key) -> Option<(Key, V)> {
        let handle = self.find(key)?;
        self.remove_node(handle)
    }

    /// Removes the node identified by `handle` in O(1).
    pub fn remove_node(&mut self, handle: NodeHandle) -> Option<(Key, V)> {
        let idx = self.resolve(handle)?;
        self.unlink_and_release(idx)
    }

    /// Removes the head node.
    pub fn remove_head_node(&mut self) -> Option<(Key, V)> {
        let idx = self.head?;
        self.unlink_and_release(idx)
    }

    /// Removes the tail node.
    pub fn remove_tail_node(&mut self) -> Option<(Key, V)> {
        let idx = self.tail?;
        self.unlink_and_release(idx)
    }

    /// Moves the first node carrying `key` to the head.
    ///
    /// Returns false if no node has that key. A node already at the head stays
    /// where it is.
    pub fn move_node_to_head(&mut self, key: Key) -> bool {
        match self.find(key) {
            Some(handle) => self.move_to_head(handle),
            None => false,
        }
    }

    /// Moves the first node carrying `key` to the tail.
    ///
    /// Returns false if no node has that key. A node already at the tail stays
    /// where it is.
    pub fn move_node_to_tail(&mut self, key: Key) -> bool {
        match self.find(key) {
            Some(handle) => self.move_to_tail(handle),
            None => false,
        }
    }

    /// Moves the node identified by `handle` to the head in O(1).
    pub fn move_to_head(&mut self, handle: NodeHandle) -> bool {
        let Some(idx) = self.resolve(handle) else {
            return false;
        };
        if self.head != Some(idx) {
            self.detach(idx);
            self.attach_head(idx);
        }
        true
    }

    /// Moves the node identified by `handle` to the tail in O(1).
    pub fn move_to_tail(&mut self, handle: NodeHandle) -> bool {
        let Some(idx) = self.resolve(handle) else {
            return false;
        };
        if self.tail != Some(idx) {
            self.detach(idx);
            self.attach_tail(idx);
        }
        true
    }

    /// Removes every node.
    ///
    /// The arena keeps its allocation, and every outstanding handle stops
    /// resolving.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates over `(key, payload)` from head to tail.
    ///
    /// The iterator is double ended; call `.rev()` to walk tail to head.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Iterates over the keys from head to tail.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = Key> + ExactSizeIterator + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Walks the list in both directions and checks that every link is mutual,
    /// that the walk ends at `tail`, and that `len` matches the number of live
    /// nodes. Runs in O(n).
    pub fn is_consistent(&self) -> bool {
        let live = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        if live != self.len || self.head.is_none() != (self.len == 0) {
            return false;
        }

        let mut prev: Option<usize> = None;
        let mut current = self.head;
        let mut steps = 0;
        while let Some(idx) = current {
            let Some(node) = self.node_at(idx) else {
                return false;
            };
            if node.prev != prev || steps >= self.len {
                return false;
            }
            steps += 1;
            prev = Some(idx);
            current = node.next;
        }
        steps == self.len && prev == self.tail
    }

    fn node_at(&self, idx: usize) -> Option<&ListNode<V>> {
        self.slots.get(idx)?.node.as_ref()
    }

    fn node_at_mut(&mut self, idx: usize) -> Option<&mut ListNode<V>> {
        self.slots.get_mut(idx)?.node.as_mut()
    }

    fn handle_at(&self, index: usize) -> NodeHandle {
        let generation = self.slots.get(index).map_or(0, |slot| slot.generation);
        NodeHandle { index, generation }
    }

    fn resolve(&self, handle: NodeHandle) -> Option<usize> {
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.node.is_some()).then_some(handle.index)
    }

    fn alloc(&mut self, node: ListNode<V>) -> NodeHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeHandle {
                index,
                generation: 0,
            }
        }
    }

    fn unlink_and_release(&mut self, idx: usize) -> Option<(Key, V)> {
        self.detach(idx);
        let slot = self.slots.get_mut(idx)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx);
        self.len -= 1;
        Some((node.key, node.payload))
    }

    /// Unlinks a node from its neighbours without freeing its slot.
    fn detach(&mut self, idx: usize) {
        let Some((prev, next)) = self.node_at(idx).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev.and_then(|p| self.node_at_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_at_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.node_at_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_head(&mut self, idx: usize) {
        let old_head = self.head;
        match self.node_at_mut(idx) {
            Some(node) => {
                node.prev = None;
                node.next = old_head;
            }
            None => return,
        }
        match old_head.and_then(|h| self.node_at_mut(h)) {
            Some(head) => head.prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn attach_tail(&mut self, idx: usize) {
        let old_tail = self.tail;
        match self.node_at_mut(idx) {
            Some(node) => {
                node.prev = old_tail;
                node.next = None;
            }
            None => return,
        }
        match old_tail.and_then(|t| self.node_at_mut(t)) {
            Some(tail) => tail.next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

impl<V> Default for OrderList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for OrderList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderList")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Double-ended iterator over an [`OrderList`], created by [`OrderList::iter`].
#[derive(Debug)]
pub struct Iter<'a, V> {
    list: &'a OrderList<V>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node_at(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some((node.key, &node.payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node_at(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((node.key, &node.payload))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}
