//! Chained hash table with a fixed bucket array.
//!
//! Keys are hashed with `key mod bucket_count` (Euclidean, so negative keys
//! land in range too). Every bucket holds the head of a doubly linked chain of
//! [`HashEntry`] records. The table never resizes: the number of buckets is
//! chosen at construction and is independent of how many entries the table
//! holds.
//!
//! Like [`OrderList`](crate::list::OrderList), entries live in an arena of
//! slots and chains link them by slot index.
//!
//! ```text
//!  buckets            chains
//!  ┌───┐
//!  │ 0 │──▶ [k=10] ⇄ [k=0]
//!  │ 1 │──▶ [k=6]
//!  │ 2 │    (empty)
//!  │ 3 │──▶ [k=8] ⇄ [k=3]
//!  │ 4 │    (empty)
//!  └───┘         bucket_count = 5
//! ```

extern crate alloc;

use crate::entry::{HashEntry, Key};
use crate::view::{BucketView, EmptyRanges};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::num::NonZeroUsize;

/// A fixed-size chained hash table mapping integer keys to values of type `T`.
///
/// # Examples
///
/// ```
/// use chain_cache::hash_table::ChainedHashTable;
/// use core::num::NonZeroUsize;
///
/// let mut table = ChainedHashTable::new(NonZeroUsize::new(5).unwrap());
/// table.add(3, "three");
/// table.add(8, "eight");
/// assert_eq!(table.hash_code(8), 3);
/// assert_eq!(table.chain(3).map(|e| e.key).collect::<Vec<_>>(), vec![8, 3]);
///
/// assert_eq!(table.add(3, "THREE"), Some("three"));
/// assert_eq!(table.len(), 2);
/// ```
pub struct ChainedHashTable<T> {
    buckets: Vec<Option<usize>>,
    entries: Vec<Option<HashEntry<T>>>,
    free: Vec<usize>,
    len: usize,
    modulus: i64,
}

impl<T> ChainedHashTable<T> {
    /// Creates an empty table with `bucket_count` buckets.
    pub fn new(bucket_count: NonZeroUsize) -> Self {
        let count = bucket_count.get();
        ChainedHashTable {
            buckets: vec![None; count],
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
            modulus: i64::try_from(count).unwrap_or(i64::MAX),
        }
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Computes the bucket index for `key`.
    #[inline]
    pub fn hash_code(&self, key: Key) -> usize {
        // rem_euclid with a positive modulus is always in 0..modulus
        key.rem_euclid(self.modulus) as usize
    }

    /// Adds `value` under `key`.
    ///
    /// If the key is already present, a new entry takes the old entry's place in
    /// its chain and the old entry is discarded; its value is returned. New keys
    /// are prepended to the head of their chain and return `None`.
    pub fn add(&mut self, key: Key, value: T) -> Option<T> {
        let hash_code = self.hash_code(key);
        let new_idx = self.alloc(HashEntry::new(key, hash_code, value));

        if let Some(old_idx) = self.find(key) {
            let (prev, next) = self.links(old_idx);
            self.set_links(new_idx, prev, next);
            match prev {
                Some(p) => self.set_next(p, Some(new_idx)),
                None => self.buckets[hash_code] = Some(new_idx),
            }
            if let Some(n) = next {
                self.set_prev(n, Some(new_idx));
            }
            return self.release(old_idx).map(|entry| entry.value);
        }

        let old_head = self.buckets[hash_code];
        self.set_links(new_idx, None, old_head);
        if let Some(h) = old_head {
            self.set_prev(h, Some(new_idx));
        }
        self.buckets[hash_code] = Some(new_idx);
        self.len += 1;
        None
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove(&mut self, key: Key) -> Option<T> {
        let idx = self.find(key)?;
        let (prev, next) = self.links(idx);
        match prev {
            Some(p) => self.set_next(p, next),
            None => {
                let hash_code = self.hash_code(key);
                self.buckets[hash_code] = next;
            }
        }
        if let Some(n) = next {
            self.set_prev(n, prev);
        }
        let entry = self.release(idx)?;
        self.len -= 1;
        Some(entry.value)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: Key) -> Option<&T> {
        self.entry(key).map(|entry| &entry.value)
    }

    /// Returns the full entry stored under `key`.
    pub fn entry(&self, key: Key) -> Option<&HashEntry<T>> {
        self.find(key).and_then(|idx| self.entry_at(idx))
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Removes every entry. The bucket array keeps its length.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|head| *head = None);
        self.free.clear();
        for (index, slot) in self.entries.iter_mut().enumerate() {
            *slot = None;
            self.free.push(index);
        }
        self.len = 0;
    }

    /// Iterates over the chain in bucket `index`, head first.
    ///
    /// An out-of-range index yields an empty chain.
    pub fn chain(&self, index: usize) -> Chain<'_, T> {
        Chain {
            table: self,
            current: self.buckets.get(index).copied().flatten(),
        }
    }

    /// Iterates over every bucket in index order.
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = BucketView<'_, T>> + '_ {
        (0..self.buckets.len()).map(move |index| BucketView::new(index, self.chain(index)))
    }

    /// Iterates over the indices of buckets with no entries.
    pub fn empty_buckets(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(index, head)| head.is_none().then_some(index))
    }

    /// Iterates over maximal runs of consecutive empty buckets.
    pub fn empty_ranges(&self) -> EmptyRanges<impl Iterator<Item = usize> + '_> {
        EmptyRanges::new(self.empty_buckets())
    }

    /// Walks every chain and checks that links are mutual, that every entry
    /// sits in the bucket its key hashes to, that keys are unique, and that
    /// `len` matches the number of live entries. Runs in O(n + buckets).
    pub fn is_consistent(&self) -> bool {
        let live = self.entries.iter().filter(|slot| slot.is_some()).count();
        if live != self.len {
            return false;
        }

        let mut seen = 0;
        for (index, head) in self.buckets.iter().enumerate() {
            let mut prev: Option<usize> = None;
            let mut current = *head;
            let mut chain_keys: Vec<Key> = Vec::new();
            while let Some(idx) = current {
                let Some(entry) = self.entry_at(idx) else {
                    return false;
                };
                if entry.prev != prev
                    || entry.hash_code != index
                    || self.hash_code(entry.key) != index
                    || chain_keys.contains(&entry.key)
                    || seen >= self.len
                {
                    return false;
                }
                chain_keys.push(entry.key);
                seen += 1;
                prev = Some(idx);
                current = entry.next;
            }
        }
        seen == self.len
    }

    fn find(&self, key: Key) -> Option<usize> {
        let mut current = self.buckets.get(self.hash_code(key)).copied().flatten();
        while let Some(idx) = current {
            let entry = self.entry_at(idx)?;
            if entry.key == key {
                return Some(idx);
            }
            current = entry.next;
        }
        None
    }

    fn entry_at(&self, idx: usize) -> Option<&HashEntry<T>> {
        self.entries.get(idx)?.as_ref()
    }

    fn entry_at_mut(&mut self, idx: usize) -> Option<&mut HashEntry<T>> {
        self.entries.get_mut(idx)?.as_mut()
    }

    fn links(&self, idx: usize) -> (Option<usize>, Option<usize>) {
        self.entry_at(idx)
            .map_or((None, None), |entry| (entry.prev, entry.next))
    }

    fn set_links(&mut self, idx: usize, prev: Option<usize>, next: Option<usize>) {
        if let Some(entry) = self.entry_at_mut(idx) {
            entry.prev = prev;
            entry.next = next;
        }
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(entry) = self.entry_at_mut(idx) {
            entry.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(entry) = self.entry_at_mut(idx) {
            entry.next = next;
        }
    }

    fn alloc(&mut self, entry: HashEntry<T>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.entries[idx] = Some(entry);
            idx
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<HashEntry<T>> {
        let entry = self.entries.get_mut(idx)?.take()?;
        self.free.push(idx);
        Some(entry)
    }
}

impl<T> fmt::Debug for ChainedHashTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashTable")
            .field("bucket_count", &self.buckets.len())
            .field("len", &self.len)
            .finish()
    }
}

/// Iterator over the entries of one bucket chain, created by
/// [`ChainedHashTable::chain`].
#[derive(Debug)]
pub struct Chain<'a, T> {
    table: &'a ChainedHashTable<T>,
    current: Option<usize>,
}

impl<'a, T> Iterator for Chain<'a, T> {
    type Item = &'a HashEntry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.table.entry_at(self.current?)?;
        self.current = entry.next;
        Some(entry)
    }
}

impl<T> FusedIterator for Chain<'_, T> {}

impl<T> Clone for Chain<'_, T> {
    fn clone(&self) -> Self {
        Chain {
            table: self.table,
            current: self.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::EmptyRange;

    fn table<T>(buckets: usize) -> ChainedHashTable<T> {
        ChainedHashTable::new(NonZeroUsize::new(buckets).unwrap())
    }

    fn chain_keys<T>(table: &ChainedHashTable<T>, index: usize) -> Vec<Key> {
        table.chain(index).map(|entry| entry.key).collect()
    }

    #[test]
    fn test_hash_code_is_key_mod_buckets() {
        let t = table::<()>(7);
        assert_eq!(t.hash_code(0), 0);
        assert_eq!(t.hash_code(13), 6);
        assert_eq!(t.hash_code(14), 0);
        assert_eq!(t.hash_code(-1), 6);
        assert_eq!(t.hash_code(-7), 0);
        assert_eq!(t.hash_code(i64::MIN), i64::MIN.rem_euclid(7) as usize);
    }

    #[test]
    fn test_add_prepends_to_chain() {
        let mut t = table(5);
        assert_eq!(t.add(3, 'a'), None);
        assert_eq!(t.add(8, 'b'), None);
        assert_eq!(t.add(13, 'c'), None);
        assert_eq!(chain_keys(&t, 3), vec![13, 8, 3]);
        assert_eq!(t.len(), 3);
        assert!(t.is_consistent());
    }

    #[test]
    fn test_add_existing_key_replaces_in_place() {
        let mut t = table(5);
        t.add(3, 'a');
        t.add(8, 'b');
        t.add(13, 'c');

        // middle of chain
        assert_eq!(t.add(8, 'B'), Some('b'));
        assert_eq!(chain_keys(&t, 3), vec![13, 8, 3]);
        // head of chain
        assert_eq!(t.add(13, 'C'), Some('c'));
        assert_eq!(chain_keys(&t, 3), vec![13, 8, 3]);
        // tail of chain
        assert_eq!(t.add(3, 'A'), Some('a'));
        assert_eq!(chain_keys(&t, 3), vec![13, 8, 3]);

        assert_eq!(t.len(), 3);
        assert_eq!(t.get(8), Some(&'B'));
        assert_eq!(t.get(13), Some(&'C'));
        assert_eq!(t.get(3), Some(&'A'));
        assert!(t.is_consistent());
    }

    #[test]
    fn test_remove_patches_chain() {
        let mut t = table(5);
        for key in [3, 8, 13, 18] {
            t.add(key, key);
        }
        assert_eq!(chain_keys(&t, 3), vec![18, 13, 8, 3]);

        assert_eq!(t.remove(13), Some(13));
        assert_eq!(chain_keys(&t, 3), vec![18, 8, 3]);
        assert_eq!(t.remove(18), Some(18));
        assert_eq!(chain_keys(&t, 3), vec![8, 3]);
        assert_eq!(t.remove(3), Some(3));
        assert_eq!(chain_keys(&t, 3), vec![8]);
        assert_eq!(t.remove(8), Some(8));
        assert!(chain_keys(&t, 3).is_empty());
        assert!(t.is_empty());
        assert!(t.is_consistent());
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let mut t = table(5);
        t.add(1, ());
        assert_eq!(t.remove(6), None);
        assert_eq!(t.remove(2), None);
        assert_eq!(t.len(), 1);
        assert!(t.contains(1));
    }

    #[test]
    fn test_get_and_entry() {
        let mut t = table(4);
        t.add(-3, "minus three");
        let entry = t.entry(-3).unwrap();
        assert_eq!(entry.key, -3);
        assert_eq!(entry.hash_code, 1);
        assert_eq!(entry.value, "minus three");
        assert!(t.contains(-3));
        assert!(!t.contains(1));
        assert_eq!(t.get(1), None);
    }

    #[test]
    fn test_clear_empties_every_bucket() {
        let mut t = table(3);
        for key in 0..10 {
            t.add(key, key);
        }
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.bucket_count(), 3);
        assert_eq!(t.empty_buckets().count(), 3);
        assert!((0..10).all(|key| !t.contains(key)));
        assert!(t.is_consistent());

        t.add(4, 4);
        assert_eq!(t.len(), 1);
        assert!(t.is_consistent());
    }

    #[test]
    fn test_buckets_and_empty_ranges() {
        let mut t = table(8);
        t.add(2, ());
        t.add(10, ());
        t.add(5, ());

        let layout: Vec<(usize, Vec<Key>)> = t
            .buckets()
            .map(|bucket| (bucket.index(), bucket.keys().collect()))
            .collect();
        assert_eq!(layout[2], (2, vec![10, 2]));
        assert_eq!(layout[5], (5, vec![5]));
        assert!(layout[0].1.is_empty());

        assert_eq!(t.empty_buckets().collect::<Vec<_>>(), vec![0, 1, 3, 4, 6, 7]);
        assert_eq!(
            t.empty_ranges().collect::<Vec<_>>(),
            vec![
                EmptyRange { start: 0, end: 1 },
                EmptyRange { start: 3, end: 4 },
                EmptyRange { start: 6, end: 7 },
            ]
        );
    }

    #[test]
    fn test_chain_out_of_range_is_empty() {
        let t = table::<()>(2);
        assert_eq!(t.chain(5).count(), 0);
    }

    #[test]
    fn test_single_bucket_degrades_to_one_chain() {
        let mut t = table(1);
        for key in 0..20 {
            t.add(key, key * 2);
        }
        assert_eq!(t.chain(0).count(), 20);
        assert_eq!(t.get(7), Some(&14));
        assert!(t.is_consistent());
    }
}
