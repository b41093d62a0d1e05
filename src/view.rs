//! Read-only views over the hash table layout, for display.

use crate::entry::Key;
use crate::hash_table::Chain;
use core::fmt;
use core::iter::{FusedIterator, Peekable};

/// One bucket of a [`ChainedHashTable`](crate::hash_table::ChainedHashTable)
/// together with its chain.
#[derive(Debug, Clone)]
pub struct BucketView<'a, T> {
    index: usize,
    chain: Chain<'a, T>,
}

impl<'a, T> BucketView<'a, T> {
    pub(crate) fn new(index: usize, chain: Chain<'a, T>) -> Self {
        BucketView { index, chain }
    }

    /// Bucket index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if no entry hashes to this bucket.
    pub fn is_empty(&self) -> bool {
        self.chain.clone().next().is_none()
    }

    /// Entries in chain order.
    pub fn entries(&self) -> Chain<'a, T> {
        self.chain.clone()
    }

    /// Keys in chain order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + 'a {
        self.chain.clone().map(|entry| entry.key)
    }
}

/// An inclusive run `start..=end` of consecutive empty buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyRange {
    /// First empty bucket of the run.
    pub start: usize,
    /// Last empty bucket of the run.
    pub end: usize,
}

impl EmptyRange {
    /// Number of buckets in the run.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a run holds at least one bucket.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for EmptyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Groups an ascending sequence of empty bucket indices into [`EmptyRange`]s.
#[derive(Debug)]
pub struct EmptyRanges<I: Iterator<Item = usize>> {
    indices: Peekable<I>,
}

impl<I: Iterator<Item = usize>> EmptyRanges<I> {
    /// Wraps an ascending iterator of bucket indices.
    pub fn new(indices: I) -> Self {
        EmptyRanges {
            indices: indices.peekable(),
        }
    }
}

impl<I: Iterator<Item = usize>> Iterator for EmptyRanges<I> {
    type Item = EmptyRange;

    fn next(&mut self) -> Option<EmptyRange> {
        let start = self.indices.next()?;
        let mut end = start;
        while let Some(&next) = self.indices.peek() {
            if next != end + 1 {
                break;
            }
            end = next;
            self.indices.next();
        }
        Some(EmptyRange { start, end })
    }
}

impl<I: Iterator<Item = usize>> FusedIterator for EmptyRanges<I> {}
