//! Text rendering of the cache structures
//!
//! The core crate only exposes enumeration; this module turns it into the
//! transcript format. Every function writes whole lines to an [`OutputSink`].
//!
//! ```text
//! Printing out the cache contents
//!
//! Here are the List contents:
//! List node key: 3
//! List node key: 2
//! End of List
//!
//! Here are the Hash Table contents (2 entries):
//! Buckets 0-1: Empty
//! Bucket 2:
//!   key: 2
//! Bucket 3:
//!   key: 3
//! Buckets 4-10: Empty
//! End of table
//!
//! End of cache contents
//! ```

use crate::sink::OutputSink;
use chain_cache::{CacheManager, ChainedHashTable, EmptyRange, Key, OrderList};
use std::io;

/// Which end of the ordering list to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Most recently used first.
    HeadToTail,
    /// Least recently used first, i.e. eviction order.
    TailToHead,
}

/// Writes one `List node key: K` line per list node, or `The list is empty.`
pub fn write_list<V, S>(sink: &mut S, list: &OrderList<V>, direction: Direction) -> io::Result<()>
where
    S: OutputSink + ?Sized,
{
    if list.is_empty() {
        return sink.line("The list is empty.");
    }
    let keys = list.keys();
    let keys: Box<dyn Iterator<Item = Key> + '_> = match direction {
        Direction::HeadToTail => Box::new(keys),
        Direction::TailToHead => Box::new(keys.rev()),
    };
    for key in keys {
        sink.line(&format!("List node key: {key}"))?;
    }
    Ok(())
}

/// Writes the hash table bucket by bucket.
///
/// With `compress_empty`, each run of consecutive empty buckets is reported
/// on one line.
pub fn write_table<T, S>(
    sink: &mut S,
    table: &ChainedHashTable<T>,
    compress_empty: bool,
) -> io::Result<()>
where
    S: OutputSink + ?Sized,
{
    sink.line(&format!(
        "Here are the Hash Table contents ({} entries):",
        table.len()
    ))?;

    let mut pending: Option<EmptyRange> = None;
    for bucket in table.buckets() {
        let index = bucket.index();
        if bucket.is_empty() {
            if !compress_empty {
                sink.line(&format!("Bucket {index}: Empty"))?;
                continue;
            }
            pending = Some(match pending {
                Some(range) => EmptyRange {
                    start: range.start,
                    end: index,
                },
                None => EmptyRange {
                    start: index,
                    end: index,
                },
            });
            continue;
        }

        if let Some(range) = pending.take() {
            write_empty_range(sink, range)?;
        }
        sink.line(&format!("Bucket {index}:"))?;
        for key in bucket.keys() {
            sink.line(&format!("  key: {key}"))?;
        }
    }
    if let Some(range) = pending {
        write_empty_range(sink, range)?;
    }

    sink.line("End of table")
}

fn write_empty_range<S: OutputSink + ?Sized>(sink: &mut S, range: EmptyRange) -> io::Result<()> {
    if range.len() == 1 {
        sink.line(&format!("Bucket {range}: Empty"))
    } else {
        sink.line(&format!("Buckets {range}: Empty"))
    }
}

/// Writes the full cache: the ordering list head to tail, then the table.
pub fn write_cache<V, S>(sink: &mut S, cache: &CacheManager<V>, compress_empty: bool) -> io::Result<()>
where
    S: OutputSink + ?Sized,
{
    sink.line("")?;
    sink.line("Printing out the cache contents")?;
    sink.line("")?;
    sink.line("Here are the List contents:")?;
    write_list(sink, cache.list(), Direction::HeadToTail)?;
    sink.line("End of List")?;
    sink.line("")?;
    write_table(sink, cache.table(), compress_empty)?;
    sink.line("")?;
    sink.line("End of cache contents")
}
