//! Cache Configuration
//!
//! [`CacheManagerConfig`] has public fields for simple instantiation. Every
//! field must be provided at construction and stays fixed for the lifetime of
//! the cache.
//!
//! # Sizing Guidelines
//!
//! The two parameters are independent:
//!
//! - **`bucket_count`**: number of hash buckets. Lookup cost is proportional to
//!   the chain length, roughly `len / bucket_count`. A prime bucket count
//!   spreads sequential keys evenly under `key mod bucket_count`.
//! - **`capacity`**: maximum number of entries before the least recently used
//!   one is evicted.
//!
//! A bucket count close to the capacity keeps chains at about one entry each.
//!
//! # Examples
//!
//! ```
//! use chain_cache::config::CacheManagerConfig;
//! use chain_cache::CacheManager;
//! use core::num::NonZeroUsize;
//!
//! let config = CacheManagerConfig {
//!     bucket_count: NonZeroUsize::new(101).unwrap(),
//!     capacity: NonZeroUsize::new(100).unwrap(),
//! };
//! let cache: CacheManager<String> = CacheManager::init(config);
//! assert_eq!(cache.max_cache_size(), 100);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for a [`CacheManager`](crate::CacheManager).
///
/// # Fields
///
/// - `bucket_count`: size of the fixed hash bucket array.
/// - `capacity`: maximum number of live entries.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CacheManagerConfig {
    /// Number of hash buckets. Fixed; the table never resizes.
    pub bucket_count: NonZeroUsize,
    /// Maximum number of entries the cache holds.
    pub capacity: NonZeroUsize,
}

impl CacheManagerConfig {
    /// Creates a configuration from raw counts, or `None` if either is zero.
    pub fn new(bucket_count: usize, capacity: usize) -> Option<Self> {
        Some(CacheManagerConfig {
            bucket_count: NonZeroUsize::new(bucket_count)?,
            capacity: NonZeroUsize::new(capacity)?,
        })
    }
}

impl fmt::Debug for CacheManagerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManagerConfig")
            .field("bucket_count", &self.bucket_count)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = CacheManagerConfig {
            bucket_count: NonZeroUsize::new(11).unwrap(),
            capacity: NonZeroUsize::new(10).unwrap(),
        };
        assert_eq!(config.bucket_count.get(), 11);
        assert_eq!(config.capacity.get(), 10);
    }

    #[test]
    fn test_config_new_rejects_zero() {
        assert!(CacheManagerConfig::new(0, 10).is_none());
        assert!(CacheManagerConfig::new(10, 0).is_none());
        assert_eq!(
            CacheManagerConfig::new(7, 3).map(|c| (c.bucket_count.get(), c.capacity.get())),
            Some((7, 3))
        );
    }
}
