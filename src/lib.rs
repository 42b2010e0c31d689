//! easycache - A generic in-memory key-value cache with per-entry TTL
//!
//! Two variants share the [`TtlCache`] interface:
//! - [`ConcurrentTtlCache`]: safe to share across threads and tasks
//! - [`SimpleTtlCache`]: unsynchronized, single-threaded, runs in a `LocalSet`
//!
//! Each cache owns one background task that sweeps expired entries at a fixed
//! interval. The task stops on [`ConcurrentTtlCache::shutdown`] /
//! [`SimpleTtlCache::shutdown`] or when the cache is dropped.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

use std::time::Duration;

pub use cache::{CacheEntry, ConcurrentTtlCache, SimpleTtlCache, TtlCache};
pub use config::{CacheVariant, Config};
pub use error::{CacheError, Result};

/// Creates a thread-safe cache sweeping every `cleanup_interval`.
///
/// # Panics
/// See [`ConcurrentTtlCache::new`].
pub fn new_concurrent_cache<T>(cleanup_interval: Duration) -> ConcurrentTtlCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    ConcurrentTtlCache::new(cleanup_interval)
}

/// Creates a single-threaded cache sweeping every `cleanup_interval`.
///
/// # Panics
/// See [`SimpleTtlCache::new`].
pub fn new_simple_cache<T>(cleanup_interval: Duration) -> SimpleTtlCache<T>
where
    T: Clone + 'static,
{
    SimpleTtlCache::new(cleanup_interval)
}
