//! Concurrent TTL Cache
//!
//! Thread-safe cache backed by a sharded concurrent map. Readers never wait
//! on a cache-wide lock, and the sweep task removes expired entries one
//! shard at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

use crate::cache::{CacheEntry, TtlCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, CleanupHandle};

type Entries<T> = DashMap<String, CacheEntry<T>>;

// == Concurrent TTL Cache ==
/// TTL cache that may be shared freely between threads and tasks.
///
/// Wrap it in an `Arc` to share it. Each individual operation is atomic;
/// sequences of operations are not.
#[derive(Debug)]
pub struct ConcurrentTtlCache<T> {
    /// Key-value storage
    entries: Arc<Entries<T>>,
    /// Interval between background sweeps
    cleanup_interval: Duration,
    /// Background sweep task
    sweeper: CleanupHandle,
}

impl<T> ConcurrentTtlCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and starts its background sweep.
    ///
    /// # Panics
    /// Panics if `cleanup_interval` is zero or if called outside a Tokio
    /// runtime. Use [`ConcurrentTtlCache::try_new`] to handle those cases.
    pub fn new(cleanup_interval: Duration) -> Self {
        match Self::try_new(cleanup_interval) {
            Ok(cache) => cache,
            Err(err) => panic!("failed to create concurrent cache: {}", err),
        }
    }

    /// Creates an empty cache and starts its background sweep.
    ///
    /// # Errors
    /// - `CacheError::InvalidInterval` if `cleanup_interval` is zero
    /// - `CacheError::NoRuntime` if there is no Tokio runtime to spawn onto
    pub fn try_new(cleanup_interval: Duration) -> Result<Self> {
        if cleanup_interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        tokio::runtime::Handle::try_current()
            .map_err(|err| CacheError::NoRuntime(err.to_string()))?;

        let entries: Arc<Entries<T>> = Arc::new(DashMap::new());

        // The task only holds a weak reference so it never keeps the map alive.
        let store = Arc::downgrade(&entries);
        let sweeper = spawn_cleanup_task(cleanup_interval, move || {
            store.upgrade().map(|entries| purge_expired_entries(&entries))
        });

        Ok(Self {
            entries,
            cleanup_interval,
            sweeper,
        })
    }

    /// Creates a cache using the configured cleanup interval.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::try_new(config.cleanup_interval)
    }

    /// Returns the interval between background sweeps.
    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    // == Time To Live ==
    /// Returns the remaining TTL of `key`.
    ///
    /// `None` if the key is absent, `Some(None)` if it never expires. Like
    /// `get_without_check`, this neither checks nor removes expired entries.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        self.entries.get(key).map(|entry| entry.ttl_remaining())
    }

    // == Shutdown ==
    /// Stops the background sweep and waits for it to exit.
    ///
    /// The cache stays usable afterwards; expired entries are then only
    /// removed lazily or through [`TtlCache::purge_expired`].
    pub async fn shutdown(&self) {
        self.sweeper.shutdown().await;
    }

    /// Returns true while the background sweep is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.is_running()
    }
}

impl<T> TtlCache<T> for ConcurrentTtlCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn set(&self, key: impl Into<String>, value: T, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
    }

    fn get_with_check(&self, key: &str) -> Option<T> {
        let now = Instant::now();

        match self.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired_at(now) => return Some(entry.value.clone()),
            Some(_) => {}
        }

        // The read guard is released above. Only remove the entry if it is still
        // the expired one: a racing `set` may already have replaced it.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            trace!(key, "Lazily expired cache entry");
        }
        None
    }

    fn get_without_check(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&self) -> usize {
        purge_expired_entries(&self.entries)
    }
}

// == Cleanup Expired ==
/// Removes every entry expired as of a single `now`, returning the count.
fn purge_expired_entries<T>(entries: &Entries<T>) -> usize {
    let now = Instant::now();
    let mut removed = 0;

    entries.retain(|_, entry| {
        let keep = !entry.is_expired_at(now);
        if !keep {
            removed += 1;
        }
        keep
    });

    removed
}
