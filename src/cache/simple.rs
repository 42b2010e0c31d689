//! Simple TTL Cache
//!
//! Low-overhead cache over a plain `HashMap` with no locking. The map is
//! shared only with a sweep task running on the same thread, so the type is
//! neither `Send` nor `Sync`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cache::{CacheEntry, TtlCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_local_cleanup_task, CleanupHandle};

type Entries<T> = RefCell<HashMap<String, CacheEntry<T>>>;

// == Simple TTL Cache ==
/// Single-threaded TTL cache.
///
/// # Usage precondition
/// No internal synchronization is performed. The cache and its sweep task
/// interleave cooperatively on one thread inside a Tokio `LocalSet`, and the
/// compiler rejects moving or sharing the cache across threads. Callers that
/// need multi-threaded access should use
/// [`ConcurrentTtlCache`](crate::cache::ConcurrentTtlCache) instead.
#[derive(Debug)]
pub struct SimpleTtlCache<T> {
    /// Key-value storage
    entries: Rc<Entries<T>>,
    /// Interval between background sweeps
    cleanup_interval: Duration,
    /// Background sweep task
    sweeper: CleanupHandle,
}

impl<T> SimpleTtlCache<T>
where
    T: Clone + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and starts its background sweep.
    ///
    /// # Panics
    /// Panics if `cleanup_interval` is zero, or if called outside a Tokio
    /// `LocalSet`.
    pub fn new(cleanup_interval: Duration) -> Self {
        match Self::try_new(cleanup_interval) {
            Ok(cache) => cache,
            Err(err) => panic!("failed to create simple cache: {}", err),
        }
    }

    /// Creates an empty cache and starts its background sweep.
    ///
    /// # Errors
    /// - `CacheError::InvalidInterval` if `cleanup_interval` is zero
    /// - `CacheError::NoRuntime` if there is no Tokio runtime at all
    ///
    /// # Panics
    /// Panics if a runtime exists but the caller is not inside a `LocalSet`.
    pub fn try_new(cleanup_interval: Duration) -> Result<Self> {
        if cleanup_interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        tokio::runtime::Handle::try_current()
            .map_err(|err| CacheError::NoRuntime(err.to_string()))?;

        let entries: Rc<Entries<T>> = Rc::new(RefCell::new(HashMap::new()));

        let store = Rc::downgrade(&entries);
        let sweeper = spawn_local_cleanup_task(cleanup_interval, move || {
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

    /// Returns the remaining TTL of `key`: `None` if absent, `Some(None)` if
    /// it never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        self.entries
            .borrow()
            .get(key)
            .map(|entry| entry.ttl_remaining())
    }

    /// Stops the background sweep and waits for it to exit.
    pub async fn shutdown(&self) {
        self.sweeper.shutdown().await;
    }

    /// Returns true while the background sweep is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.is_running()
    }
}

impl<T> TtlCache<T> for SimpleTtlCache<T>
where
    T: Clone + 'static,
{
    fn set(&self, key: impl Into<String>, value: T, ttl: Duration) {
        self.entries
            .borrow_mut()
            .insert(key.into(), CacheEntry::new(value, ttl));
    }

    fn get_with_check(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        let mut entries = self.entries.borrow_mut();

        let entry = entries.get(key)?;
        if !entry.is_expired_at(now) {
            return Some(entry.value.clone());
        }

        entries.remove(key);
        trace!(key, "Lazily expired cache entry");
        None
    }

    fn get_without_check(&self, key: &str) -> Option<T> {
        self.entries
            .borrow()
            .get(key)
            .map(|entry| entry.value.clone())
    }

    fn delete(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn clear(&self) {
        // Swap in a fresh map rather than removing key by key
        *self.entries.borrow_mut() = HashMap::new();
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn purge_expired(&self) -> usize {
        purge_expired_entries(&self.entries)
    }
}

// == Cleanup Expired ==
/// Removes every entry expired as of a single `now`, returning the count.
///
/// Expired keys are collected first and removed afterwards, so the map is
/// never mutated while being iterated.
fn purge_expired_entries<T>(entries: &Entries<T>) -> usize {
    let now = Instant::now();
    let mut entries = entries.borrow_mut();

    let expired_keys: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_expired_at(now))
        .map(|(key, _)| key.clone())
        .collect();

    for key in &expired_keys {
        entries.remove(key);
    }

    expired_keys.len()
}
