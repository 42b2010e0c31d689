//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL expiration, in a concurrent
//! and a single-threaded flavour.

mod concurrent;
mod entry;
mod simple;


use std::time::Duration;

// Re-export public types
pub use concurrent::ConcurrentTtlCache;
pub use entry::CacheEntry;
pub use simple::SimpleTtlCache;

// == TTL Cache Trait ==
/// Operations shared by every cache variant.
///
/// Expired entries leave the cache in one of two ways: lazily, when
/// [`get_with_check`](TtlCache::get_with_check) finds one, or actively, when
/// the background sweep runs. Reads through `get_with_check` are therefore
/// allowed to mutate the cache.
pub trait TtlCache<T> {
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// A zero `ttl` stores an entry that never expires.
    fn set(&self, key: impl Into<String>, value: T, ttl: Duration);

    /// Returns a copy of the value if present and not expired.
    ///
    /// An expired entry found here is removed before returning `None`.
    fn get_with_check(&self, key: &str) -> Option<T>;

    /// Returns a copy of the stored value, even if it has expired.
    fn get_without_check(&self, key: &str) -> Option<T>;

    /// Removes `key`. Removing a missing key is a no-op.
    fn delete(&self, key: &str);

    /// Removes all entries.
    fn clear(&self);

    /// Number of stored entries, including expired ones not yet removed.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs one sweep pass now, returning how many entries were removed.
    fn purge_expired(&self) -> usize;
}
