//! Mutex-guarded handle for sharing a cache across threads.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use scout_core::error::Result;
use scout_core::time::Clock;

use crate::cache::{CacheStats, ExpiringCache};

/// Cheaply cloneable, thread-safe handle around an [`ExpiringCache`].
///
/// One mutex guards every operation. Lookups evict expired entries, so
/// `get` is a write like everything else; a reader-writer lock with
/// `get` on the shared path would be unsound here.
pub struct SharedExpiringCache<T> {
    inner: Arc<Mutex<ExpiringCache<T>>>,
}

impl<T> Clone for SharedExpiringCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedExpiringCache<T> {
    /// Creates a shared cache holding entries for `ttl` after insertion.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self::from_cache(ExpiringCache::new(clock, ttl))
    }

    /// Wraps an already-built cache.
    pub fn from_cache(cache: ExpiringCache<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Inserts or overwrites the entry for `key`.
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.inner.lock().set(key, value);
    }

    /// Removes the entry for `key`, expired or not.
    pub fn remove(&self, key: &str) {
        self.inner.lock().remove(key);
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Sweeps the cache, removing every expired entry.
    pub fn cleanup(&self) {
        self.inner.lock().cleanup();
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}

impl<T: Clone> SharedExpiringCache<T> {
    /// Looks up `key`, returning a cloned snapshot of the value.
    pub fn get(&self, key: &str) -> Option<T> {
        self.inner.lock().get(key)
    }

    /// Like [`get`](SharedExpiringCache::get), but an absent or expired
    /// key is an error carrying the key.
    pub fn must_get(&self, key: &str) -> Result<T> {
        self.inner.lock().must_get(key)
    }
}
