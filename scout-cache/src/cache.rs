//! In-memory TTL cache for discovery lookups.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use scout_core::error::{Result, ScoutError};
use scout_core::time::Clock;

/// Cache entry with its absolute expiration timestamp.
#[derive(Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: Duration,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live applied to every entry, in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

impl CacheConfig {
    /// Returns the configured TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// In-memory cache mapping string keys to values with a fixed TTL.
///
/// Entries expire `ttl` after insertion, judged against the injected
/// [`Clock`]. Expired entries are removed lazily when a lookup finds
/// them, or eagerly by [`cleanup`](ExpiringCache::cleanup); an expired
/// value is never returned to a caller either way.
///
/// Lookups mutate the map (lazy eviction), so `get` takes `&mut self`.
/// For use across threads wrap the cache in
/// [`SharedExpiringCache`](crate::SharedExpiringCache).
pub struct ExpiringCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T> std::fmt::Debug for ExpiringCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<T> ExpiringCache<T> {
    /// Creates a cache holding entries for `ttl` after insertion.
    ///
    /// A zero `ttl` is accepted: every entry is already expired on the
    /// next read, which disables caching while keeping the same code
    /// path.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn with_config(clock: Arc<dyn Clock>, config: &CacheConfig) -> Self {
        Self::new(clock, config.ttl())
    }

    /// Returns the TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Inserts or overwrites the entry for `key`.
    ///
    /// The expiration timestamp is computed now; overwriting discards
    /// the previous value and its remaining TTL entirely.
    pub fn set(&mut self, key: impl Into<String>, value: T) {
        let expires_at = self.clock.now().saturating_add(self.ttl);
        self.entries.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Removes the entry for `key`, expired or not.
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sweeps the whole map and removes every expired entry.
    ///
    /// All entries are judged against one clock reading taken at sweep
    /// start. Intended to be called periodically by the owner: it is the
    /// only mechanism that reclaims keys which are written once and
    /// never read again.
    pub fn cleanup(&mut self) {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "swept expired cache entries");
        }
    }

    /// Returns the number of stored entries.
    ///
    /// Includes expired entries that no lookup or sweep has removed yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cache statistics, judged against a single clock reading.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired(now))
            .count();

        CacheStats {
            total_entries: self.entries.len(),
            expired_entries: expired,
            valid_entries: self.entries.len() - expired,
        }
    }
}

impl<T: Clone> ExpiringCache<T> {
    /// Looks up `key`, returning a cloned snapshot of the value.
    ///
    /// Returns `None` for an absent key. A present-but-expired entry is
    /// removed from the map as a side effect and reported as `None`.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let expired = self.entries.get(key)?.is_expired(now);

        if expired {
            // Take the opportunity to update internal state
            self.entries.remove(key);
            trace!(key, "evicted expired entry on lookup");
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Like [`get`](ExpiringCache::get), but an absent or expired key is
    /// an error carrying the key.
    pub fn must_get(&mut self, key: &str) -> Result<T> {
        self.get(key)
            .ok_or_else(|| ScoutError::KeyNotFound(key.to_owned()))
    }
}

/// Builder for [`ExpiringCache`].
///
/// Construction fails with [`ScoutError::InvalidArgument`] if no clock
/// was supplied; the TTL falls back to [`CacheConfig::default`] when
/// unset.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use scout_cache::CacheBuilder;
/// use scout_core::MonotonicClock;
///
/// let cache = CacheBuilder::new()
///     .clock(Arc::new(MonotonicClock::new()))
///     .ttl(Duration::from_secs(30))
///     .build::<String>()
///     .unwrap();
/// assert_eq!(cache.ttl(), Duration::from_secs(30));
/// ```
#[derive(Default)]
pub struct CacheBuilder {
    clock: Option<Arc<dyn Clock>>,
    ttl: Option<Duration>,
}

impl CacheBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock the cache reads expiration times from.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the per-entry TTL.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Takes the TTL from a [`CacheConfig`].
    pub fn config(mut self, config: &CacheConfig) -> Self {
        self.ttl = Some(config.ttl());
        self
    }

    /// Builds the cache.
    pub fn build<T>(self) -> Result<ExpiringCache<T>> {
        let clock = self
            .clock
            .ok_or_else(|| ScoutError::InvalidArgument("clock is required".into()))?;
        let ttl = self.ttl.unwrap_or_else(|| CacheConfig::default().ttl());
        Ok(ExpiringCache::new(clock, ttl))
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Entries currently stored, including expired-but-unswept ones
    pub total_entries: usize,
    /// Entries past their expiration time that no lookup or sweep has
    /// removed yet
    pub expired_entries: usize,
    /// Entries a lookup would still return
    pub valid_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::time::ManualClock;

    fn make_cache(ttl_secs: u64) -> (Arc<ManualClock>, ExpiringCache<u32>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ExpiringCache::new(clock.clone(), Duration::from_secs(ttl_secs));
        (clock, cache)
    }

    #[test]
    fn test_miss_then_hit() {
        let (_clock, mut cache) = make_cache(10);
        assert_eq!(cache.get("node-1"), None);

        cache.set("node-1", 42);
        assert_eq!(cache.get("node-1"), Some(42));
    }

    #[test]
    fn test_hit_before_expiry_miss_at_boundary() {
        let (clock, mut cache) = make_cache(10);
        cache.set("node-1", 42);

        clock.advance(Duration::from_secs(9));
        assert_eq!(cache.get("node-1"), Some(42));

        // Expiry boundary is inclusive: exactly ttl after insertion misses.
        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("node-1"), None);
    }

    #[test]
    fn test_expired_lookup_evicts_entry() {
        let (clock, mut cache) = make_cache(10);
        cache.set("node-1", 42);

        clock.advance(Duration::from_secs(10));
        assert_eq!(cache.get("node-1"), None);
        assert!(cache.is_empty());

        // Re-inserting behaves as a fresh insert, untouched by the old entry.
        cache.set("node-1", 43);
        clock.advance(Duration::from_secs(9));
        assert_eq!(cache.get("node-1"), Some(43));
    }

    #[test]
    fn test_overwrite_resets_expiration() {
        let (clock, mut cache) = make_cache(10);
        cache.set("node-1", 1);

        clock.advance(Duration::from_secs(5));
        cache.set("node-1", 2);

        // t = 14: past the first entry's expiry, inside the second's.
        clock.advance(Duration::from_secs(9));
        assert_eq!(cache.get("node-1"), Some(2));
    }

    #[test]
    fn test_cleanup_removes_only_expired() {
        let (clock, mut cache) = make_cache(10);
        cache.set("a", 1);
        clock.advance(Duration::from_secs(4));
        cache.set("b", 2);
        clock.advance(Duration::from_secs(4));
        cache.set("c", 3);

        // t = 12: only "a" (expires at 10) is past its expiry.
        clock.advance(Duration::from_secs(4));
        cache.cleanup();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (clock, mut cache) = make_cache(10);
        cache.set("a", 1);
        cache.set("b", 2);

        clock.advance(Duration::from_secs(10));
        cache.cleanup();
        assert!(cache.is_empty());

        cache.cleanup();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cleanup_reclaims_write_only_keys() {
        let (clock, mut cache) = make_cache(10);
        for i in 0..100 {
            cache.set(format!("node-{i}"), i);
        }

        clock.advance(Duration::from_secs(11));
        cache.cleanup();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_must_get_matches_get() {
        let (clock, mut cache) = make_cache(10);
        cache.set("node-1", 42);

        assert_eq!(cache.must_get("node-1").unwrap(), 42);

        clock.advance(Duration::from_secs(10));
        let err = cache.must_get("node-1").unwrap_err();
        assert!(matches!(&err, ScoutError::KeyNotFound(key) if key == "node-1"));
        assert!(err.is_not_found());

        let err = cache.must_get("never-set").unwrap_err();
        assert!(matches!(&err, ScoutError::KeyNotFound(key) if key == "never-set"));
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let (_clock, mut cache) = make_cache(0);
        cache.set("node-1", 42);
        assert_eq!(cache.get("node-1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_discovery_timeline() {
        let (clock, mut cache) = make_cache(10);

        cache.set("a", 1);

        clock.set(Duration::from_secs(5));
        assert_eq!(cache.get("a"), Some(1));

        clock.set(Duration::from_secs(10));
        assert_eq!(cache.get("a"), None);

        clock.set(Duration::from_secs(12));
        cache.set("a", 2);

        clock.set(Duration::from_secs(20));
        assert_eq!(cache.get("a"), Some(2));

        clock.set(Duration::from_secs(25));
        cache.cleanup();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let (_clock, mut cache) = make_cache(10);
        cache.set("a", 1);
        cache.set("b", 2);

        cache.remove("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats() {
        let (clock, mut cache) = make_cache(10);
        cache.set("a", 1);
        clock.advance(Duration::from_secs(5));
        cache.set("b", 2);

        // t = 12: "a" expired but unswept, "b" still valid.
        clock.advance(Duration::from_secs(7));
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.valid_entries, 1);
    }

    #[test]
    fn test_builder_requires_clock() {
        let err = CacheBuilder::new().build::<u32>().unwrap_err();
        assert!(matches!(err, ScoutError::InvalidArgument(_)));
    }

    #[test]
    fn test_builder_defaults_ttl_from_config() {
        let clock = Arc::new(ManualClock::new());
        let cache = CacheBuilder::new().clock(clock).build::<u32>().unwrap();
        assert_eq!(cache.ttl(), CacheConfig::default().ttl());
    }

    #[test]
    fn test_config_from_json() {
        let config: CacheConfig = serde_json::from_str(r#"{"ttl_seconds":30}"#).unwrap();
        assert_eq!(config.ttl(), Duration::from_secs(30));

        let clock = Arc::new(ManualClock::new());
        let cache: ExpiringCache<u32> = ExpiringCache::with_config(clock, &config);
        assert_eq!(cache.ttl(), Duration::from_secs(30));
    }
}
