//! TTL cache for scout discovery lookups.
//!
//! Generic in-memory cache with a fixed per-entry TTL, lazy eviction on
//! lookup, and an explicit cleanup sweep. Time comes from an injected
//! [`scout_core::Clock`], so expiration is deterministic under test.

mod cache;
mod shared;

pub use cache::{CacheBuilder, CacheConfig, CacheStats, ExpiringCache};
pub use shared::SharedExpiringCache;
