//! # Scout Core
//!
//! Foundation crate for the scout TTL cache: error types and the
//! monotonic [`Clock`] abstraction the cache depends on.
//!
//! The clock is a capability, not a global: production code hands the
//! cache a [`MonotonicClock`], tests hand it a [`ManualClock`] and drive
//! time explicitly.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use scout_core::{Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! clock.advance(Duration::from_secs(3));
//! assert_eq!(clock.now(), Duration::from_secs(3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod error;
pub mod time;

// Re-export commonly used items at crate root
pub use error::{Result, ScoutError};
pub use time::{Clock, ManualClock, MonotonicClock};
