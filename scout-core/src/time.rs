//! Monotonic clock abstraction.
//!
//! The cache never reads wall-clock time. It depends on a [`Clock`]
//! capability that yields monotonically non-decreasing readings suitable
//! for interval arithmetic, so expiration can be tested deterministically
//! by swapping in a manually driven clock.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A monotonic time source.
///
/// Implementations must never go backwards between consecutive `now`
/// calls, and must be safe to read from multiple threads.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic reading.
    ///
    /// The absolute origin is implementation-defined; only differences
    /// between readings are meaningful.
    fn now(&self) -> Duration;
}

/// Production clock backed by [`Instant`].
///
/// Readings are elapsed time since the clock was constructed.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Time only moves when [`advance`](ManualClock::advance) or
/// [`set`](ManualClock::set) is called.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock starting at the given reading.
    pub fn starting_at(now: Duration) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(delta);
    }

    /// Jumps the clock to an absolute reading.
    ///
    /// Panics if `to` is earlier than the current reading; a monotonic
    /// clock never runs backwards.
    pub fn set(&self, to: Duration) {
        let mut now = self.now.lock();
        assert!(to >= *now, "manual clock cannot move backwards");
        *now = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}
