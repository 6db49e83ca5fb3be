//! Clock Abstraction Module
//!
//! Both the cache and the rate limiter measure elapsed durations against a
//! monotonic clock injected at construction. Wall-clock time is never used
//! for expiry or refill decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// == Clock Trait ==
/// A monotonic time source.
///
/// Readings are durations since an arbitrary per-clock origin and are
/// strictly non-decreasing between successive calls. Suitable only for
/// measuring elapsed time (TTL expiry, token refill), never calendar time.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic reading.
    fn now(&self) -> Duration;
}

// == System Clock ==
/// Production [`Clock`] backed by [`std::time::Instant`].
///
/// The origin is captured when the clock is created; readings are the
/// elapsed time since then.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a new system clock with its origin at "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

// == Manual Clock ==
/// Deterministic [`Clock`] for tests.
///
/// Starts at zero and only moves when explicitly advanced, so expiry and
/// refill behavior can be exercised without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed_nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a new manual clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by the given duration.
    ///
    /// # Panics
    /// Panics if `delta` does not fit the clock's nanosecond range; a
    /// silent wrap would move the clock backwards.
    pub fn advance(&self, delta: Duration) {
        let nanos = u64::try_from(delta.as_nanos()).expect("advance exceeds the clock range");
        self.elapsed_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_millis(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Advances the clock by the given number of seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}
