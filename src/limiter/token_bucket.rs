//! Token Bucket Module
//!
//! Non-blocking admission control: a bucket holds up to `capacity` tokens,
//! refills continuously at `refill_rate` tokens per second, and each
//! admitted request debits tokens equal to the requested permits.
//!
//! The whole bucket state (tokens + refill timestamp) lives behind one
//! Mutex, so every acquisition is a single indivisible
//! refill-check-debit step. No fairness is provided; concurrent callers
//! race for tokens.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::{Error, Result};
use crate::time::Clock;

// == Bucket State ==
/// Mutable limiter state, updated on every acquisition attempt.
#[derive(Debug)]
struct BucketState {
    /// Tokens currently available, always within [0, capacity]
    available: f64,
    /// Clock reading of the last refill
    last_refill: Duration,
}

// == Token Bucket ==
/// Token-bucket rate limiter.
///
/// The bucket starts full, allowing an initial burst up to `capacity`.
pub struct TokenBucket {
    /// Injected monotonic time source
    clock: Arc<dyn Clock>,
    /// Maximum tokens the bucket can hold, immutable after construction
    capacity: u32,
    /// Refill rate in tokens per second, immutable after construction
    refill_rate: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    // == Constructor ==
    /// Creates a full bucket.
    ///
    /// # Errors
    /// Returns [`Error::ZeroCapacity`] when `capacity` is zero, and
    /// [`Error::InvalidRefillRate`] when `refill_rate` is negative, NaN or
    /// infinite.
    pub fn new(clock: Arc<dyn Clock>, capacity: u32, refill_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if !refill_rate.is_finite() || refill_rate < 0.0 {
            return Err(Error::InvalidRefillRate(refill_rate));
        }

        let state = BucketState {
            available: f64::from(capacity),
            last_refill: clock.now(),
        };
        Ok(Self {
            clock,
            capacity,
            refill_rate,
            state: Mutex::new(state),
        })
    }

    // == Try Acquire ==
    /// Attempts to acquire a single permit. Never blocks.
    pub fn try_acquire(&self) -> bool {
        self.acquire(1)
    }

    /// Attempts to acquire `permits` permits. Never blocks.
    ///
    /// Requests for more permits than the bucket can ever hold fail
    /// immediately without touching the bucket state.
    ///
    /// # Errors
    /// Returns [`Error::ZeroPermits`] when `permits` is zero; the bucket
    /// state is untouched.
    pub fn try_acquire_many(&self, permits: u32) -> Result<bool> {
        if permits == 0 {
            return Err(Error::ZeroPermits);
        }
        Ok(self.acquire(permits))
    }

    /// One indivisible refill-check-debit step.
    fn acquire(&self, permits: u32) -> bool {
        // Can never be satisfied; leave tokens and timestamp untouched
        if permits > self.capacity {
            return false;
        }

        let mut state = self.state.lock();
        // The clock must be read under the lock: a reading taken before
        // acquiring it can be stale by the time the lock is held, which
        // would rewind last_refill and credit an interval twice.
        let now = self.clock.now();

        // Refill for the elapsed interval, capped at capacity. The
        // timestamp advances whether or not the debit below succeeds, so
        // back-to-back calls with no elapsed time never refill twice.
        let elapsed = now.saturating_sub(state.last_refill);
        if !elapsed.is_zero() {
            state.available = (state.available + elapsed.as_secs_f64() * self.refill_rate)
                .min(f64::from(self.capacity));
        }
        state.last_refill = now;

        let requested = f64::from(permits);
        if state.available >= requested {
            state.available = (state.available - requested).max(0.0);
            true
        } else {
            trace!(permits, available = state.available, "acquisition denied");
            false
        }
    }
}
