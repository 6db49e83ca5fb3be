//! Limitra - in-process caching and throttling primitives
//!
//! Provides a time-aware key/value cache with TTL expiration and LRU
//! eviction, plus an independent token-bucket rate limiter. Both
//! primitives are embedded directly in the host process and share a
//! single injectable monotonic [`Clock`](time::Clock) abstraction, which
//! makes their time-dependent behavior fully deterministic under test.

pub mod cache;
pub mod error;
pub mod limiter;
pub mod time;

pub use cache::{MetricsSnapshot, TtlCache};
pub use error::{Error, Result};
pub use limiter::TokenBucket;
pub use time::{Clock, ManualClock, SystemClock};
