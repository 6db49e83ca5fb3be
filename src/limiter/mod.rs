//! Rate Limiter Module
//!
//! Provides non-blocking request admission via a token bucket. Independent
//! of the cache; shares only the clock abstraction.

mod token_bucket;

// Re-export public types
pub use token_bucket::TokenBucket;
