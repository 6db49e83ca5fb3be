//! Error types for the cache and rate limiter
//!
//! Provides unified error handling using thiserror.
//!
//! Every error is raised synchronously, before any state mutation, and is
//! local to the failing call. Nothing here is fatal to the host process.

use thiserror::Error;

// == Error Enum ==
/// Unified error type for cache and rate limiter construction and calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// TTL passed to a cache put must be a positive duration
    #[error("ttl must be a positive duration")]
    ZeroTtl,

    /// Cache capacity bound must allow at least one entry
    #[error("max_entries must be greater than zero")]
    ZeroMaxEntries,

    /// Token bucket capacity must allow at least one token
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    /// Refill rate must be a finite, non-negative number of permits/second
    #[error("refill rate must be finite and non-negative, got {0}")]
    InvalidRefillRate(f64),

    /// An acquisition must request at least one permit
    #[error("permits must be greater than zero")]
    ZeroPermits,
}

// == Result Type Alias ==
/// Convenience Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
