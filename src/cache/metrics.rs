//! Cache Metrics Module
//!
//! Tracks cache performance counters: hits, misses, and evictions split by
//! cause (TTL expiry vs capacity pressure).
//!
//! Counters are independently incrementable atomics so the hot paths never
//! contend on a lock. Readers only ever see immutable snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Metrics ==
/// Live counter set owned by the cache engine.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    evicted_by_ttl: AtomicU64,
    evicted_by_capacity: AtomicU64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new counter set with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record TTL Eviction ==
    /// Increments the TTL eviction counter.
    pub fn record_ttl_eviction(&self) {
        self.evicted_by_ttl.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Capacity Eviction ==
    /// Increments the capacity eviction counter.
    pub fn record_capacity_eviction(&self) {
        self.evicted_by_capacity.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns an immutable point-in-time copy of all four counters.
    ///
    /// The snapshot never reflects later updates; request a new one to
    /// observe fresh values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evicted_by_ttl: self.evicted_by_ttl.load(Ordering::Relaxed),
            evicted_by_capacity: self.evicted_by_capacity.load(Ordering::Relaxed),
        }
    }
}

// == Metrics Snapshot ==
/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries removed because their TTL elapsed
    pub evicted_by_ttl: u64,
    /// Number of entries removed by the LRU capacity policy
    pub evicted_by_capacity: u64,
}

impl MetricsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
