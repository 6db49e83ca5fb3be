//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//!
//! Entries are owned exclusively by the cache engine's map. They are
//! created on every put, replaced wholesale on overwrite, and destroyed on
//! remove, lazy-detected expiry, or capacity eviction.

use std::time::Duration;

// == Cache Entry ==
/// A stored value together with its absolute expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiry deadline on the injected clock, None = never expires
    pub expires_at: Option<Duration>,
}

impl<V> CacheEntry<V> {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn eternal(value: V) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates an entry that expires once the clock reaches `deadline`.
    pub fn expiring(value: V, deadline: Duration) -> Self {
        Self {
            value,
            expires_at: Some(deadline),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at the given clock reading.
    ///
    /// Boundary condition: an entry is expired when `now >= expires_at`,
    /// so an entry queried exactly at its deadline is already gone.
    /// Eternal entries never expire.
    pub fn is_expired(&self, now: Duration) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eternal_entry_never_expires() {
        let entry = CacheEntry::eternal("value");

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(Duration::ZERO));
        assert!(!entry.is_expired(Duration::from_secs(u64::MAX / 2)));
    }

    #[test]
    fn test_expiring_entry_before_deadline() {
        let entry = CacheEntry::expiring(42, Duration::from_millis(100));

        assert!(!entry.is_expired(Duration::ZERO));
        assert!(!entry.is_expired(Duration::from_millis(99)));
    }

    #[test]
    fn test_expiring_entry_at_and_after_deadline() {
        let entry = CacheEntry::expiring(42, Duration::from_millis(100));

        // Expired exactly at the boundary
        assert!(entry.is_expired(Duration::from_millis(100)));
        assert!(entry.is_expired(Duration::from_millis(101)));
    }

    #[test]
    fn test_entry_holds_value() {
        let entry = CacheEntry::expiring("payload".to_string(), Duration::from_secs(1));
        assert_eq!(entry.value, "payload");
    }
}
