//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration.
//!
//! All methods take `&self`: the engine is internally synchronized and safe
//! to share across threads. The entry map sits behind one RwLock, the LRU
//! tracker behind its own Mutex (always taken after the map lock), and the
//! counters are lock-free atomics. Expiry is lazy: entries are only
//! reclaimed when a lookup, a length scan, or a capacity pass observes
//! them; there is no background sweeper.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheEntry, CacheMetrics, LruTracker, MetricsSnapshot};
use crate::error::{Error, Result};
use crate::time::Clock;

// == TTL Cache ==
/// Time-aware key/value cache with LRU eviction and hit/miss metrics.
pub struct TtlCache<K, V> {
    /// Key-value storage
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    /// LRU access tracker, guarded separately from the entry map
    lru: Mutex<LruTracker<K>>,
    /// Performance counters
    metrics: CacheMetrics,
    /// Maximum number of entries allowed, None = unbounded
    max_entries: Option<usize>,
    /// Injected monotonic time source
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructors ==
    /// Creates an unbounded cache. Capacity eviction is disabled; entries
    /// only leave via removal or TTL expiry.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            lru: Mutex::new(LruTracker::new()),
            metrics: CacheMetrics::new(),
            max_entries: None,
            clock,
        }
    }

    /// Creates a cache bounded to `max_entries` live entries.
    ///
    /// Once a put pushes the cache past the bound, least recently used
    /// entries are evicted before the put returns.
    ///
    /// # Errors
    /// Returns [`Error::ZeroMaxEntries`] when `max_entries` is zero.
    pub fn with_max_entries(clock: Arc<dyn Clock>, max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(Error::ZeroMaxEntries);
        }
        Ok(Self {
            max_entries: Some(max_entries),
            ..Self::new(clock)
        })
    }

    // == Put ==
    /// Stores an eternal entry (no TTL).
    ///
    /// Replaces any prior value under the key and clears any prior TTL.
    /// The key becomes the most recently used; the capacity eviction pass
    /// runs before the call returns.
    pub fn put(&self, key: K, value: V) {
        self.store(key, CacheEntry::eternal(value));
    }

    /// Stores an entry that expires once `ttl` has elapsed.
    ///
    /// The deadline is computed from the clock at call time. Overwriting an
    /// existing key resets both its TTL and its recency.
    ///
    /// # Errors
    /// Returns [`Error::ZeroTtl`] when `ttl` is zero; nothing is stored.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(Error::ZeroTtl);
        }
        let deadline = self.clock.now() + ttl;
        self.store(key, CacheEntry::expiring(value, deadline));
        Ok(())
    }

    /// Inserts the entry, bumps recency, then enforces the capacity bound.
    fn store(&self, key: K, entry: CacheEntry<V>) {
        let mut entries = self.entries.write();
        let mut lru = self.lru.lock();

        entries.insert(key.clone(), entry);
        lru.record_access(&key);

        let Some(max) = self.max_entries else {
            return;
        };

        // Expiry takes precedence in attribution: an already-expired LRU
        // candidate counts as a TTL eviction, not a capacity one.
        let now = self.clock.now();
        let mut by_ttl = 0u64;
        let mut by_capacity = 0u64;
        while entries.len() > max {
            let Some(victim) = lru.evict_eldest() else {
                break;
            };
            match entries.remove(&victim) {
                Some(old) if old.is_expired(now) => {
                    self.metrics.record_ttl_eviction();
                    by_ttl += 1;
                }
                Some(_) => {
                    self.metrics.record_capacity_eviction();
                    by_capacity += 1;
                }
                // Key already gone from the map, nothing to count
                None => {}
            }
        }

        if by_ttl + by_capacity > 0 {
            debug!(by_ttl, by_capacity, "eviction pass removed entries");
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A present, unexpired entry counts a hit and becomes the most
    /// recently used. An absent key counts a miss. An expired entry is
    /// removed, counts both a miss and a TTL eviction, and is reported as
    /// absent; a stale lookup is indistinguishable from a true miss except
    /// via metrics. Exactly one of hits/misses increments per call.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        match entries.get(key) {
            None => {
                self.metrics.record_miss();
                None
            }
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                self.lru.lock().remove_key(key);
                self.metrics.record_miss();
                self.metrics.record_ttl_eviction();
                debug!("expired entry reclaimed on lookup");
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.metrics.record_hit();
                self.lru.lock().record_access(key);
                Some(value)
            }
        }
    }

    // == Remove ==
    /// Removes an entry and its recency record.
    ///
    /// Returns whether a removal occurred. Never touches the eviction
    /// counters, expired or not.
    pub fn remove(&self, key: &K) -> bool {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.lru.lock().remove_key(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Empties the store. Metrics counters are not reset.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.lru.lock().clear();
    }

    // == Length ==
    /// Returns the count of currently live (non-expired) entries.
    ///
    /// Full O(n) scan with lazy cleanup: every expired entry found is
    /// removed and counted as a TTL eviction exactly once. A read-style
    /// call that mutates is a deliberate simplicity tradeoff here.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let mut lru = self.lru.lock();

        let before = entries.len();
        entries.retain(|key, entry| {
            if entry.is_expired(now) {
                lru.remove_key(key);
                self.metrics.record_ttl_eviction();
                false
            } else {
                true
            }
        });

        let reclaimed = before - entries.len();
        if reclaimed > 0 {
            debug!(reclaimed, "length scan reclaimed expired entries");
        }
        entries.len()
    }

    // == Is Empty ==
    /// Returns true if no live entries remain. Shares the lazy-cleanup
    /// scan semantics of [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Metrics Snapshot ==
    /// Returns an immutable copy of the four counters at call time.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
