//! Integration Tests for the Cache and Rate Limiter
//!
//! End-to-end scenarios against the public API, including cross-thread
//! usage of both primitives sharing one clock.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use limitra::{Clock, ManualClock, MetricsSnapshot, SystemClock, TokenBucket, TtlCache};

// == Helper Functions ==

fn manual_cache(max_entries: usize) -> (Arc<ManualClock>, TtlCache<String, String>) {
    let clock = Arc::new(ManualClock::new());
    let cache = TtlCache::with_max_entries(clock.clone() as Arc<dyn Clock>, max_entries).unwrap();
    (clock, cache)
}

// == Capacity Eviction Scenarios ==

#[test]
fn test_capacity_two_put_three_evicts_lru() {
    let (_, cache) = manual_cache(2);

    cache.put("a".to_string(), "1".to_string());
    cache.put("b".to_string(), "2".to_string());
    cache.put("c".to_string(), "3".to_string());

    assert_eq!(cache.get(&"a".to_string()), None);
    assert_eq!(cache.get(&"b".to_string()), Some("2".to_string()));
    assert_eq!(cache.get(&"c".to_string()), Some("3".to_string()));
    assert_eq!(cache.metrics_snapshot().evicted_by_capacity, 1);
}

#[test]
fn test_recency_bump_protects_key_from_eviction() {
    let (_, cache) = manual_cache(2);

    cache.put("a".to_string(), "1".to_string());
    cache.put("evicted_candidate".to_string(), "2".to_string());

    // Bump "a" so the candidate becomes the eldest
    assert!(cache.get(&"a".to_string()).is_some());
    cache.put("c".to_string(), "3".to_string());

    assert_eq!(cache.get(&"evicted_candidate".to_string()), None);
    assert_eq!(cache.get(&"a".to_string()), Some("1".to_string()));
    assert_eq!(cache.get(&"c".to_string()), Some("3".to_string()));
}

// == TTL Scenarios ==

#[test]
fn test_ttl_entry_expires_after_deadline() {
    let clock = Arc::new(ManualClock::new());
    let cache: TtlCache<String, String> = TtlCache::new(clock.clone() as Arc<dyn Clock>);

    cache
        .put_with_ttl("k".to_string(), "v".to_string(), Duration::from_millis(100))
        .unwrap();
    clock.advance_millis(101);

    assert_eq!(cache.get(&"k".to_string()), None);

    let snapshot = cache.metrics_snapshot();
    assert_eq!(snapshot.evicted_by_ttl, 1);
    assert_eq!(snapshot.misses, 1);
}

#[test]
fn test_ttl_eviction_counted_once_across_len_and_get() {
    let clock = Arc::new(ManualClock::new());
    let cache: TtlCache<String, String> = TtlCache::new(clock.clone() as Arc<dyn Clock>);

    cache
        .put_with_ttl("k".to_string(), "v".to_string(), Duration::from_millis(100))
        .unwrap();
    clock.advance_millis(101);

    assert_eq!(cache.len(), 0);
    assert_eq!(cache.get(&"k".to_string()), None);

    let snapshot = cache.metrics_snapshot();
    assert_eq!(snapshot.evicted_by_ttl, 1);
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.hits, 0);
}

// == Metrics Scenarios ==

#[test]
fn test_snapshot_is_point_in_time() {
    let (_, cache) = manual_cache(10);

    let before = cache.metrics_snapshot();
    assert_eq!(before, MetricsSnapshot::default());

    cache.put("k".to_string(), "v".to_string());
    cache.get(&"k".to_string());

    let after = cache.metrics_snapshot();
    assert_eq!(before.hits, 0);
    assert_eq!(after.hits, 1);
}

// == Rate Limiter Scenarios ==

#[test]
fn test_burst_then_steady_refill() {
    let clock = Arc::new(ManualClock::new());
    let limiter = TokenBucket::new(clock.clone() as Arc<dyn Clock>, 5, 2.0).unwrap();

    for _ in 0..5 {
        assert!(limiter.try_acquire());
    }
    assert!(!limiter.try_acquire());

    // 500ms at 2 tokens/s buys exactly one more admission
    clock.advance_millis(500);
    assert!(limiter.try_acquire());
    assert!(!limiter.try_acquire());
}

#[test]
fn test_limiter_gates_cache_writes() {
    let clock = Arc::new(ManualClock::new());
    let cache: TtlCache<String, u32> =
        TtlCache::with_max_entries(clock.clone() as Arc<dyn Clock>, 100).unwrap();
    let limiter = TokenBucket::new(clock.clone() as Arc<dyn Clock>, 5, 0.0).unwrap();

    let mut admitted = 0;
    for i in 0..20u32 {
        if limiter.try_acquire() {
            cache.put(format!("req{i}"), i);
            admitted += 1;
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(cache.len(), 5);
}

// == Thread Safety ==

#[test]
fn test_concurrent_puts_respect_capacity_bound() {
    let clock = Arc::new(SystemClock::new());
    let cache = Arc::new(
        TtlCache::<String, u64>::with_max_entries(clock as Arc<dyn Clock>, 16).unwrap(),
    );

    let mut handles = Vec::new();
    for t in 0..8u64 {
        let cache = cache.clone();
        handles.push(thread::spawn(move || {
            for i in 0..100u64 {
                cache.put(format!("t{t}-k{i}"), i);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 16);
    let snapshot = cache.metrics_snapshot();
    assert_eq!(snapshot.evicted_by_capacity + cache.len() as u64, 800);
}

#[test]
fn test_concurrent_gets_count_every_lookup() {
    let clock = Arc::new(SystemClock::new());
    let cache = Arc::new(TtlCache::<String, u64>::new(clock as Arc<dyn Clock>));
    for i in 0..50u64 {
        cache.put(format!("k{i}"), i);
    }

    let mut handles = Vec::new();
    for t in 0..8u64 {
        let cache = cache.clone();
        handles.push(thread::spawn(move || {
            for i in 0..100u64 {
                // Half the lookups hit, half miss
                let _ = cache.get(&format!("k{}", (t * 100 + i) % 100));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = cache.metrics_snapshot();
    assert_eq!(snapshot.hits + snapshot.misses, 800);
    assert_eq!(snapshot.hits, 400);
    assert_eq!(snapshot.misses, 400);
}

#[test]
fn test_acquires_racing_clock_advances_stay_within_budget() {
    // Acquiring threads race a thread advancing the clock; every elapsed
    // interval may be credited at most once, so the grand total granted
    // can never exceed the initial burst plus the whole advance.
    let clock = Arc::new(ManualClock::new());
    let capacity = 10u32;
    let rate = 1000.0;
    let limiter =
        Arc::new(TokenBucket::new(clock.clone() as Arc<dyn Clock>, capacity, rate).unwrap());

    let advance_steps = 500u64;
    let advancer = {
        let clock = clock.clone();
        thread::spawn(move || {
            for _ in 0..advance_steps {
                clock.advance_millis(1);
            }
        })
    };

    let mut handles = Vec::new();
    for _ in 0..4 {
        let limiter = limiter.clone();
        handles.push(thread::spawn(move || {
            let mut granted = 0u64;
            for _ in 0..500 {
                if limiter.try_acquire() {
                    granted += 1;
                }
            }
            granted
        }));
    }

    advancer.join().unwrap();
    let granted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let budget = f64::from(capacity) + (advance_steps as f64 / 1000.0) * rate;
    assert!(
        granted as f64 <= budget + 1e-6,
        "granted {granted} permits but the budget was only {budget}"
    );
}

#[test]
fn test_concurrent_acquires_never_overspend() {
    let clock = Arc::new(SystemClock::new());
    // Zero refill rate: exactly the initial burst is spendable
    let limiter = Arc::new(TokenBucket::new(clock as Arc<dyn Clock>, 1000, 0.0).unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let limiter = limiter.clone();
        handles.push(thread::spawn(move || {
            let mut granted = 0u64;
            for _ in 0..200 {
                if limiter.try_acquire() {
                    granted += 1;
                }
            }
            granted
        }));
    }

    let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 1000);
}
