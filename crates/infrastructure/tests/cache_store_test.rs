mod helpers;

use dnscache_application::ports::CacheStore;
use dnscache_domain::ttl::{NO_EXPIRY, SECONDS_PER_WEEK};
use dnscache_infrastructure::dns::cache::{DnsCache, EvictionStrategy, ManualClock};
use helpers::builders::{a_entry, key, negative_entry};
use hickory_proto::rr::RecordType;
use std::net::Ipv4Addr;
use std::sync::{Arc, Barrier};
use std::thread;

const T0: u64 = 1_700_000_000;

fn ip(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 0, 2, last)
}

#[test]
fn test_min_ttl_floor_keeps_short_answers_for_five_minutes() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::min_expiration(300, Arc::new(clock.clone()));
    let short = key("short.example", RecordType::A);

    cache.put(short.clone(), a_entry("short.example", ip(1), T0 + 10));
    assert_eq!(cache.get(&short).unwrap().expiration(), T0 + 300);

    clock.advance(10);
    assert!(cache.get(&short).is_some());

    clock.advance(289);
    assert!(cache.get(&short).is_some());

    clock.advance(2);
    assert!(cache.get(&short).is_none());
}

#[test]
fn test_min_ttl_floor_never_shortens() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::min_expiration(300, Arc::new(clock));
    let long = key("long.example", RecordType::A);

    cache.put(long.clone(), a_entry("long.example", ip(2), T0 + 3600));
    assert_eq!(cache.get(&long).unwrap().expiration(), T0 + 3600);
}

#[test]
fn test_no_expiry_store_holds_entries_for_a_week() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::no_expiration(Arc::new(clock.clone()));
    let k = key("pinned.example", RecordType::A);

    cache.put(k.clone(), negative_entry(T0 + 10));
    assert_eq!(NO_EXPIRY, SECONDS_PER_WEEK);

    clock.set(T0 + SECONDS_PER_WEEK - 1);
    assert!(cache.get(&k).is_some());

    clock.set(T0 + SECONDS_PER_WEEK);
    assert!(cache.get(&k).is_none());
    assert_eq!(cache.cleaning_interval(), None);
}

#[test]
fn test_plain_store_keeps_expired_until_swept() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::new(Arc::new(clock.clone()));
    let k = key("stale.example", RecordType::A);

    cache.put(k.clone(), a_entry("stale.example", ip(3), T0 + 10));
    clock.advance(20);

    assert!(cache.get(&k).is_none());
    assert!(!cache.contains(&k));
    assert_eq!(cache.len(), 1);

    assert_eq!(cache.sweep_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_lazy_sweep_runs_on_insert_after_interval() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock.clone()))
        .cleaning_interval(Some(60))
        .build();

    cache.put(key("old.example", RecordType::A), negative_entry(T0 + 10));
    clock.advance(30);
    cache.put(key("mid.example", RecordType::A), negative_entry(T0 + 40));
    assert_eq!(cache.len(), 2);

    clock.advance(30);
    cache.put(key("new.example", RecordType::A), negative_entry(T0 + 600));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.next_cleaning(), Some(T0 + 120));
    assert_eq!(cache.metrics().swept_entries.load(std::sync::atomic::Ordering::Relaxed), 2);
}

#[test]
fn test_lru_evicts_least_recently_used() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock))
        .max_size(Some(2))
        .build();
    assert!(matches!(cache.eviction_strategy(), EvictionStrategy::LRU { .. }));

    let a = key("a.example", RecordType::A);
    let b = key("b.example", RecordType::A);
    let c = key("c.example", RecordType::A);

    cache.put(a.clone(), a_entry("a.example", ip(1), T0 + 600));
    cache.put(b.clone(), a_entry("b.example", ip(2), T0 + 600));
    assert!(cache.get(&a).is_some());
    cache.put(c.clone(), a_entry("c.example", ip(3), T0 + 600));

    assert!(cache.contains(&a));
    assert!(!cache.contains(&b));
    assert!(cache.contains(&c));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_lru_replacing_a_key_is_not_an_eviction() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock))
        .max_size(Some(1))
        .build();
    let a = key("a.example", RecordType::A);

    cache.put(a.clone(), a_entry("a.example", ip(1), T0 + 600));
    cache.put(a.clone(), a_entry("a.example", ip(9), T0 + 900));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(cache.get(&a).unwrap().expiration(), T0 + 900);
}

#[test]
fn test_lru_purges_expired_entry_on_get() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock.clone()))
        .max_size(Some(4))
        .cleaning_interval(None)
        .build();
    let k = key("gone.example", RecordType::A);

    cache.put(k.clone(), negative_entry(T0 + 10));
    clock.advance(10);

    assert!(cache.get(&k).is_none());
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_lru_get_runs_due_sweep() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock.clone()))
        .max_size(Some(8))
        .cleaning_interval(Some(60))
        .build();
    let live = key("live.example", RecordType::A);

    cache.put(key("old.example", RecordType::A), negative_entry(T0 + 10));
    cache.put(key("mid.example", RecordType::A), negative_entry(T0 + 20));
    cache.put(live.clone(), negative_entry(T0 + 600));

    clock.advance(60);
    assert!(cache.get(&live).is_some());

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.next_cleaning(), Some(T0 + 120));
}

#[test]
fn test_concurrent_puts_respect_capacity() {
    const THREADS: usize = 8;

    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock))
        .max_size(Some(1))
        .build();
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for i in 0..THREADS {
            let cache = &cache;
            let barrier = &barrier;
            s.spawn(move || {
                let owner = format!("host{}.example", i);
                barrier.wait();
                cache.put(key(&owner, RecordType::A), negative_entry(T0 + 600));
                assert!(cache.len() <= 1);
            });
        }
    });

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().evictions, (THREADS - 1) as u64);
}

#[test]
fn test_concurrent_readers_and_writers() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::builder()
        .shared_clock(Arc::new(clock))
        .max_size(Some(16))
        .build();
    let hot = key("hot.example", RecordType::A);
    cache.put(hot.clone(), a_entry("hot.example", ip(7), T0 + 600));

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    assert!(cache.get(&hot).is_some());
                }
            });
        }
        s.spawn(|| {
            for i in 0..100 {
                let owner = format!("cold{}.example", i % 8);
                cache.put(key(&owner, RecordType::A), negative_entry(T0 + 600));
            }
        });
    });

    assert!(cache.len() <= 16);
    assert_eq!(cache.stats().hits, 400);
}

#[test]
fn test_flush_one_and_all() {
    let clock = ManualClock::new(T0);
    let cache = DnsCache::new(Arc::new(clock));
    let a = key("a.example", RecordType::A);
    let aaaa = key("a.example", RecordType::AAAA);

    cache.put(a.clone(), negative_entry(T0 + 600));
    cache.put(aaaa.clone(), negative_entry(T0 + 600));

    cache.flush(Some(&a));
    assert!(!cache.contains(&a));
    assert!(cache.contains(&aaaa));

    cache.flush(None);
    assert!(cache.is_empty());
}
