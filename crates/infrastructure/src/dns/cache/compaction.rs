use super::storage::{CacheState, DnsCache};
use std::sync::atomic::Ordering as AtomicOrdering;
use tracing::debug;

/// Lazy expiry sweep for DnsCache
impl DnsCache {
    /// Run the sweep if `next_cleaning` has passed. Caller holds the lock.
    pub(super) fn maybe_clean(&self, state: &mut CacheState, now: u64) {
        let Some(interval) = self.cleaning_interval else {
            return;
        };
        if now < state.next_cleaning {
            return;
        }

        self.sweep_locked(state, now);
        state.next_cleaning = now.saturating_add(interval);
    }

    fn sweep_locked(&self, state: &mut CacheState, now: u64) -> usize {
        let removed = state
            .backend
            .remove_where(&|entry| entry.is_expired(now));

        self.metrics.sweeps.fetch_add(1, AtomicOrdering::Relaxed);
        if removed > 0 {
            self.metrics
                .swept_entries
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);

            debug!(
                removed,
                cache_size = state.backend.len(),
                "Cache sweep completed"
            );
        }

        removed
    }

    /// Remove every expired entry now, regardless of schedule.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.now();
        let mut state = self.lock();
        self.sweep_locked(&mut state, now)
    }

    /// Instant of the next lazy sweep, `None` when sweeping is disabled.
    pub fn next_cleaning(&self) -> Option<u64> {
        self.cleaning_interval.map(|_| self.lock().next_cleaning)
    }

    pub fn reschedule_cleaning(&self, at: u64) {
        self.lock().next_cleaning = at;
    }
}

#[cfg(test)]
mod tests {
    use crate::dns::cache::{DnsCache, ManualClock, NoExpiration};
    use dnscache_application::ports::CacheStore;
    use dnscache_domain::{CacheEntry, CacheKey, DnsFailure, NegativeAnswer};
    use hickory_proto::rr::{DNSClass, Name, RecordType};
    use std::str::FromStr;

    fn key(name: &str) -> CacheKey {
        CacheKey::new(&Name::from_str(name).unwrap(), RecordType::A, DNSClass::IN)
    }

    fn entry(expiration: u64) -> CacheEntry {
        NegativeAnswer::new(DnsFailure::SyntaxError("x".into()), expiration).into()
    }

    #[test]
    fn test_sweep_runs_on_put_after_interval() {
        let clock = ManualClock::new(1_000);
        let cache = DnsCache::builder()
            .clock(clock.clone())
            .cleaning_interval(Some(60))
            .build();
        assert_eq!(cache.next_cleaning(), Some(1_060));

        cache.put(key("short."), entry(1_010));
        cache.put(key("long."), entry(5_000));

        clock.set(1_030);
        cache.put(key("other."), entry(5_000));
        assert_eq!(cache.len(), 3, "sweep not due yet");

        clock.set(1_061);
        cache.put(key("again."), entry(5_000));
        assert_eq!(cache.len(), 3, "expired entry swept");
        assert!(!cache.contains(&key("short.")));
        assert_eq!(cache.next_cleaning(), Some(1_121));
        assert_eq!(cache.stats().sweeps, 1);
    }

    #[test]
    fn test_flush_of_other_key_triggers_sweep() {
        let clock = ManualClock::new(0);
        let cache = DnsCache::builder()
            .clock(clock.clone())
            .cleaning_interval(Some(10))
            .build();
        cache.put(key("a."), entry(5));
        cache.put(key("b."), entry(500));

        clock.set(20);
        cache.flush(Some(&key("b.")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_no_expiration_never_sweeps() {
        let clock = ManualClock::new(0);
        let cache = DnsCache::builder()
            .policy(NoExpiration)
            .clock(clock.clone())
            .cleaning_interval(Some(1))
            .build();
        assert_eq!(cache.next_cleaning(), None);

        cache.put(key("a."), entry(0));
        clock.advance(10 * 365 * 86_400);
        cache.put(key("b."), entry(0));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_explicit_sweep() {
        let clock = ManualClock::new(0);
        let cache = DnsCache::builder().clock(clock.clone()).build();
        cache.put(key("a."), entry(5));
        cache.put(key("b."), entry(50));

        clock.set(10);
        assert_eq!(cache.sweep_expired(), 1);
        cache.reschedule_cleaning(0);
        assert_eq!(cache.next_cleaning(), Some(0));
    }
}
