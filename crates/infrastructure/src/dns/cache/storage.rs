// Core cache store: one backend behind one lock, plus an expiration policy

use super::clock::SystemClock;
use super::eviction::EvictionStrategy;
use super::expiration::{ExpirationPolicy, MinExpiration, NoExpiration, UpstreamExpiration};
use super::CacheMetrics;
use dnscache_application::ports::{CacheBackend, CacheStats, CacheStore, Clock};
use dnscache_domain::config::CacheConfig;
use dnscache_domain::{CacheEntry, CacheKey};
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub(super) struct CacheState {
    pub(super) backend: Box<dyn CacheBackend>,
    pub(super) next_cleaning: u64,
}

/// DNS cache store.
///
/// Every operation, including `get` (which may touch LRU recency), runs
/// under the single `state` lock.
pub struct DnsCache {
    pub(super) state: Mutex<CacheState>,
    pub(super) policy: Box<dyn ExpirationPolicy>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) cleaning_interval: Option<u64>,
    pub(super) metrics: Arc<CacheMetrics>,
    eviction: EvictionStrategy,
}

pub struct DnsCacheBuilder {
    policy: Box<dyn ExpirationPolicy>,
    eviction: EvictionStrategy,
    backend: Option<Box<dyn CacheBackend>>,
    clock: Arc<dyn Clock>,
    cleaning_interval: Option<Option<u64>>,
}

impl Default for DnsCacheBuilder {
    fn default() -> Self {
        Self {
            policy: Box::new(UpstreamExpiration),
            eviction: EvictionStrategy::Unbounded,
            backend: None,
            clock: Arc::new(SystemClock),
            cleaning_interval: None,
        }
    }
}

impl DnsCacheBuilder {
    pub fn policy(mut self, policy: impl ExpirationPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn eviction(mut self, eviction: EvictionStrategy) -> Self {
        self.eviction = eviction;
        self
    }

    pub fn max_size(self, max_size: Option<usize>) -> Self {
        self.eviction(EvictionStrategy::from_max_size(max_size))
    }

    /// Store entries in a caller-provided backend instead of the one the
    /// eviction strategy would build.
    pub fn backend(mut self, backend: Box<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// `None` disables the lazy sweep.
    pub fn cleaning_interval(mut self, interval: Option<u64>) -> Self {
        self.cleaning_interval = Some(interval);
        self
    }

    pub fn build(self) -> DnsCache {
        let cleaning_interval = if self.policy.sweeps_expired() {
            self.cleaning_interval
                .unwrap_or_else(|| self.policy.default_cleaning_interval())
        } else {
            None
        };
        let backend = self
            .backend
            .unwrap_or_else(|| self.eviction.build_backend());
        let now = self.clock.now_secs();

        info!(
            policy = self.policy.name(),
            min_ttl = self.policy.min_ttl(),
            eviction_strategy = self.eviction.as_str(),
            max_size = ?self.eviction.max_size(),
            cleaning_interval = ?cleaning_interval,
            "Initializing DNS cache"
        );

        DnsCache {
            state: Mutex::new(CacheState {
                backend,
                next_cleaning: cleaning_interval.map_or(u64::MAX, |i| now.saturating_add(i)),
            }),
            policy: self.policy,
            clock: self.clock,
            cleaning_interval,
            metrics: Arc::new(CacheMetrics::default()),
            eviction: self.eviction,
        }
    }
}

impl DnsCache {
    pub fn builder() -> DnsCacheBuilder {
        DnsCacheBuilder::default()
    }

    /// Plain unbounded store keeping upstream expirations.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::builder().shared_clock(clock).build()
    }

    pub fn min_expiration(min_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self::builder()
            .policy(MinExpiration::new(min_ttl))
            .shared_clock(clock)
            .build()
    }

    pub fn no_expiration(clock: Arc<dyn Clock>) -> Self {
        Self::builder()
            .policy(NoExpiration)
            .shared_clock(clock)
            .build()
    }

    pub fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let builder = if config.no_expiry {
            Self::builder().policy(NoExpiration)
        } else {
            Self::builder()
                .policy(MinExpiration::new(config.effective_min_ttl()))
                .cleaning_interval(config.effective_cleaning_interval())
        };
        builder
            .max_size(config.max_size)
            .shared_clock(clock)
            .build()
    }

    #[inline]
    pub(super) fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now_secs()
    }

    pub fn eviction_strategy(&self) -> EvictionStrategy {
        self.eviction
    }

    pub fn policy(&self) -> &dyn ExpirationPolicy {
        self.policy.as_ref()
    }

    pub fn cleaning_interval(&self) -> Option<u64> {
        self.cleaning_interval
    }

    pub fn metrics(&self) -> &Arc<CacheMetrics> {
        &self.metrics
    }

    fn record_eviction(&self, evicted: &CacheKey) {
        self.metrics.evictions.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(name = %evicted.name, record_type = %evicted.record_type, "Evicted least recently used entry");
    }
}

impl CacheStore for DnsCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let now = self.now();
        let mut state = self.lock();
        // LRU reads reorder the backend, so they count as mutations
        if state.backend.purges_expired_on_get() {
            self.maybe_clean(&mut state, now);
        }
        let found = state.backend.get(key).cloned();

        match found {
            Some(entry) if !entry.is_expired(now) => {
                self.metrics.record_hit();
                Some(entry)
            }
            Some(_) => {
                if state.backend.purges_expired_on_get() {
                    state.backend.remove(key);
                }
                self.metrics.record_miss();
                None
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    fn put(&self, key: CacheKey, mut entry: CacheEntry) {
        let now = self.now();
        self.policy.apply(&mut entry, now);

        let mut state = self.lock();
        self.maybe_clean(&mut state, now);

        debug!(
            name = %key.name,
            record_type = %key.record_type,
            negative = entry.is_negative(),
            ttl = entry.expiration().saturating_sub(now),
            "Inserted into cache"
        );

        if let Some((evicted, _)) = state.backend.insert(key, entry) {
            self.record_eviction(&evicted);
        }
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
    }

    fn flush(&self, key: Option<&CacheKey>) {
        let now = self.now();
        let mut state = self.lock();
        self.maybe_clean(&mut state, now);

        match key {
            Some(key) => {
                state.backend.remove(key);
            }
            None => {
                state.backend.clear();
                debug!("Cache flushed");
            }
        }
    }

    fn len(&self) -> usize {
        self.lock().backend.len()
    }

    fn contains(&self, key: &CacheKey) -> bool {
        let now = self.now();
        self.lock()
            .backend
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        let now = self.now();
        self.lock()
            .backend
            .peek(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }

    fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.lock()
            .backend
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    /// Persisted entries keep their stored expiration; expired ones are
    /// dropped instead of being revived by the policy floor.
    fn restore(&self, entries: Vec<(CacheKey, CacheEntry)>) {
        let now = self.now();
        let mut state = self.lock();
        let mut restored = 0usize;

        for (key, entry) in entries {
            if entry.is_expired(now) {
                continue;
            }
            if let Some((evicted, _)) = state.backend.insert(key, entry) {
                self.record_eviction(&evicted);
            }
            restored += 1;
        }

        debug!(restored, cache_size = state.backend.len(), "Restored cache entries");
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.metrics.hits.load(AtomicOrdering::Relaxed),
            misses: self.metrics.misses.load(AtomicOrdering::Relaxed),
            evictions: self.metrics.evictions.load(AtomicOrdering::Relaxed),
            sweeps: self.metrics.sweeps.load(AtomicOrdering::Relaxed),
        }
    }
}
