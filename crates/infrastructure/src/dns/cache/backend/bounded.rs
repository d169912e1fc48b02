use dnscache_application::ports::CacheBackend;
use dnscache_domain::{CacheEntry, CacheKey};
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;

/// Capacity-bounded backend with least-recently-used eviction.
///
/// `get` refreshes recency; `peek` does not. Expired entries are purged
/// on sight by the owning store.
pub struct LruBackend {
    cache: LruCache<CacheKey, CacheEntry, FxBuildHasher>,
}

impl LruBackend {
    pub fn new(max_size: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::with_hasher(max_size, FxBuildHasher),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl CacheBackend for LruBackend {
    #[inline]
    fn get(&mut self, key: &CacheKey) -> Option<&CacheEntry> {
        self.cache.get(key)
    }

    #[inline]
    fn peek(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.cache.peek(key)
    }

    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Option<(CacheKey, CacheEntry)> {
        let inserted = key.clone();
        match self.cache.push(key, entry) {
            // same key: the old value was replaced, nothing was evicted
            Some((old_key, _)) if old_key == inserted => None,
            evicted => evicted,
        }
    }

    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        self.cache.pop(key)
    }

    fn clear(&mut self) {
        self.cache.clear();
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&CacheKey, &CacheEntry)> + '_> {
        // LruCache iterates most-recent first; expose least-recent first
        Box::new(self.cache.iter().rev())
    }

    fn purges_expired_on_get(&self) -> bool {
        true
    }
}
