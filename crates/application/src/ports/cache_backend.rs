use dnscache_domain::{CacheEntry, CacheKey};

/// Raw key/value storage underneath a cache store.
///
/// Backends know nothing about expiry policy; they only store, evict by
/// capacity (if bounded) and iterate. Callers serialize access.
pub trait CacheBackend: Send {
    /// Lookup that may refresh recency.
    fn get(&mut self, key: &CacheKey) -> Option<&CacheEntry>;

    /// Lookup without touching recency.
    fn peek(&self, key: &CacheKey) -> Option<&CacheEntry>;

    /// Insert or replace. Returns the entry evicted to make room, if any;
    /// a replaced value under the same key is not an eviction.
    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Option<(CacheKey, CacheEntry)>;

    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in eviction order (least recently used first when ordered).
    fn iter(&self) -> Box<dyn Iterator<Item = (&CacheKey, &CacheEntry)> + '_>;

    /// Whether `get` should drop an expired entry on sight.
    fn purges_expired_on_get(&self) -> bool {
        false
    }

    /// Remove every entry for which `expired` returns true; returns the count.
    fn remove_where(&mut self, expired: &dyn Fn(&CacheEntry) -> bool) -> usize {
        let doomed: Vec<CacheKey> = self
            .iter()
            .filter(|(_, entry)| expired(entry))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            self.remove(key);
        }
        doomed.len()
    }
}
