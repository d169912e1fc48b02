use dnscache_application::ports::CacheBackend;
use dnscache_domain::{CacheEntry, CacheKey};
use rustc_hash::FxHashMap;

/// Unbounded hash-map backend. Expired entries stay until swept.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: FxHashMap<CacheKey, CacheEntry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for MemoryBackend {
    #[inline]
    fn get(&mut self, key: &CacheKey) -> Option<&CacheEntry> {
        self.data.get(key)
    }

    #[inline]
    fn peek(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.data.get(key)
    }

    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Option<(CacheKey, CacheEntry)> {
        self.data.insert(key, entry);
        None
    }

    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        self.data.remove(key)
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&CacheKey, &CacheEntry)> + '_> {
        Box::new(self.data.iter())
    }

    fn remove_where(&mut self, expired: &dyn Fn(&CacheEntry) -> bool) -> usize {
        let before = self.data.len();
        self.data.retain(|_key, entry| !expired(entry));
        before - self.data.len()
    }
}
