use dnscache_application::ports::{CacheStats, CacheStore, Closeable};
use dnscache_domain::{CacheEntry, CacheKey};

/// Read-only `front` overlaid on a writable `back`.
///
/// Lookups try the front first and fall through to the back on a miss.
/// Every mutation, size query and disposal goes to the back only; the
/// front is never written.
pub struct LayeredCache<F, B> {
    front: F,
    back: B,
}

impl<F: CacheStore, B: CacheStore> LayeredCache<F, B> {
    pub fn new(front: F, back: B) -> Self {
        Self { front, back }
    }

    pub fn front(&self) -> &F {
        &self.front
    }

    pub fn back(&self) -> &B {
        &self.back
    }
}

impl<F: CacheStore, B: CacheStore> CacheStore for LayeredCache<F, B> {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.front.get(key).or_else(|| self.back.get(key))
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.back.put(key, entry)
    }

    fn flush(&self, key: Option<&CacheKey>) {
        self.back.flush(key)
    }

    fn len(&self) -> usize {
        self.back.len()
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.front.contains(key) || self.back.contains(key)
    }

    fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.front.peek(key).or_else(|| self.back.peek(key))
    }

    fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.back.entries()
    }

    fn restore(&self, entries: Vec<(CacheKey, CacheEntry)>) {
        self.back.restore(entries)
    }

    fn stats(&self) -> CacheStats {
        self.back.stats()
    }

    fn closeable(&self) -> Option<&dyn Closeable> {
        self.back.closeable()
    }
}
