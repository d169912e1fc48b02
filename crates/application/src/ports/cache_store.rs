use dnscache_domain::{CacheEntry, CacheKey, DomainError};

/// Point-in-time counters of a cache store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub sweeps: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Stores that own external state and must be flushed deterministically.
pub trait Closeable: Send + Sync {
    /// Write out owned state. Idempotent.
    fn close(&self) -> Result<(), DomainError>;
}

/// The cache store contract shared by the core store and every
/// decorator (policies, persistence adapters, layering).
pub trait CacheStore: Send + Sync {
    /// Entry for `key` iff present and unexpired.
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Insert or replace, after applying the store's expiration policy.
    fn put(&self, key: CacheKey, entry: CacheEntry);

    /// Remove one entry, or every entry when `key` is `None`.
    fn flush(&self, key: Option<&CacheKey>);

    /// Number of stored entries, expired or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present and unexpired, without touching recency.
    fn contains(&self, key: &CacheKey) -> bool;

    /// Like `get` but leaves recency and hit/miss counters alone.
    fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.get(key)
    }

    /// Consistent copy of every stored entry, oldest first.
    fn entries(&self) -> Vec<(CacheKey, CacheEntry)>;

    /// Re-insert previously persisted entries as they were, oldest first.
    /// Stores with a policy floor override this to skip it.
    fn restore(&self, entries: Vec<(CacheKey, CacheEntry)>) {
        for (key, entry) in entries {
            self.put(key, entry);
        }
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            ..CacheStats::default()
        }
    }

    /// Optional capability: stores holding external state expose it here.
    fn closeable(&self) -> Option<&dyn Closeable> {
        None
    }
}

impl<T: CacheStore + ?Sized> CacheStore for std::sync::Arc<T> {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        (**self).get(key)
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        (**self).put(key, entry)
    }

    fn flush(&self, key: Option<&CacheKey>) {
        (**self).flush(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn contains(&self, key: &CacheKey) -> bool {
        (**self).contains(key)
    }

    fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        (**self).peek(key)
    }

    fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        (**self).entries()
    }

    fn restore(&self, entries: Vec<(CacheKey, CacheEntry)>) {
        (**self).restore(entries)
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }

    fn closeable(&self) -> Option<&dyn Closeable> {
        (**self).closeable()
    }
}
