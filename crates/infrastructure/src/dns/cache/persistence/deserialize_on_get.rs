use dnscache_application::ports::{CacheStats, CacheStore, Closeable, EntryLoader};
use dnscache_domain::{CacheEntry, CacheKey};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, warn};

/// Store that fills itself from `source` the first time it is read.
///
/// The loader runs at most once per instance, even under concurrent
/// first reads; other readers wait for it to finish. A failing loader is
/// logged and leaves the store empty.
pub struct DeserializeOnGet<S> {
    inner: S,
    source: PathBuf,
    loader: Box<dyn EntryLoader>,
    loaded: Once,
}

impl<S: CacheStore> DeserializeOnGet<S> {
    pub fn new(inner: S, source: impl Into<PathBuf>, loader: impl EntryLoader + 'static) -> Self {
        Self {
            inner,
            source: source.into(),
            loader: Box::new(loader),
            loaded: Once::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_completed()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn ensure_loaded(&self) {
        self.loaded.call_once(|| match self.loader.load(&self.source) {
            Ok(entries) => {
                let count = entries.len();
                for (key, entry) in entries {
                    self.inner.put(key, entry);
                }
                debug!(source = %self.source.display(), entries = count, "Deserialized cache source");
            }
            Err(e) => {
                warn!(source = %self.source.display(), error = %e, "Failed to load cache source");
            }
        });
    }
}

impl<S: CacheStore> CacheStore for DeserializeOnGet<S> {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.ensure_loaded();
        self.inner.get(key)
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.inner.put(key, entry)
    }

    fn flush(&self, key: Option<&CacheKey>) {
        self.inner.flush(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.ensure_loaded();
        self.inner.contains(key)
    }

    fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.ensure_loaded();
        self.inner.peek(key)
    }

    fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.inner.entries()
    }

    fn restore(&self, entries: Vec<(CacheKey, CacheEntry)>) {
        self.inner.restore(entries)
    }

    fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    fn closeable(&self) -> Option<&dyn Closeable> {
        self.inner.closeable()
    }
}
