use super::snapshot::SnapshotFile;
use crate::dns::cache::SystemClock;
use dnscache_application::ports::{CacheStats, CacheStore, Clock, Closeable};
use dnscache_domain::{CacheEntry, CacheKey, DomainError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Store backed by a snapshot file.
///
/// `open` restores the file into `inner` (expired entries dropped, file
/// order kept so LRU recency survives). `close` snapshots `inner` under
/// its lock and writes the file atomically. Nothing is written on drop;
/// hold a [`CacheGuard`](super::CacheGuard) for that.
pub struct PersistentCache<S> {
    inner: S,
    path: PathBuf,
    clock: Arc<dyn Clock>,
    closed: Mutex<bool>,
}

impl<S: CacheStore> PersistentCache<S> {
    pub fn open(inner: S, path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        if let Some(snapshot) = SnapshotFile::read(&path)? {
            let entries = snapshot.into_entries();
            let count = entries.len();
            inner.restore(entries);
            info!(
                path = %path.display(),
                entries = count,
                cache_size = inner.len(),
                "Restored DNS cache snapshot"
            );
        } else {
            debug!(path = %path.display(), "No DNS cache snapshot yet");
        }

        Ok(Self {
            inner,
            path,
            clock: Arc::new(SystemClock),
            closed: Mutex::new(false),
        })
    }

    /// Clock used to stamp `saved_at` in written snapshots.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Write the current contents to disk, closed or not.
    pub fn save(&self) -> Result<usize, DomainError> {
        let entries = self.inner.entries();
        let snapshot = SnapshotFile::capture(&entries, self.clock.now_secs());
        let written = snapshot.entries.len();
        snapshot.write_atomic(&self.path)?;

        info!(path = %self.path.display(), entries = written, "Saved DNS cache snapshot");
        Ok(written)
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: CacheStore> Closeable for PersistentCache<S> {
    fn close(&self) -> Result<(), DomainError> {
        let mut closed = self.closed.lock().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return Ok(());
        }
        self.save()?;
        *closed = true;
        Ok(())
    }
}

impl<S: CacheStore> CacheStore for PersistentCache<S> {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
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
        self.inner.contains(key)
    }

    fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
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
        Some(self)
    }
}
