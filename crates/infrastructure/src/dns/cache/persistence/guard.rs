use dnscache_application::ports::CacheStore;
use dnscache_domain::DomainError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Scope guard that closes a store exactly once.
///
/// Whether the store is closeable is decided when the guard is built.
/// Call [`CacheGuard::close`] to observe errors; otherwise the store is
/// closed on drop and failures are logged.
pub struct CacheGuard {
    store: Arc<dyn CacheStore>,
    closeable: bool,
    closed: AtomicBool,
}

impl CacheGuard {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        let closeable = store.closeable().is_some();
        debug!(closeable, "Cache guard armed");
        Self {
            store,
            closeable,
            closed: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn is_closeable(&self) -> bool {
        self.closeable
    }

    /// Close the store. A failed close leaves the guard open so it can
    /// be retried, and drop tries once more.
    pub fn close(&self) -> Result<(), DomainError> {
        if !self.closeable || self.closed.load(Ordering::Acquire) {
            return Ok(());
        }
        if let Some(closeable) = self.store.closeable() {
            closeable.close()?;
        }
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for CacheGuard {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "Failed to close DNS cache");
        }
    }
}
