use dnscache_domain::{CacheEntry, CacheKey, DomainError};
use std::path::Path;

pub type LoadedEntry = (CacheKey, CacheEntry);

/// Produces cache entries from an external source (hosts file, dump, ...).
pub trait EntryLoader: Send + Sync {
    fn load(&self, source: &Path) -> Result<Vec<LoadedEntry>, DomainError>;
}

impl<F> EntryLoader for F
where
    F: Fn(&Path) -> Result<Vec<LoadedEntry>, DomainError> + Send + Sync,
{
    fn load(&self, source: &Path) -> Result<Vec<LoadedEntry>, DomainError> {
        self(source)
    }
}
