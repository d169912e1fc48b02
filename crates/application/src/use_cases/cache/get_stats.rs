use crate::ports::{CacheStats, CacheStore};
use std::sync::Arc;

pub struct GetCacheStatsUseCase {
    cache: Arc<dyn CacheStore>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    pub fn execute(&self) -> CacheStats {
        self.cache.stats()
    }
}
