use super::aggressive_layer::AggressiveCachingResolver;
use super::exception_layer::ExceptionCachingResolver;
use crate::dns::cache::SystemClock;
use dnscache_application::ports::{CacheStore, Clock, DnsResolver};
use dnscache_domain::ttl::MIN_TTL;
use std::sync::Arc;
use tracing::info;

pub struct ResolverBuilder {
    upstream: Arc<dyn DnsResolver>,
    cache: Option<Arc<dyn CacheStore>>,
    clock: Arc<dyn Clock>,
    aggressive: bool,
    negative_ttl: u64,
}

impl ResolverBuilder {
    pub fn new(upstream: Arc<dyn DnsResolver>) -> Self {
        Self {
            upstream,
            cache: None,
            clock: Arc::new(SystemClock),
            aggressive: true,
            negative_ttl: MIN_TTL,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn aggressive(mut self, enabled: bool) -> Self {
        self.aggressive = enabled;
        self
    }

    pub fn negative_ttl(mut self, negative_ttl: u64) -> Self {
        self.negative_ttl = negative_ttl;
        self
    }

    /// ExceptionCaching → AggressiveCaching (optional) → upstream.
    /// Without a cache the upstream is returned as is.
    pub fn build(self) -> Arc<dyn DnsResolver> {
        let Some(cache) = self.cache else {
            info!("Building resolver without cache");
            return self.upstream;
        };

        info!(
            aggressive = self.aggressive,
            negative_ttl = self.negative_ttl,
            "Building caching resolver"
        );

        let inner: Arc<dyn DnsResolver> = if self.aggressive {
            Arc::new(
                AggressiveCachingResolver::new(self.upstream, Arc::clone(&cache), Arc::clone(&self.clock))
                    .with_lookup(false),
            )
        } else {
            self.upstream
        };

        Arc::new(
            ExceptionCachingResolver::new(inner, cache, self.clock)
                .with_negative_ttl(self.negative_ttl)
                .store_answers(!self.aggressive),
        )
    }
}
