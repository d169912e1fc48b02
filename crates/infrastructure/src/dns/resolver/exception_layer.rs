use crate::dns::forwarding::ResponseParser;
use async_trait::async_trait;
use dnscache_application::ports::{CacheStore, Clock, DnsResolver};
use dnscache_domain::ttl::MIN_TTL;
use dnscache_domain::{CacheEntry, CacheKey, DnsAnswer, DnsFailure, DnsQuery, NegativeAnswer};
use std::sync::Arc;
use tracing::debug;

/// Exception-caching decorator
///
/// Replays memoized failures without network I/O and memoizes live ones.
/// NXDOMAIN applies to the whole name: besides the exact key it is stored
/// under the name-wide key of the name that does not exist, so a later
/// query for any record type of that name is answered from cache.
pub struct ExceptionCachingResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    negative_ttl: u64,
    store_answers: bool,
}

impl ExceptionCachingResolver {
    pub fn new(inner: Arc<dyn DnsResolver>, cache: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache,
            clock,
            negative_ttl: MIN_TTL,
            store_answers: true,
        }
    }

    /// Lifetime of memoized failures, added to the SOA-derived TTL for NXDOMAIN.
    pub fn with_negative_ttl(mut self, negative_ttl: u64) -> Self {
        self.negative_ttl = negative_ttl;
        self
    }

    /// Whether successful answers are stored here. Disable when an inner
    /// layer already caches them.
    pub fn store_answers(mut self, store: bool) -> Self {
        self.store_answers = store;
        self
    }

    fn check_cache(&self, query: &DnsQuery) -> Option<Result<DnsAnswer, DnsFailure>> {
        let key = query.key();
        let entry = self.cache.get(&key).or_else(|| {
            self.cache
                .peek(&key.name_wide())
                .filter(|entry| matches!(entry.as_failure(), Some(DnsFailure::NameNotFound(_))))
        })?;

        match entry {
            CacheEntry::Positive(answer) => {
                debug!(name = %query.name, record_type = %query.record_type, "Cache HIT");
                Some(Ok(answer.as_cache_hit()))
            }
            CacheEntry::Negative(negative) => {
                debug!(
                    name = %query.name,
                    record_type = %query.record_type,
                    kind = negative.failure.kind().as_str(),
                    "Negative cache HIT"
                );
                Some(Err(negative.failure))
            }
        }
    }

    fn store_failure(&self, query: &DnsQuery, failure: &DnsFailure) {
        if !failure.is_cacheable() {
            return;
        }

        let now = self.clock.now_secs();
        let fallback = now.saturating_add(self.negative_ttl);

        match failure {
            DnsFailure::NameNotFound(context) => {
                for qname in context.qnames() {
                    let soa_ttl = context
                        .response_for(qname)
                        .and_then(|response| ResponseParser::negative_ttl(response))
                        .map_or(0, u64::from);
                    let entry = NegativeAnswer::new(failure.clone(), fallback.saturating_add(soa_ttl));
                    let key = CacheKey::new(qname, query.record_type, query.record_class);

                    if context.canonical_name() == Some(qname) {
                        self.cache.put(key.name_wide(), entry.clone().into());
                    }
                    self.cache.put(key, entry.into());
                }

                if !context.qnames().contains(&query.name) {
                    self.cache.put(query.key(), NegativeAnswer::new(failure.clone(), fallback).into());
                }
            }
            _ => {
                self.cache.put(query.key(), NegativeAnswer::new(failure.clone(), fallback).into());
            }
        }

        debug!(
            name = %query.name,
            record_type = %query.record_type,
            kind = failure.kind().as_str(),
            "Query failed, caching negative response"
        );
    }
}

#[async_trait]
impl DnsResolver for ExceptionCachingResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DnsFailure> {
        if query.is_metaquery() {
            return self.inner.resolve(query).await;
        }

        if let Some(cached) = self.check_cache(query) {
            return cached;
        }

        debug!(name = %query.name, record_type = %query.record_type, "Cache MISS");

        match self.inner.resolve(query).await {
            Ok(answer) => {
                if self.store_answers && !answer.cache_hit {
                    self.cache.put(query.key(), answer.clone().into());
                }
                Ok(answer)
            }
            Err(failure) => {
                self.store_failure(query, &failure);
                Err(failure)
            }
        }
    }

    fn try_cache(&self, query: &DnsQuery) -> Option<Result<DnsAnswer, DnsFailure>> {
        if query.is_metaquery() {
            return None;
        }
        self.check_cache(query)
    }
}
