#![allow(dead_code)]
use async_trait::async_trait;
use dnscache_application::ports::DnsResolver;
use dnscache_domain::{CacheKey, DnsAnswer, DnsFailure, DnsQuery};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// Upstream resolver with canned replies.
///
/// After [`MockUpstream::block`] every call is counted as a network access
/// that should not have happened and fails.
#[derive(Default)]
pub struct MockUpstream {
    replies: RwLock<HashMap<CacheKey, Result<DnsAnswer, DnsFailure>>>,
    calls: AtomicUsize,
    blocked: AtomicBool,
    blocked_calls: AtomicUsize,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, query: &DnsQuery, reply: Result<DnsAnswer, DnsFailure>) {
        self.replies.write().unwrap().insert(query.key(), reply);
    }

    pub fn block(&self) {
        self.blocked.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn blocked_calls(&self) -> usize {
        self.blocked_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for MockUpstream {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DnsFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.blocked.load(Ordering::SeqCst) {
            self.blocked_calls.fetch_add(1, Ordering::SeqCst);
            return Err(DnsFailure::NoNameservers {
                name: query.name.clone(),
                errors: vec!["network blocked".to_string()],
            });
        }

        if query.is_metaquery() {
            return Err(DnsFailure::MetaqueryUnsupported {
                record_type: query.record_type,
            });
        }

        self.replies
            .read()
            .unwrap()
            .get(&query.key())
            .cloned()
            .unwrap_or_else(|| {
                Err(DnsFailure::NoNameservers {
                    name: query.name.clone(),
                    errors: vec!["no mock reply configured".to_string()],
                })
            })
    }
}
