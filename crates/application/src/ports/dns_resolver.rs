use async_trait::async_trait;
use dnscache_domain::{DnsAnswer, DnsFailure, DnsQuery};

/// Anything that answers a DNS question: the network query primitive and
/// every caching decorator wrapped around it.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DnsFailure>;

    /// Answer from local state only, without network I/O.
    fn try_cache(&self, _query: &DnsQuery) -> Option<Result<DnsAnswer, DnsFailure>> {
        None
    }
}
