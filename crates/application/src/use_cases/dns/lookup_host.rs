use crate::ports::DnsResolver;
use dnscache_domain::{DnsFailure, DnsQuery, DomainError};
use hickory_proto::rr::RecordType;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Host name to addresses through the injected resolver.
///
/// Tries A first and falls back to AAAA when the name has no IPv4 address.
pub struct LookupHostUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl LookupHostUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let v4 = DnsQuery::parse(host, RecordType::A)?;
        match self.resolver.resolve(&v4).await {
            Ok(answer) => {
                let addresses = answer.addresses();
                if !addresses.is_empty() {
                    debug!(host, cache_hit = answer.cache_hit, "Host resolved via A");
                    return Ok(addresses);
                }
            }
            Err(DnsFailure::NoAnswer { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let v6 = DnsQuery::parse(host, RecordType::AAAA)?;
        let answer = self.resolver.resolve(&v6).await?;
        debug!(host, cache_hit = answer.cache_hit, "Host resolved via AAAA");
        Ok(answer.addresses())
    }

    /// First address only, like `gethostbyname`.
    pub async fn first(&self, host: &str) -> Result<IpAddr, DomainError> {
        let addresses = self.execute(host).await?;
        addresses.into_iter().next().ok_or_else(|| {
            DomainError::Resolution(DnsFailure::NoAnswer {
                name: hickory_proto::rr::Name::from_ascii(host)
                    .unwrap_or_else(|_| hickory_proto::rr::Name::root()),
                record_type: RecordType::A,
            })
        })
    }
}
