use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, UdpTransport};
use async_trait::async_trait;
use dnscache_application::ports::{Clock, DnsResolver};
use dnscache_domain::config::ResolverConfig;
use dnscache_domain::{DnsAnswer, DnsFailure, DnsQuery, NxDomainContext};
use hickory_proto::op::ResponseCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of asking one nameserver.
enum Attempt {
    Done(Result<DnsAnswer, DnsFailure>),
    /// Try the next server, remembering why this one failed
    Next { reason: String, timed_out: bool },
}

/// Network query primitive: asks each nameserver in turn until one gives
/// a usable answer or the lookup lifetime runs out.
///
/// Nameservers that time out are asked again on the next round. A server
/// that answers SERVFAIL, REFUSED or a mismatched ID is dropped for the
/// rest of the lookup. Running out of lifetime is always a `Timeout`.
pub struct CoreResolver {
    transports: Vec<Arc<dyn DnsTransport>>,
    timeout: Duration,
    lifetime: Duration,
    raise_on_no_answer: bool,
    clock: Arc<dyn Clock>,
}

impl CoreResolver {
    pub fn new(transports: Vec<Arc<dyn DnsTransport>>, clock: Arc<dyn Clock>) -> Self {
        let defaults = ResolverConfig::default();
        Self {
            transports,
            timeout: Duration::from_millis(defaults.timeout_ms),
            lifetime: Duration::from_millis(defaults.lifetime_ms),
            raise_on_no_answer: defaults.raise_on_no_answer,
            clock,
        }
    }

    pub fn from_config(config: &ResolverConfig, clock: Arc<dyn Clock>) -> Self {
        let transports = config
            .nameserver_addrs()
            .into_iter()
            .map(|addr| Arc::new(UdpTransport::new(addr)) as Arc<dyn DnsTransport>)
            .collect();

        Self::new(transports, clock)
            .with_timeout(Duration::from_millis(config.timeout_ms))
            .with_lifetime(Duration::from_millis(config.lifetime_ms))
            .raise_on_no_answer(config.raise_on_no_answer)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn raise_on_no_answer(mut self, raise: bool) -> Self {
        self.raise_on_no_answer = raise;
        self
    }

    pub fn nameservers(&self) -> Vec<std::net::SocketAddr> {
        self.transports.iter().map(|t| t.server()).collect()
    }

    async fn ask(&self, transport: &dyn DnsTransport, query: &DnsQuery, timeout: Duration) -> Attempt {
        let server = transport.server();
        let (id, query_bytes) = match MessageBuilder::build_query_with_id(query) {
            Ok(built) => built,
            Err(failure) => return Attempt::Done(Err(failure)),
        };

        let transport_response = match transport.send(&query_bytes, timeout).await {
            Ok(response) => response,
            Err(e) => {
                debug!(server = %server, error = %e, "Nameserver attempt failed");
                return Attempt::Next {
                    reason: e.to_string(),
                    timed_out: e.is_timeout(),
                };
            }
        };

        let response = match ResponseParser::parse(&transport_response.bytes) {
            Ok(response) => response,
            Err(failure) => return Attempt::Done(Err(failure)),
        };

        if response.message.id() != id {
            warn!(server = %server, expected = id, received = response.message.id(), "Mismatched DNS response ID");
            return Attempt::Next {
                reason: format!("{} answered with a mismatched ID", server),
                timed_out: false,
            };
        }

        if response.truncated {
            debug!(server = %server, "Response truncated (TC bit), using partial answer");
        }

        match response.rcode {
            ResponseCode::NoError | ResponseCode::NXDomain | ResponseCode::FormErr => {
                Attempt::Done(self.classify(query, response))
            }
            rcode => Attempt::Next {
                reason: format!("{} answered {}", server, ResponseParser::rcode_to_status(rcode)),
                timed_out: false,
            },
        }
    }

    fn classify(&self, query: &DnsQuery, response: DnsResponse) -> Result<DnsAnswer, DnsFailure> {
        let now = self.clock.now_secs();

        if response.is_format_error() {
            return Err(DnsFailure::SyntaxError(format!(
                "Nameserver rejected the query as malformed: {}",
                query
            )));
        }

        if response.is_nxdomain() {
            let message = Arc::new(response.message);
            let mut context = NxDomainContext::single(query.name.clone(), Arc::clone(&message));
            for alias in response.cname_chain {
                context.push(alias, Some(Arc::clone(&message)));
            }
            return Err(DnsFailure::NameNotFound(context));
        }

        let negative_ttl = response.negative_soa_ttl;
        let answer = DnsAnswer::new(query.clone(), response.message, now);
        let ttl = if answer.rrset().is_empty() {
            if self.raise_on_no_answer {
                return Err(DnsFailure::NoAnswer {
                    name: query.name.clone(),
                    record_type: query.record_type,
                });
            }
            negative_ttl.unwrap_or(0)
        } else {
            answer.min_ttl().unwrap_or(0)
        };

        Ok(DnsAnswer {
            expiration: now.saturating_add(u64::from(ttl)),
            ..answer
        })
    }
}

#[async_trait]
impl DnsResolver for CoreResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DnsFailure> {
        if query.is_metaquery() {
            return Err(DnsFailure::MetaqueryUnsupported {
                record_type: query.record_type,
            });
        }

        let start = Instant::now();
        let mut errors = Vec::new();
        let mut active: Vec<&Arc<dyn DnsTransport>> = self.transports.iter().collect();

        // Servers that timed out stay in rotation until the lifetime is spent;
        // servers that answered with an error are dropped.
        while !active.is_empty() {
            let mut retry = Vec::with_capacity(active.len());

            for transport in active {
                let Some(remaining) = self.lifetime.checked_sub(start.elapsed()).filter(|r| !r.is_zero())
                else {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    debug!(name = %query.name, elapsed_ms, attempts = errors.len(), "Resolution lifetime exhausted");
                    return Err(DnsFailure::Timeout {
                        name: query.name.clone(),
                        elapsed_ms,
                    });
                };

                match self.ask(transport.as_ref(), query, self.timeout.min(remaining)).await {
                    Attempt::Done(result) => {
                        debug!(
                            name = %query.name,
                            record_type = %query.record_type,
                            server = %transport.server(),
                            latency_ms = start.elapsed().as_millis() as u64,
                            ok = result.is_ok(),
                            "Upstream query finished"
                        );
                        return result;
                    }
                    Attempt::Next { reason, timed_out } => {
                        errors.push(reason);
                        if timed_out {
                            retry.push(transport);
                        }
                    }
                }
            }

            active = retry;
        }

        if errors.is_empty() {
            errors.push("no nameservers configured".to_string());
        }
        Err(DnsFailure::NoNameservers {
            name: query.name.clone(),
            errors,
        })
    }
}
