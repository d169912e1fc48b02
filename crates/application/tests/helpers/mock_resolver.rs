#![allow(dead_code)]

use async_trait::async_trait;
use dnscache_application::ports::DnsResolver;
use dnscache_domain::{DnsAnswer, DnsFailure, DnsQuery};
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock DnsResolver
// ============================================================================

#[derive(Default)]
pub struct MockDnsResolver {
    replies: Mutex<HashMap<(String, RecordType), Result<DnsAnswer, DnsFailure>>>,
    calls: AtomicUsize,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `name`/`record_type` with the given addresses
    pub fn set_addresses(&self, name: &str, record_type: RecordType, ips: &[IpAddr]) {
        let query = DnsQuery::parse(name, record_type).unwrap();
        let mut message = Message::new(1, MessageType::Response, OpCode::Query);
        for ip in ips {
            let rdata = match ip {
                IpAddr::V4(v4) => RData::A(A(*v4)),
                IpAddr::V6(v6) => RData::AAAA(AAAA(*v6)),
            };
            message.add_answer(Record::from_rdata(query.name.clone(), 60, rdata));
        }
        self.set_reply(name, record_type, Ok(DnsAnswer::new(query, message, 60)));
    }

    pub fn set_failure(&self, name: &str, record_type: RecordType, failure: DnsFailure) {
        self.set_reply(name, record_type, Err(failure));
    }

    fn set_reply(&self, name: &str, record_type: RecordType, reply: Result<DnsAnswer, DnsFailure>) {
        self.replies
            .lock()
            .unwrap()
            .insert((key_name(name), record_type), reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn key_name(name: &str) -> String {
    let mut name = Name::from_ascii(name).unwrap().to_lowercase();
    name.set_fqdn(true);
    name.to_ascii()
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DnsFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .get(&(key_name(&query.name.to_ascii()), query.record_type))
            .cloned()
            .unwrap_or_else(|| {
                Err(DnsFailure::NoNameservers {
                    name: query.name.clone(),
                    errors: vec!["no mock reply configured".to_string()],
                })
            })
    }
}
