#![allow(dead_code)]
use dnscache_domain::{CacheEntry, CacheKey, DnsAnswer, DnsFailure, DnsQuery, NegativeAnswer, NxDomainContext};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, NS, SOA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn query(s: &str, record_type: RecordType) -> DnsQuery {
    DnsQuery::parse(s, record_type).unwrap()
}

pub fn key(s: &str, record_type: RecordType) -> CacheKey {
    query(s, record_type).key()
}

pub fn a_record(owner: &str, ttl: u32, ip: Ipv4Addr) -> Record {
    Record::from_rdata(name(owner), ttl, RData::A(A(ip)))
}

pub fn ns_record(owner: &str, ttl: u32, target: &str) -> Record {
    Record::from_rdata(name(owner), ttl, RData::NS(NS(name(target))))
}

/// SOA for `zone` whose record TTL equals its minimum field.
pub fn soa_record(zone: &str, minimum: u32) -> Record {
    let soa = SOA::new(
        name(&format!("ns1.{}", zone)),
        name(&format!("hostmaster.{}", zone)),
        2024010101,
        7200,
        3600,
        1209600,
        minimum,
    );
    Record::from_rdata(name(zone), minimum, RData::SOA(soa))
}

/// Response message for `query` with the given sections.
pub struct ResponseBuilder {
    message: Message,
}

impl ResponseBuilder {
    pub fn new(query: &DnsQuery) -> Self {
        let mut question = Query::new();
        question.set_name(query.name.clone());
        question.set_query_type(query.record_type);
        question.set_query_class(query.record_class);

        let mut message = Message::new(1, MessageType::Response, OpCode::Query);
        message.add_query(question);
        Self { message }
    }

    pub fn answer(mut self, record: Record) -> Self {
        self.message.add_answer(record);
        self
    }

    pub fn authority(mut self, record: Record) -> Self {
        self.message.add_name_server(record);
        self
    }

    pub fn additional(mut self, record: Record) -> Self {
        self.message.add_additional(record);
        self
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.message.set_response_code(rcode);
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// Single A answer for `owner` as a cache entry expiring at `expiration`.
pub fn a_entry(owner: &str, ip: Ipv4Addr, expiration: u64) -> CacheEntry {
    let q = query(owner, RecordType::A);
    let message = ResponseBuilder::new(&q).answer(a_record(owner, 60, ip)).build();
    DnsAnswer::new(q, message, expiration).into()
}

pub fn negative_entry(expiration: u64) -> CacheEntry {
    NegativeAnswer::new(DnsFailure::SyntaxError("malformed".into()), expiration).into()
}

/// NXDOMAIN for the chain `qnames`, every response carrying an SOA with
/// the given minimum in its authority section.
pub fn nxdomain(qnames: &[&str], zone: &str, soa_minimum: u32) -> DnsFailure {
    let mut context = NxDomainContext::new();
    for qname in qnames {
        let q = query(qname, RecordType::A);
        let response = ResponseBuilder::new(&q)
            .rcode(ResponseCode::NXDomain)
            .authority(soa_record(zone, soa_minimum))
            .build();
        context.push(q.name, Some(Arc::new(response)));
    }
    DnsFailure::NameNotFound(context)
}

pub fn timeout(owner: &str) -> DnsFailure {
    DnsFailure::Timeout {
        name: name(owner),
        elapsed_ms: 2000,
    }
}
