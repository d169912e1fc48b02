use super::DnsQuery;
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::IpAddr;
use std::sync::Arc;

/// A successful resolution: the question, the full response and the
/// absolute wall-clock second at which it stops being valid.
///
/// The response is shared (`Arc`) so cache hits never copy record data.
#[derive(Debug, Clone)]
pub struct DnsAnswer {
    pub query: DnsQuery,
    pub response: Arc<Message>,
    pub expiration: u64,
    pub cache_hit: bool,
}

impl DnsAnswer {
    pub fn new(query: DnsQuery, response: impl Into<Arc<Message>>, expiration: u64) -> Self {
        Self {
            query,
            response: response.into(),
            expiration,
            cache_hit: false,
        }
    }

    /// Same answer marked as served from cache.
    pub fn as_cache_hit(&self) -> Self {
        Self {
            cache_hit: true,
            ..self.clone()
        }
    }

    /// Whole answer section, including any alias chain.
    #[inline]
    pub fn records(&self) -> &[Record] {
        self.response.answers()
    }

    /// Follow CNAMEs inside the answer section starting at the queried name.
    /// A CNAME question is answered by the alias itself.
    pub fn canonical_name(&self) -> Name {
        let mut current = self.query.name.clone();
        if self.query.record_type == RecordType::CNAME {
            return current;
        }
        // bounded by the section size so alias loops terminate
        for _ in 0..=self.records().len() {
            let next = self.records().iter().find_map(|record| match record.data() {
                RData::CNAME(target) if record.name() == &current => Some(target.0.clone()),
                _ => None,
            });
            match next {
                Some(target) if target != current => current = target,
                _ => break,
            }
        }
        current
    }

    /// Records of the requested type owned by the canonical name.
    pub fn rrset(&self) -> Vec<&Record> {
        let owner = self.canonical_name();
        self.records()
            .iter()
            .filter(|record| {
                record.record_type() == self.query.record_type && record.name() == &owner
            })
            .collect()
    }

    pub fn addresses(&self) -> Vec<IpAddr> {
        self.records()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
                _ => None,
            })
            .collect()
    }

    /// Smallest TTL among answer records, if any.
    pub fn min_ttl(&self) -> Option<u32> {
        self.records().iter().map(|record| record.ttl()).min()
    }

    pub fn has_type(&self, record_type: RecordType) -> bool {
        self.records()
            .iter()
            .any(|record| record.record_type() == record_type)
    }

    #[inline]
    pub fn remaining_ttl(&self, now: u64) -> u64 {
        self.expiration.saturating_sub(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{MessageType, OpCode};
    use hickory_proto::rr::rdata::{A, CNAME};
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn cname_response() -> Message {
        let mut message = Message::new(1, MessageType::Response, OpCode::Query);
        message.add_answer(Record::from_rdata(
            name("www.coala.io."),
            300,
            RData::CNAME(CNAME(name("coala.io."))),
        ));
        message.add_answer(Record::from_rdata(
            name("coala.io."),
            60,
            RData::A(A(Ipv4Addr::new(46, 101, 245, 76))),
        ));
        message
    }

    #[test]
    fn test_follows_cname_chain() {
        let query = DnsQuery::new(name("www.coala.io."), RecordType::A);
        let answer = DnsAnswer::new(query, cname_response(), 100);

        assert_eq!(answer.canonical_name(), name("coala.io."));
        assert_eq!(answer.rrset().len(), 1);
        assert_eq!(
            answer.addresses(),
            vec![IpAddr::V4(Ipv4Addr::new(46, 101, 245, 76))]
        );
        assert_eq!(answer.min_ttl(), Some(60));
        assert!(answer.has_type(RecordType::CNAME));
    }

    #[test]
    fn test_cache_hit_marker_shares_response() {
        let query = DnsQuery::new(name("www.coala.io."), RecordType::A);
        let answer = DnsAnswer::new(query, cname_response(), 100);
        let hit = answer.as_cache_hit();

        assert!(hit.cache_hit);
        assert!(!answer.cache_hit);
        assert!(Arc::ptr_eq(&hit.response, &answer.response));
        assert_eq!(hit.remaining_ttl(40), 60);
        assert_eq!(hit.remaining_ttl(400), 0);
    }

    #[test]
    fn test_cname_question_is_not_followed() {
        let query = DnsQuery::new(name("www.coala.io."), RecordType::CNAME);
        let answer = DnsAnswer::new(query, cname_response(), 100);

        assert_eq!(answer.canonical_name(), name("www.coala.io."));
        assert_eq!(answer.rrset().len(), 1);
    }
}
