use async_trait::async_trait;
use dnscache_application::ports::{CacheStore, Clock, DnsResolver};
use dnscache_domain::{CacheKey, DnsAnswer, DnsFailure, DnsQuery};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Record, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Aggressive-caching decorator
///
/// Stores the answer it was asked for, then turns every other record set
/// of the response (answer, authority and additional sections) into a
/// standalone answer under its own key. Existing unexpired entries are
/// never overwritten.
pub struct AggressiveCachingResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    lookup: bool,
}

impl AggressiveCachingResolver {
    pub fn new(inner: Arc<dyn DnsResolver>, cache: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache,
            clock,
            lookup: true,
        }
    }

    /// Whether this layer serves cached answers itself. Disable when an
    /// outer layer already looks the query up.
    pub fn with_lookup(mut self, lookup: bool) -> Self {
        self.lookup = lookup;
        self
    }

    fn cached_answer(&self, query: &DnsQuery) -> Option<DnsAnswer> {
        self.cache
            .get(&query.key())
            .and_then(|entry| entry.as_answer().map(DnsAnswer::as_cache_hit))
    }

    /// Cache every record set of `answer` except the primary one.
    /// Returns how many new entries were inserted.
    pub fn inject(&self, query: &DnsQuery, answer: &DnsAnswer) -> usize {
        let primary = query.key();
        let message = &answer.response;
        let now = self.clock.now_secs();

        let mut rrsets: Vec<(CacheKey, Vec<Record>)> = Vec::new();
        let sections = message
            .answers()
            .iter()
            .chain(message.name_servers())
            .chain(message.additionals());

        for record in sections {
            if is_metatype(record.record_type())
                || matches!(record.dns_class(), DNSClass::NONE | DNSClass::ANY)
            {
                continue;
            }
            let key = CacheKey::new(record.name(), record.record_type(), record.dns_class());
            if key == primary {
                continue;
            }
            match rrsets.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, records)) => records.push(record.clone()),
                None => rrsets.push((key, vec![record.clone()])),
            }
        }

        let mut injected = 0;
        for (key, records) in rrsets {
            if self.cache.contains(&key) {
                continue;
            }
            let ttl = records.iter().map(Record::ttl).min().unwrap_or(0);
            let forged_query = DnsQuery::with_class(key.name.clone(), key.record_type, key.record_class);
            let forged = forge_response(message.id(), &forged_query, records);

            self.cache.put(
                key,
                DnsAnswer::new(forged_query, forged, now.saturating_add(u64::from(ttl))).into(),
            );
            injected += 1;
        }

        injected
    }
}

/// Response carrying one record set as the answer to its own question.
fn forge_response(id: u16, query: &DnsQuery, records: Vec<Record>) -> Message {
    let mut question = Query::new();
    question.set_name(query.name.clone());
    question.set_query_type(query.record_type);
    question.set_query_class(query.record_class);

    let mut message = Message::new(id, MessageType::Response, OpCode::Query);
    message.add_query(question);
    for record in records {
        message.add_answer(record);
    }
    message
}

fn is_metatype(record_type: RecordType) -> bool {
    matches!(u16::from(record_type), 41 | 249..=255)
}

#[async_trait]
impl DnsResolver for AggressiveCachingResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DnsFailure> {
        if self.lookup && !query.is_metaquery() {
            if let Some(answer) = self.cached_answer(query) {
                debug!(name = %query.name, record_type = %query.record_type, "Cache HIT");
                return Ok(answer);
            }
        }

        let answer = self.inner.resolve(query).await?;
        if answer.cache_hit {
            return Ok(answer);
        }

        self.cache.put(query.key(), answer.clone().into());
        let injected = self.inject(query, &answer);

        debug!(
            name = %query.name,
            record_type = %query.record_type,
            injected,
            "Cached answer and supplementary records"
        );

        Ok(answer)
    }

    fn try_cache(&self, query: &DnsQuery) -> Option<Result<DnsAnswer, DnsFailure>> {
        if query.is_metaquery() {
            return None;
        }
        self.cached_answer(query).map(Ok)
    }
}
