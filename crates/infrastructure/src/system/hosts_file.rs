use crate::dns::cache::{DeserializeOnGet, DnsCache};
use dnscache_application::ports::{Clock, EntryLoader, LoadedEntry};
use dnscache_domain::ttl::SECONDS_PER_YEAR;
use dnscache_domain::{DnsAnswer, DnsQuery, DomainError};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

pub const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// Read-only hosts cache: a no-expiry store filled from the hosts file on
/// first lookup.
pub type HostsCache = DeserializeOnGet<DnsCache>;

/// Loads `/etc/hosts`-format files as cache entries.
///
/// Every name of a line gets the line's address: IPv4 as `A`, IPv6 as
/// `AAAA`, class `IN`. Records carry a one-year TTL and entries expire one
/// year after the file's modification time.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostsFileLoader;

impl HostsFileLoader {
    pub fn new() -> Self {
        Self
    }

    /// Hosts cache over `path`, read lazily on first lookup.
    pub fn cache(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> HostsCache {
        DeserializeOnGet::new(DnsCache::no_expiration(clock), path, Self)
    }
}

impl EntryLoader for HostsFileLoader {
    fn load(&self, source: &Path) -> Result<Vec<LoadedEntry>, DomainError> {
        let content = match fs::read_to_string(source) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %source.display(), error = %e, "Failed to read hosts file");
                return Ok(Vec::new());
            }
        };

        let mtime = fs::metadata(source)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |since| since.as_secs());

        let entries = parse_hosts(&content, mtime.saturating_add(SECONDS_PER_YEAR));
        debug!(path = %source.display(), entries = entries.len(), "Hosts file loaded");
        Ok(entries)
    }
}

/// Parse hosts-file content into one entry per (name, record type), all
/// expiring at `expiration`.
pub fn parse_hosts(content: &str, expiration: u64) -> Vec<LoadedEntry> {
    let mut rrsets: Vec<(DnsQuery, Vec<IpAddr>)> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();

        let Some(address) = fields.next() else {
            continue;
        };
        let Ok(ip) = address.parse::<IpAddr>() else {
            debug!(line = line_num + 1, address, "Skipping hosts line with invalid address");
            continue;
        };
        let record_type = match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::AAAA,
        };

        for host in fields {
            let Ok(name) = Name::from_ascii(host) else {
                debug!(line = line_num + 1, host, "Skipping invalid host name");
                continue;
            };
            let query = DnsQuery::new(name, record_type);

            match rrsets.iter_mut().find(|(existing, _)| existing.key() == query.key()) {
                Some((_, ips)) if !ips.contains(&ip) => ips.push(ip),
                Some(_) => {}
                None => rrsets.push((query, vec![ip])),
            }
        }
    }

    rrsets
        .into_iter()
        .map(|(query, ips)| {
            let response = hosts_response(&query, &ips);
            (query.key(), DnsAnswer::new(query, response, expiration).into())
        })
        .collect()
}

fn hosts_response(query: &DnsQuery, ips: &[IpAddr]) -> Message {
    let mut question = Query::new();
    question.set_name(query.name.clone());
    question.set_query_type(query.record_type);
    question.set_query_class(DNSClass::IN);

    let mut message = Message::new(0, MessageType::Response, OpCode::Query);
    message.add_query(question);

    for ip in ips {
        let rdata = match ip {
            IpAddr::V4(v4) => RData::A(A(*v4)),
            IpAddr::V6(v6) => RData::AAAA(AAAA(*v6)),
        };
        message.add_answer(Record::from_rdata(
            query.name.clone(),
            SECONDS_PER_YEAR as u32,
            rdata,
        ));
    }

    message
}
