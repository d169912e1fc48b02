use dnscache_domain::DnsFailure;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub rcode: ResponseCode,

    pub truncated: bool,

    /// CNAME targets in answer-section order.
    pub cname_chain: Vec<Name>,

    pub min_ttl: Option<u32>,

    pub negative_soa_ttl: Option<u32>,

    pub message: Message,
}

impl DnsResponse {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    pub fn is_format_error(&self) -> bool {
        self.rcode == ResponseCode::FormErr
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DnsFailure> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DnsFailure::SyntaxError(format!("Failed to parse DNS response: {}", e))
        })?;

        Ok(Self::inspect(message))
    }

    /// Summarize an already decoded message.
    pub fn inspect(message: Message) -> DnsResponse {
        let rcode = message.response_code();
        let truncated = message.truncated();

        let mut cname_chain = Vec::new();
        let mut min_ttl: Option<u32> = None;

        for record in message.answers() {
            let record_ttl = record.ttl();
            min_ttl = Some(min_ttl.map_or(record_ttl, |current| current.min(record_ttl)));

            if let RData::CNAME(canonical) = record.data() {
                debug!(cname = %canonical.0, "CNAME record found");
                cname_chain.push(canonical.0.clone());
            }
        }

        let negative_soa_ttl = Self::negative_ttl(&message);

        debug!(
            rcode = ?rcode,
            answers = message.answers().len(),
            cname_hops = cname_chain.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        DnsResponse {
            rcode,
            truncated,
            cname_chain,
            min_ttl,
            negative_soa_ttl,
            message,
        }
    }

    /// Negative caching TTL (RFC 2308): min(SOA MINIMUM, SOA record TTL).
    pub fn negative_ttl(message: &Message) -> Option<u32> {
        message.name_servers().iter().find_map(|r| {
            if let RData::SOA(soa) = r.data() {
                Some(soa.minimum().min(r.ttl()))
            } else {
                None
            }
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "OTHER",
        }
    }
}
