use super::{CacheKey, DnsFailure};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::fmt;
use std::str::FromStr;

/// DNS query (name + record type + record class).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    pub name: Name,
    pub record_type: RecordType,
    pub record_class: DNSClass,
}

impl DnsQuery {
    pub fn new(name: Name, record_type: RecordType) -> Self {
        Self::with_class(name, record_type, DNSClass::IN)
    }

    pub fn with_class(mut name: Name, record_type: RecordType, record_class: DNSClass) -> Self {
        name.set_fqdn(true);
        Self {
            name,
            record_type,
            record_class,
        }
    }

    /// Parse a textual name; relative names are made absolute.
    pub fn parse(name: &str, record_type: RecordType) -> Result<Self, DnsFailure> {
        let parsed = Name::from_str(name)
            .map_err(|e| DnsFailure::SyntaxError(format!("Invalid domain '{}': {}", name, e)))?;
        Ok(Self::new(parsed, record_type))
    }

    #[inline]
    pub fn key(&self) -> CacheKey {
        CacheKey::new(&self.name, self.record_type, self.record_class)
    }

    /// Metaqueries (OPT, TKEY, TSIG, IXFR, AXFR, MAILB, MAILA, ANY) and
    /// metaclasses (NONE, ANY) cannot be answered from a cache.
    pub fn is_metaquery(&self) -> bool {
        matches!(u16::from(self.record_type), 41 | 249..=255)
            || matches!(u16::from(self.record_class), 254 | 255)
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.record_class, self.record_type)
    }
}
