use crate::DomainError;
use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::fmt;
use std::str::FromStr;

/// Resolution key: (name, record type, record class).
///
/// The name is normalized to its lowercase, fully-qualified form so that
/// equality and hashing are purely structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: Name,
    pub record_type: RecordType,
    pub record_class: DNSClass,
}

impl CacheKey {
    #[inline]
    pub fn new(name: &Name, record_type: RecordType, record_class: DNSClass) -> Self {
        let mut name = name.to_lowercase();
        name.set_fqdn(true);
        Self {
            name,
            record_type,
            record_class,
        }
    }

    /// Key shared by every record type of this name.
    ///
    /// `ANY` is a metaquery and is never stored as a regular answer, so the
    /// slot is free to carry name-wide NXDOMAIN markers.
    pub fn name_wide(&self) -> Self {
        Self {
            name: self.name.clone(),
            record_type: RecordType::ANY,
            record_class: self.record_class,
        }
    }

    pub fn is_name_wide(&self) -> bool {
        self.record_type == RecordType::ANY
    }

    /// String form used by string-keyed backends: `<name>!<type>!<class>`.
    pub fn encode(&self) -> String {
        format!(
            "{}!{}!{}",
            self.name.to_ascii(),
            u16::from(self.record_type),
            u16::from(self.record_class)
        )
    }

    pub fn decode(encoded: &str) -> Result<Self, DomainError> {
        let mut parts = encoded.rsplitn(3, '!');
        let (Some(class), Some(rtype), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(DomainError::InvalidCacheKey(encoded.to_string()));
        };

        let name = Name::from_str(name)
            .map_err(|e| DomainError::InvalidCacheKey(format!("{}: {}", encoded, e)))?;
        let rtype: u16 = rtype
            .parse()
            .map_err(|_| DomainError::InvalidCacheKey(encoded.to_string()))?;
        let class: u16 = class
            .parse()
            .map_err(|_| DomainError::InvalidCacheKey(encoded.to_string()))?;

        Ok(Self::new(
            &name,
            RecordType::from(rtype),
            class_from_u16(class)
                .ok_or_else(|| DomainError::InvalidCacheKey(encoded.to_string()))?,
        ))
    }
}

fn class_from_u16(value: u16) -> Option<DNSClass> {
    match value {
        1 => Some(DNSClass::IN),
        3 => Some(DNSClass::CH),
        4 => Some(DNSClass::HS),
        254 => Some(DNSClass::NONE),
        255 => Some(DNSClass::ANY),
        _ => None,
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.record_class, self.record_type)
    }
}
