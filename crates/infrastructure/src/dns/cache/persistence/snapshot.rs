//! On-disk snapshot format
//!
//! A JSON document holding every entry with its absolute expiration.
//! Positive answers keep the full response as base64-encoded wire bytes so
//! a restored entry is indistinguishable from the one that was saved.

use crate::dns::forwarding::MessageBuilder;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dnscache_domain::{
    CacheEntry, CacheKey, DnsAnswer, DnsFailure, DnsQuery, DomainError, NegativeAnswer,
    NxDomainContext,
};
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub version: u32,
    pub saved_at: u64,
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// `CacheKey::encode` form
    pub key: String,
    pub expiration: u64,
    pub value: StoredValue,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredResponse {
    pub qname: String,
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredValue {
    Answer {
        query: String,
        response: String,
    },
    NameNotFound {
        qnames: Vec<String>,
        responses: Vec<StoredResponse>,
    },
    NoAnswer {
        name: String,
        record_type: u16,
    },
    NoNameservers {
        name: String,
        errors: Vec<String>,
    },
    SyntaxError {
        message: String,
    },
    Timeout {
        name: String,
        elapsed_ms: u64,
    },
}

fn persistence_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence(format!("{}: {}", context, e))
}

fn encode_message(message: &Message) -> Result<String, DomainError> {
    let bytes = MessageBuilder::serialize_message(message)
        .map_err(|e| persistence_error("encode response", e))?;
    Ok(STANDARD.encode(bytes))
}

fn decode_message(encoded: &str) -> Result<Arc<Message>, DomainError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| persistence_error("decode base64", e))?;
    let message = Message::from_vec(&bytes).map_err(|e| persistence_error("decode response", e))?;
    Ok(Arc::new(message))
}

fn decode_name(name: &str) -> Result<Name, DomainError> {
    Name::from_ascii(name).map_err(|e| persistence_error("decode name", e))
}

impl StoredValue {
    /// `None` for values that are never persisted.
    fn capture(entry: &CacheEntry) -> Result<Option<Self>, DomainError> {
        let value = match entry {
            CacheEntry::Positive(answer) => Self::Answer {
                query: answer.query.key().encode(),
                response: encode_message(&answer.response)?,
            },
            CacheEntry::Negative(negative) => match &negative.failure {
                DnsFailure::NameNotFound(context) => Self::NameNotFound {
                    qnames: context.qnames().iter().map(Name::to_ascii).collect(),
                    responses: context
                        .responses()
                        .iter()
                        .map(|(qname, response)| {
                            Ok(StoredResponse {
                                qname: qname.to_ascii(),
                                response: encode_message(response)?,
                            })
                        })
                        .collect::<Result<_, DomainError>>()?,
                },
                DnsFailure::NoAnswer { name, record_type } => Self::NoAnswer {
                    name: name.to_ascii(),
                    record_type: u16::from(*record_type),
                },
                DnsFailure::NoNameservers { name, errors } => Self::NoNameservers {
                    name: name.to_ascii(),
                    errors: errors.clone(),
                },
                DnsFailure::SyntaxError(message) => Self::SyntaxError {
                    message: message.clone(),
                },
                DnsFailure::Timeout { name, elapsed_ms } => Self::Timeout {
                    name: name.to_ascii(),
                    elapsed_ms: *elapsed_ms,
                },
                DnsFailure::MetaqueryUnsupported { .. } => return Ok(None),
            },
        };
        Ok(Some(value))
    }

    fn restore(self, expiration: u64) -> Result<CacheEntry, DomainError> {
        let failure = match self {
            Self::Answer { query, response } => {
                let key = CacheKey::decode(&query)?;
                let query = DnsQuery::with_class(key.name, key.record_type, key.record_class);
                return Ok(DnsAnswer::new(query, decode_message(&response)?, expiration).into());
            }
            Self::NameNotFound { qnames, responses } => {
                let mut context = NxDomainContext::new();
                for qname in &qnames {
                    context.push(decode_name(qname)?, None);
                }
                for stored in &responses {
                    context.push(
                        decode_name(&stored.qname)?,
                        Some(decode_message(&stored.response)?),
                    );
                }
                DnsFailure::NameNotFound(context)
            }
            Self::NoAnswer { name, record_type } => DnsFailure::NoAnswer {
                name: decode_name(&name)?,
                record_type: RecordType::from(record_type),
            },
            Self::NoNameservers { name, errors } => DnsFailure::NoNameservers {
                name: decode_name(&name)?,
                errors,
            },
            Self::SyntaxError { message } => DnsFailure::SyntaxError(message),
            Self::Timeout { name, elapsed_ms } => DnsFailure::Timeout {
                name: decode_name(&name)?,
                elapsed_ms,
            },
        };
        Ok(NegativeAnswer::new(failure, expiration).into())
    }
}

impl SnapshotFile {
    /// Encode `entries` (oldest first). Entries that cannot be encoded are
    /// logged and left out.
    pub fn capture(entries: &[(CacheKey, CacheEntry)], saved_at: u64) -> Self {
        let entries = entries
            .iter()
            .filter_map(|(key, entry)| match StoredValue::capture(entry) {
                Ok(Some(value)) => Some(SnapshotEntry {
                    key: key.encode(),
                    expiration: entry.expiration(),
                    value,
                }),
                Ok(None) => None,
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping unencodable cache entry");
                    None
                }
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            saved_at,
            entries,
        }
    }

    /// Decode back into store entries, in file order. Corrupt entries are
    /// logged and dropped.
    pub fn into_entries(self) -> Vec<(CacheKey, CacheEntry)> {
        self.entries
            .into_iter()
            .filter_map(|stored| {
                let decoded = CacheKey::decode(&stored.key)
                    .and_then(|key| Ok((key, stored.value.restore(stored.expiration)?)));
                match decoded {
                    Ok(pair) => Some(pair),
                    Err(e) => {
                        warn!(key = %stored.key, error = %e, "Dropping corrupt snapshot entry");
                        None
                    }
                }
            })
            .collect()
    }

    /// `Ok(None)` when no snapshot exists yet.
    pub fn read(path: &Path) -> Result<Option<Self>, DomainError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Self = serde_json::from_slice(&bytes)
            .map_err(|e| persistence_error(&path.display().to_string(), e))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DomainError::Persistence(format!(
                "{}: unsupported snapshot version {}",
                path.display(),
                snapshot.version
            )));
        }

        Ok(Some(snapshot))
    }

    /// Write to a sibling temp file, then rename over `path`.
    pub fn write_atomic(&self, path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)
                .map_err(|e| persistence_error("serialize snapshot", e))?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
