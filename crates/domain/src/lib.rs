//! dnscache domain layer
//!
//! Pure types shared by every layer: resolution keys, cached entries,
//! the resolution failure taxonomy and configuration.
pub mod cache_entry;
pub mod cache_key;
pub mod config;
pub mod dns_answer;
pub mod dns_query;
pub mod errors;
pub mod failure;
pub mod ttl;

pub use cache_entry::{CacheEntry, NegativeAnswer};
pub use cache_key::CacheKey;
pub use config::{Config, ConfigError};
pub use dns_answer::DnsAnswer;
pub use dns_query::DnsQuery;
pub use errors::DomainError;
pub use failure::{DnsFailure, FailureKind, NxDomainContext};
