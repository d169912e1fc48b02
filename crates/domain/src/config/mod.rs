//! Configuration module for dnscache
//!
//! Configuration structures organized by concern:
//! - `root`: Main configuration, loading and validation
//! - `cache`: Cache store policy (TTL floor, size bound, sweeping)
//! - `resolver`: Upstream nameservers and timeouts
//! - `hosts`: Read-only hosts-file layer
//! - `persistence`: Snapshot file for restarts
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cache;
pub mod errors;
pub mod hosts;
pub mod logging;
pub mod persistence;
pub mod resolver;
pub mod root;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use hosts::HostsConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use persistence::PersistenceConfig;
pub use resolver::ResolverConfig;
pub use root::Config;
