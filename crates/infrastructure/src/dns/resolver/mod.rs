//! DNS Resolver module with Decorator Pattern
//!
//! Each decorator adds a specific responsibility:
//!
//! - **Exception caching**: replays memoized failures, memoizes new ones (outermost)
//! - **Aggressive caching**: stores the answer plus every supplementary record set
//! - **Core**: actual network resolution over UDP (innermost)
//!
//! ## Example Usage
//!
//! ```no_run
//! use dnscache_infrastructure::dns::resolver::{CoreResolver, ResolverBuilder};
//! use dnscache_infrastructure::dns::cache::{DnsCache, SystemClock};
//! use dnscache_domain::config::ResolverConfig;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(SystemClock);
//! let upstream = Arc::new(CoreResolver::from_config(&ResolverConfig::default(), clock.clone()));
//! let resolver = ResolverBuilder::new(upstream)
//!     .with_cache(Arc::new(DnsCache::min_expiration(300, clock)))
//!     .aggressive(true)
//!     .build();
//! ```

pub mod aggressive_layer;
pub mod builder;
pub mod core;
pub mod exception_layer;

pub use aggressive_layer::AggressiveCachingResolver;
pub use builder::ResolverBuilder;
pub use core::CoreResolver;
pub use exception_layer::ExceptionCachingResolver;
