pub mod cache;
pub mod forwarding;
pub mod resolver;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub use cache::ManualClock;
pub use cache::{
    CacheGuard, DeserializeOnGet, DnsCache, EvictionStrategy, ExpirationPolicy, LayeredCache,
    PersistentCache, SystemClock,
};
pub use resolver::{
    AggressiveCachingResolver, CoreResolver, ExceptionCachingResolver, ResolverBuilder,
};
