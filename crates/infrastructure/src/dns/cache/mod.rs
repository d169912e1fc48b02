// Cache module: core store, policies, backends and persistence adapters

pub mod backend;
pub mod clock;
pub mod compaction;
pub mod eviction;
pub mod expiration;
pub mod metrics;
pub mod persistence;
pub mod storage;

pub use backend::{LruBackend, MemoryBackend};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use eviction::EvictionStrategy;
pub use expiration::{ExpirationPolicy, MinExpiration, NoExpiration, UpstreamExpiration};
pub use metrics::CacheMetrics;
pub use persistence::{CacheGuard, DeserializeOnGet, LayeredCache, PersistentCache};
pub use storage::{DnsCache, DnsCacheBuilder};
