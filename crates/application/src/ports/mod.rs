pub mod cache_backend;
pub mod cache_store;
pub mod clock;
pub mod dns_resolver;
pub mod entry_loader;

pub use cache_backend::CacheBackend;
pub use cache_store::{CacheStats, CacheStore, Closeable};
pub use clock::Clock;
pub use dns_resolver::DnsResolver;
pub use entry_loader::{EntryLoader, LoadedEntry};
