// Persistence adapters: lazy loading, read-only layering and snapshots

pub mod deserialize_on_get;
pub mod guard;
pub mod layered;
pub mod persistent;
pub mod snapshot;

pub use deserialize_on_get::DeserializeOnGet;
pub use guard::CacheGuard;
pub use layered::LayeredCache;
pub use persistent::PersistentCache;
pub use snapshot::{SnapshotFile, SNAPSHOT_VERSION};
