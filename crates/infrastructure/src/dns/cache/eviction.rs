use super::backend::{LruBackend, MemoryBackend};
use dnscache_application::ports::CacheBackend;
use std::num::NonZeroUsize;

/// Capacity policy of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionStrategy {
    /// Grow without bound; entries leave by expiry or flush
    #[default]
    Unbounded,
    /// Least Recently Used, bounded to `max_size` entries
    LRU { max_size: NonZeroUsize },
}

impl EvictionStrategy {
    /// `None` or zero means unbounded.
    pub fn from_max_size(max_size: Option<usize>) -> Self {
        match max_size.and_then(NonZeroUsize::new) {
            Some(max_size) => Self::LRU { max_size },
            None => Self::Unbounded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unbounded => "unbounded",
            Self::LRU { .. } => "lru",
        }
    }

    pub fn max_size(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::LRU { max_size } => Some(max_size.get()),
        }
    }

    pub fn build_backend(&self) -> Box<dyn CacheBackend> {
        match self {
            Self::Unbounded => Box::new(MemoryBackend::new()),
            Self::LRU { max_size } => Box::new(LruBackend::new(*max_size)),
        }
    }
}
