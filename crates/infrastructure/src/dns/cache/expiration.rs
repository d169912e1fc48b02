use dnscache_domain::ttl::{MIN_TTL, NO_EXPIRY};
use dnscache_domain::CacheEntry;
use std::fmt::Debug;

/// Lifetime rules a store applies to every entry it accepts.
pub trait ExpirationPolicy: Send + Sync + Debug {
    /// Adjust `entry` before it is stored at instant `now`.
    fn apply(&self, entry: &mut CacheEntry, now: u64);

    /// Local lifetime floor in seconds (0 when none).
    fn min_ttl(&self) -> u64;

    /// Whether the owning store runs the lazy expiry sweep.
    fn sweeps_expired(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str;

    /// Sweep interval when the caller does not configure one.
    fn default_cleaning_interval(&self) -> Option<u64> {
        self.sweeps_expired().then(|| MIN_TTL.max(self.min_ttl()))
    }
}

/// Keep the expiration the upstream answer advertised.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpstreamExpiration;

impl ExpirationPolicy for UpstreamExpiration {
    #[inline]
    fn apply(&self, _entry: &mut CacheEntry, _now: u64) {}

    fn min_ttl(&self) -> u64 {
        0
    }

    fn name(&self) -> &'static str {
        "upstream"
    }
}

/// Every entry survives at least `min_ttl` seconds after insertion.
#[derive(Debug, Clone, Copy)]
pub struct MinExpiration {
    min_ttl: u64,
}

impl MinExpiration {
    pub fn new(min_ttl: u64) -> Self {
        Self { min_ttl }
    }
}

impl Default for MinExpiration {
    fn default() -> Self {
        Self::new(MIN_TTL)
    }
}

impl ExpirationPolicy for MinExpiration {
    #[inline]
    fn apply(&self, entry: &mut CacheEntry, now: u64) {
        entry.raise_expiration(now.saturating_add(self.min_ttl));
    }

    fn min_ttl(&self) -> u64 {
        self.min_ttl
    }

    fn name(&self) -> &'static str {
        "min_ttl"
    }
}

/// Floor of `NO_EXPIRY` seconds and no sweep: entries only leave through
/// an explicit flush or capacity eviction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExpiration;

impl ExpirationPolicy for NoExpiration {
    #[inline]
    fn apply(&self, entry: &mut CacheEntry, now: u64) {
        entry.raise_expiration(now.saturating_add(NO_EXPIRY));
    }

    fn min_ttl(&self) -> u64 {
        NO_EXPIRY
    }

    fn sweeps_expired(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "no_expiry"
    }
}
