use crate::ttl::{MIN_TTL, NO_EXPIRY};
use serde::{Deserialize, Serialize};

/// Cache store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Local lifetime floor in seconds, applied on every insert
    #[serde(default = "default_min_ttl")]
    pub min_ttl: u64,

    /// Keep entries for `NO_EXPIRY` seconds and never sweep them
    #[serde(default)]
    pub no_expiry: bool,

    /// Bound the store and evict least-recently-used entries beyond it
    #[serde(default)]
    pub max_size: Option<usize>,

    /// Seconds between lazy sweeps; defaults to `max(MIN_TTL, min_ttl)`
    #[serde(default)]
    pub cleaning_interval: Option<u64>,

    /// Lifetime of memoized failures other than NXDOMAIN
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u64,

    /// Insert authority/additional records opportunistically
    #[serde(default = "default_true")]
    pub aggressive: bool,
}

impl CacheConfig {
    /// TTL floor actually enforced, taking `no_expiry` into account.
    pub fn effective_min_ttl(&self) -> u64 {
        if self.no_expiry {
            NO_EXPIRY
        } else if self.min_ttl == 0 {
            MIN_TTL
        } else {
            self.min_ttl
        }
    }

    /// Sweep interval, or `None` when sweeping is disabled.
    pub fn effective_cleaning_interval(&self) -> Option<u64> {
        if self.no_expiry {
            return None;
        }
        Some(
            self.cleaning_interval
                .unwrap_or_else(|| MIN_TTL.max(self.effective_min_ttl())),
        )
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            min_ttl: default_min_ttl(),
            no_expiry: false,
            max_size: None,
            cleaning_interval: None,
            negative_ttl: default_negative_ttl(),
            aggressive: true,
        }
    }
}

fn default_min_ttl() -> u64 {
    MIN_TTL
}

fn default_negative_ttl() -> u64 {
    MIN_TTL
}

fn default_true() -> bool {
    true
}
