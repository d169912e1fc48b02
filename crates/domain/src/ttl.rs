//! Lifetime constants, all in seconds.

pub const FIVE_MINS: u64 = 60 * 5;
pub const TEN_MINS: u64 = 60 * 10;
pub const SECONDS_PER_DAY: u64 = 60 * 60 * 24;
pub const SECONDS_PER_WEEK: u64 = SECONDS_PER_DAY * 7;
pub const SECONDS_PER_YEAR: u64 = SECONDS_PER_DAY * 365;

/// Floor used by the no-expiry policy.
pub const NO_EXPIRY: u64 = SECONDS_PER_WEEK;

/// Default local cache lifetime floor.
pub const MIN_TTL: u64 = FIVE_MINS;
