use super::{DnsAnswer, DnsFailure};

/// Memoized resolution failure with its own absolute expiration.
#[derive(Debug, Clone)]
pub struct NegativeAnswer {
    pub failure: DnsFailure,
    pub expiration: u64,
}

impl NegativeAnswer {
    pub fn new(failure: DnsFailure, expiration: u64) -> Self {
        Self {
            failure,
            expiration,
        }
    }
}

/// Cached resolution outcome. Every entry carries an absolute expiration
/// in wall-clock seconds; an entry is expired once `expiration <= now`.
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Positive(DnsAnswer),
    Negative(NegativeAnswer),
}

impl CacheEntry {
    #[inline]
    pub fn expiration(&self) -> u64 {
        match self {
            Self::Positive(answer) => answer.expiration,
            Self::Negative(negative) => negative.expiration,
        }
    }

    #[inline]
    pub fn set_expiration(&mut self, expiration: u64) {
        match self {
            Self::Positive(answer) => answer.expiration = expiration,
            Self::Negative(negative) => negative.expiration = expiration,
        }
    }

    /// Raise the expiration to `floor` if it is currently earlier.
    #[inline]
    pub fn raise_expiration(&mut self, floor: u64) {
        if floor > self.expiration() {
            self.set_expiration(floor);
        }
    }

    #[inline]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration() <= now
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Negative(_))
    }

    pub fn as_answer(&self) -> Option<&DnsAnswer> {
        match self {
            Self::Positive(answer) => Some(answer),
            Self::Negative(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&DnsFailure> {
        match self {
            Self::Positive(_) => None,
            Self::Negative(negative) => Some(&negative.failure),
        }
    }
}

impl From<DnsAnswer> for CacheEntry {
    fn from(answer: DnsAnswer) -> Self {
        Self::Positive(answer)
    }
}

impl From<NegativeAnswer> for CacheEntry {
    fn from(negative: NegativeAnswer) -> Self {
        Self::Negative(negative)
    }
}
