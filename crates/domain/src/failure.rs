use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Every (queried name, response) pair seen while chasing aliases
/// towards a name that does not exist.
#[derive(Debug, Clone, Default)]
pub struct NxDomainContext {
    qnames: Vec<Name>,
    responses: Vec<(Name, Arc<Message>)>,
}

impl NxDomainContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(qname: Name, response: Arc<Message>) -> Self {
        let mut context = Self::new();
        context.push(qname, Some(response));
        context
    }

    pub fn push(&mut self, qname: Name, response: Option<Arc<Message>>) {
        if !self.qnames.contains(&qname) {
            self.qnames.push(qname.clone());
        }
        if let Some(response) = response {
            self.responses.retain(|(name, _)| *name != qname);
            self.responses.push((qname, response));
        }
    }

    pub fn qnames(&self) -> &[Name] {
        &self.qnames
    }

    pub fn responses(&self) -> &[(Name, Arc<Message>)] {
        &self.responses
    }

    pub fn response_for(&self, qname: &Name) -> Option<&Arc<Message>> {
        self.responses
            .iter()
            .find(|(name, _)| name == qname)
            .map(|(_, response)| response)
    }

    /// The name that finally failed to resolve.
    pub fn canonical_name(&self) -> Option<&Name> {
        self.qnames.last()
    }
}

impl fmt::Display for NxDomainContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.qnames.iter().map(|n| n.to_string()).collect();
        if names.len() == 1 {
            write!(f, "{}", names[0])
        } else {
            write!(f, "none of [{}]", names.join(", "))
        }
    }
}

/// Discriminant of a [`DnsFailure`], comparable and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NameNotFound,
    NoAnswer,
    NoNameservers,
    SyntaxError,
    Timeout,
    MetaqueryUnsupported,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameNotFound => "nxdomain",
            Self::NoAnswer => "no_answer",
            Self::NoNameservers => "no_nameservers",
            Self::SyntaxError => "syntax_error",
            Self::Timeout => "timeout",
            Self::MetaqueryUnsupported => "metaquery",
        }
    }
}

/// Resolution failures surfaced to callers, live or replayed from cache.
#[derive(Error, Debug, Clone)]
pub enum DnsFailure {
    #[error("The DNS query name does not exist: {0}")]
    NameNotFound(NxDomainContext),

    #[error("The DNS response does not contain an answer to the question: {name} IN {record_type}")]
    NoAnswer { name: Name, record_type: RecordType },

    #[error("All nameservers failed to answer the query {name}: {}", .errors.join("; "))]
    NoNameservers { name: Name, errors: Vec<String> },

    #[error("Malformed query or response: {0}")]
    SyntaxError(String),

    #[error("The DNS operation timed out after {elapsed_ms} ms: {name}")]
    Timeout { name: Name, elapsed_ms: u64 },

    #[error("DNS metaqueries are not supported: {record_type}")]
    MetaqueryUnsupported { record_type: RecordType },
}

impl DnsFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NameNotFound(_) => FailureKind::NameNotFound,
            Self::NoAnswer { .. } => FailureKind::NoAnswer,
            Self::NoNameservers { .. } => FailureKind::NoNameservers,
            Self::SyntaxError(_) => FailureKind::SyntaxError,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::MetaqueryUnsupported { .. } => FailureKind::MetaqueryUnsupported,
        }
    }

    /// Metaquery rejections are cheap to reproduce and never memoized.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Self::MetaqueryUnsupported { .. })
    }

    pub fn nx_context(&self) -> Option<&NxDomainContext> {
        match self {
            Self::NameNotFound(context) => Some(context),
            _ => None,
        }
    }
}
