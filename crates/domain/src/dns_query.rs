use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// A single question as received from a client.
///
/// `domain` keeps the name exactly as it appeared on the wire (usually
/// fully qualified with a trailing dot); use [`DnsQuery::host`] or
/// [`DnsQuery::normalized_host`] for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    /// Query name without the trailing root label.
    pub fn host(&self) -> &str {
        self.domain.trim_end_matches('.')
    }

    /// Lower-cased [`DnsQuery::host`], the key form used by hosts tables.
    pub fn normalized_host(&self) -> String {
        self.host().to_ascii_lowercase()
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IN {}", self.domain, self.record_type)
    }
}
