use std::fmt;

/// Which pipeline stage produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsType {
    Raw,
    Host,
    FakeIp,
}

impl DnsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsType::Raw => "raw",
            DnsType::Host => "host",
            DnsType::FakeIp => "fakeip",
        }
    }
}

impl fmt::Display for DnsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-query side channel shared by every stage of one pipeline run.
#[derive(Debug, Default)]
pub struct QueryContext {
    dns_type: Option<DnsType>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, dns_type: DnsType) {
        self.dns_type = Some(dns_type);
    }

    pub fn dns_type(&self) -> Option<DnsType> {
        self.dns_type
    }
}
