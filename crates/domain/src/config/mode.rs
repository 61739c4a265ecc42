use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolver enhancement mode; selects which optional pipeline stages run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DnsMode {
    /// Plain forwarding, no address-to-host bookkeeping.
    #[default]
    Normal,
    /// Synthesize addresses from the fake-ip pool for A queries.
    FakeIp,
    /// Forward normally but record every returned address.
    #[serde(alias = "mapping")]
    RedirHost,
}

impl DnsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsMode::Normal => "normal",
            DnsMode::FakeIp => "fake-ip",
            DnsMode::RedirHost => "redir-host",
        }
    }
}

impl fmt::Display for DnsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
