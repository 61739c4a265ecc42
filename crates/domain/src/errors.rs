use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Invalid fake-ip range: {0}")]
    InvalidFakeIpRange(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport error from {server}: {message}")]
    TransportError { server: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}

impl DomainError {
    pub fn from_io(server: impl Into<String>, error: &std::io::Error) -> Self {
        let server = server.into();
        match error.kind() {
            std::io::ErrorKind::TimedOut => Self::TransportTimeout { server },
            std::io::ErrorKind::ConnectionRefused => Self::TransportConnectionRefused { server },
            std::io::ErrorKind::ConnectionReset => Self::TransportConnectionReset { server },
            _ => Self::TransportError {
                server,
                message: error.to_string(),
            },
        }
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::QueryTimeout
                | Self::TransportTimeout { .. }
                | Self::TransportConnectionRefused { .. }
                | Self::TransportConnectionReset { .. }
                | Self::TransportError { .. }
                | Self::TransportAllServersUnreachable
        )
    }
}
