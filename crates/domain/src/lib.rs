//! sluice-dns domain layer
pub mod config;
pub mod dns_answer;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod host_record;
pub mod query_context;

pub use config::{CliOverrides, Config, ConfigError, DnsConfig, DnsMode};
pub use dns_answer::{DnsAnswer, ResponseCode};
pub use dns_query::DnsQuery;
pub use dns_record::{DnsRecord, RecordClass, RecordData, RecordType, HOSTS_TTL};
pub use errors::DomainError;
pub use host_record::HostRecord;
pub use query_context::{DnsType, QueryContext};
