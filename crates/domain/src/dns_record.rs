mod record;
mod record_type;

pub use record::{DnsRecord, RecordClass, RecordData, HOSTS_TTL};
pub use record_type::RecordType;
