mod dns_handler;
mod dns_resolver;
mod fake_ip_pool;
mod hosts_lookup;
mod mapping_store;

pub use dns_handler::DnsHandler;
pub use dns_resolver::DnsResolver;
pub use fake_ip_pool::FakeIpAllocator;
pub use hosts_lookup::HostsLookup;
pub use mapping_store::MappingStore;

// Re-export for convenience
pub use sluice_dns_domain::{DnsAnswer, DnsQuery, QueryContext};
