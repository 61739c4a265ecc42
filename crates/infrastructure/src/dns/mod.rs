pub mod fake_ip_pool;
pub mod forwarding;
pub mod hosts;
pub mod mapping_cache;
pub mod server;
pub mod transport;
pub mod upstream;
pub mod wire_response;

pub use fake_ip_pool::FakeIpPool;
pub use hosts::{load_system_hosts, parse_hosts, DomainTrie};
pub use mapping_cache::LruMappingCache;
pub use server::DnsRequestHandler;
pub use upstream::UpstreamResolver;
