mod find_host_by_ip;
mod handle_dns_query;

pub use find_host_by_ip::FindHostByIpUseCase;
pub use handle_dns_query::{HandleDnsQueryUseCase, QueryOutcome};
