use async_trait::async_trait;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DomainError};

/// Real exchange with the configured upstream resolver(s).
///
/// Retry and failover across several upstreams belong to the
/// implementation, not to its callers.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn exchange(&self, query: &DnsQuery) -> Result<DnsAnswer, DomainError>;
}
