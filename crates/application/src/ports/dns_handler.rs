use async_trait::async_trait;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DomainError, QueryContext};

/// Anything that can answer a query: the assembled pipeline, or the
/// terminal responder at its end.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
    ) -> Result<DnsAnswer, DomainError>;
}
