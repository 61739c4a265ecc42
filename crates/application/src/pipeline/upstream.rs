use crate::ports::{DnsHandler, DnsResolver};
use async_trait::async_trait;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DnsType, DomainError, QueryContext, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Terminal stage: the real exchange with the upstream resolver.
pub struct UpstreamResponder {
    resolver: Arc<dyn DnsResolver>,
    ipv6: bool,
}

impl UpstreamResponder {
    pub fn new(resolver: Arc<dyn DnsResolver>, ipv6: bool) -> Self {
        Self { resolver, ipv6 }
    }
}

#[async_trait]
impl DnsHandler for UpstreamResponder {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
    ) -> Result<DnsAnswer, DomainError> {
        ctx.set_type(DnsType::Raw);

        if !self.ipv6 && query.record_type == RecordType::AAAA {
            return Ok(DnsAnswer::empty_success());
        }

        match self.resolver.exchange(query).await {
            Ok(mut answer) => {
                answer.authoritative = true;
                Ok(answer)
            }
            Err(e) => {
                debug!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    error = %e,
                    "Upstream exchange failed"
                );
                Err(e)
            }
        }
    }
}
