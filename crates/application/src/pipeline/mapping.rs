use super::{DnsMiddleware, Next};
use crate::ports::MappingStore;
use async_trait::async_trait;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DomainError, QueryContext};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Records address -> hostname for every A/AAAA record that flows back
/// through the chain. Never alters the answer.
///
/// IPv4-mapped IPv6 addresses are stored under their IPv4 form.
pub struct MappingMiddleware {
    store: Arc<dyn MappingStore>,
}

impl MappingMiddleware {
    pub fn new(store: Arc<dyn MappingStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DnsMiddleware for MappingMiddleware {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
        next: Next<'_>,
    ) -> Result<DnsAnswer, DomainError> {
        let answer = next.run(ctx, query).await?;

        let now = Instant::now();
        let host = query.host();
        for record in &answer.answers {
            if let Some(ip) = record.ip() {
                let expires_at = now + Duration::from_secs(u64::from(record.ttl));
                self.store.set_with_expiry(ip.to_canonical(), host, expires_at);
            }
        }

        Ok(answer)
    }

    fn name(&self) -> &'static str {
        "mapping"
    }
}
