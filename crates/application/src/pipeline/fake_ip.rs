use super::{DnsMiddleware, Next};
use crate::ports::FakeIpAllocator;
use async_trait::async_trait;
use sluice_dns_domain::{
    DnsAnswer, DnsQuery, DnsRecord, DnsType, DomainError, QueryContext, RecordType,
};
use std::sync::Arc;
use tracing::debug;

/// TTL of every synthesized answer. Clients must not cache a fake address
/// longer than the proxy can map it back.
pub const FAKE_IP_TTL: u32 = 1;

pub struct FakeIpMiddleware {
    pool: Arc<dyn FakeIpAllocator>,
}

impl FakeIpMiddleware {
    pub fn new(pool: Arc<dyn FakeIpAllocator>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DnsMiddleware for FakeIpMiddleware {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
        next: Next<'_>,
    ) -> Result<DnsAnswer, DomainError> {
        let host = query.host();
        if self.pool.should_skip(host) {
            return next.run(ctx, query).await;
        }

        match query.record_type {
            RecordType::AAAA | RecordType::SVCB | RecordType::HTTPS => {
                return Ok(DnsAnswer::empty_success());
            }
            RecordType::A => {}
            _ => return next.run(ctx, query).await,
        }

        let ip = self.pool.lookup(host);
        debug!(domain = %host, fake_ip = %ip, "Synthesized fake address");

        ctx.set_type(DnsType::FakeIp);
        Ok(DnsAnswer::success(vec![DnsRecord::a(
            Arc::clone(&query.domain),
            ip,
            FAKE_IP_TTL,
        )]))
    }

    fn name(&self) -> &'static str {
        "fake-ip"
    }
}
