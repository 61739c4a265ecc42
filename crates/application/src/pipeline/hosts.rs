use super::{DnsMiddleware, Next};
use crate::ports::HostsLookup;
use async_trait::async_trait;
use sluice_dns_domain::{
    DnsAnswer, DnsQuery, DnsRecord, DnsType, DomainError, HostRecord, QueryContext, RecordType,
    HOSTS_TTL,
};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Answers A/AAAA/PTR queries from a static hosts table.
pub struct HostsMiddleware {
    label: &'static str,
    hosts: Arc<dyn HostsLookup>,
}

impl HostsMiddleware {
    pub fn new(label: &'static str, hosts: Arc<dyn HostsLookup>) -> Self {
        Self { label, hosts }
    }
}

#[async_trait]
impl DnsMiddleware for HostsMiddleware {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
        next: Next<'_>,
    ) -> Result<DnsAnswer, DomainError> {
        if !query.record_type.is_ip_or_ptr() {
            return next.run(ctx, query).await;
        }

        let host = query.normalized_host();
        let answers = match self.hosts.search(&host) {
            None => return next.run(ctx, query).await,
            Some(HostRecord::Addresses(addrs)) => address_records(query, addrs),
            Some(HostRecord::Pointers(names)) => {
                // A pointer entry hides the name from every other resolver.
                if query.record_type != RecordType::PTR {
                    return Ok(DnsAnswer::empty_success());
                }
                names
                    .iter()
                    .map(|target| {
                        DnsRecord::ptr(Arc::clone(&query.domain), Arc::clone(target), HOSTS_TTL)
                    })
                    .collect()
            }
        };

        if answers.is_empty() {
            return next.run(ctx, query).await;
        }

        debug!(
            stage = self.label,
            domain = %host,
            record_type = %query.record_type,
            count = answers.len(),
            "Answered from hosts table"
        );
        ctx.set_type(DnsType::Host);
        Ok(DnsAnswer::success(answers))
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

fn address_records(query: &DnsQuery, addrs: &[IpAddr]) -> Vec<DnsRecord> {
    let name = &query.domain;
    match query.record_type {
        RecordType::A => addrs
            .iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(*v4),
                IpAddr::V6(v6) => v6.to_ipv4_mapped(),
            })
            .map(|v4| DnsRecord::a(Arc::clone(name), v4, HOSTS_TTL))
            .collect(),
        RecordType::AAAA => addrs
            .iter()
            .map(|ip| match ip {
                IpAddr::V4(v4) => v4.to_ipv6_mapped(),
                IpAddr::V6(v6) => *v6,
            })
            .map(|v6| DnsRecord::aaaa(Arc::clone(name), v6, HOSTS_TTL))
            .collect(),
        _ => Vec::new(),
    }
}
