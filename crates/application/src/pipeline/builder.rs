use super::{
    DnsMiddleware, FakeIpMiddleware, HostsMiddleware, MappingMiddleware, Pipeline,
    UpstreamResponder,
};
use crate::ports::{DnsResolver, FakeIpAllocator, HostsLookup, MappingStore};
use sluice_dns_domain::{DnsMode, DomainError};
use std::sync::Arc;
use tracing::info;

/// Assembles the pipeline in its fixed precedence order:
/// local hosts, system hosts, fake-ip, mapping, then upstream.
pub struct PipelineBuilder {
    resolver: Arc<dyn DnsResolver>,
    ipv6: bool,
    mode: DnsMode,
    local_hosts: Option<Arc<dyn HostsLookup>>,
    hosts: Option<Arc<dyn HostsLookup>>,
    fake_ip_pool: Option<Arc<dyn FakeIpAllocator>>,
    mapping: Option<Arc<dyn MappingStore>>,
}

impl PipelineBuilder {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            resolver,
            ipv6: false,
            mode: DnsMode::Normal,
            local_hosts: None,
            hosts: None,
            fake_ip_pool: None,
            mapping: None,
        }
    }

    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = enabled;
        self
    }

    pub fn with_mode(mut self, mode: DnsMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_local_hosts(mut self, hosts: Arc<dyn HostsLookup>) -> Self {
        self.local_hosts = Some(hosts);
        self
    }

    pub fn with_hosts(mut self, hosts: Arc<dyn HostsLookup>) -> Self {
        self.hosts = Some(hosts);
        self
    }

    pub fn with_fake_ip_pool(mut self, pool: Arc<dyn FakeIpAllocator>) -> Self {
        self.fake_ip_pool = Some(pool);
        self
    }

    pub fn with_mapping(mut self, store: Arc<dyn MappingStore>) -> Self {
        self.mapping = Some(store);
        self
    }

    pub fn build(self) -> Result<Pipeline, DomainError> {
        let mut middlewares: Vec<Arc<dyn DnsMiddleware>> = Vec::with_capacity(4);

        if let Some(hosts) = self.local_hosts {
            middlewares.push(Arc::new(HostsMiddleware::new("local-hosts", hosts)));
        }

        if let Some(hosts) = self.hosts {
            middlewares.push(Arc::new(HostsMiddleware::new("hosts", hosts)));
        }

        if self.mode == DnsMode::FakeIp {
            let pool = self.fake_ip_pool.ok_or_else(|| {
                DomainError::ConfigError("fake-ip mode requires a fake-ip pool".to_string())
            })?;
            middlewares.push(Arc::new(FakeIpMiddleware::new(pool)));
        }

        if self.mode != DnsMode::Normal {
            let store = self.mapping.ok_or_else(|| {
                DomainError::ConfigError(format!("{} mode requires a mapping store", self.mode))
            })?;
            middlewares.push(Arc::new(MappingMiddleware::new(store)));
        }

        let endpoint = Arc::new(UpstreamResponder::new(self.resolver, self.ipv6));
        let pipeline = Pipeline::compose(middlewares, endpoint);

        info!(
            mode = %self.mode,
            ipv6 = self.ipv6,
            stages = ?pipeline.stage_names(),
            "DNS pipeline built"
        );

        Ok(pipeline)
    }
}
