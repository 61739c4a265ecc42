use anyhow::Context;
use ipnetwork::Ipv4Network;
use sluice_dns_application::pipeline::PipelineBuilder;
use sluice_dns_application::ports::{DnsHandler, HostsLookup};
use sluice_dns_application::use_cases::HandleDnsQueryUseCase;
use sluice_dns_domain::{Config, DnsConfig, DnsMode};
use sluice_dns_infrastructure::dns::hosts::forward_trie_from_pairs;
use sluice_dns_infrastructure::dns::{
    load_system_hosts, DnsRequestHandler, DomainTrie, FakeIpPool, LruMappingCache,
    UpstreamResolver,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct DnsServices {
    pub handler: DnsRequestHandler,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let dns = &config.dns;
        info!(mode = %dns.enhanced_mode, ipv6 = dns.ipv6, "Initializing DNS services");

        let resolver = Self::build_resolver(dns)?;
        let mut builder = PipelineBuilder::new(resolver)
            .with_ipv6(dns.ipv6)
            .with_mode(dns.enhanced_mode);

        if let Some(local) = Self::build_local_hosts(dns)? {
            builder = builder.with_local_hosts(local);
        }

        if dns.use_system_hosts {
            match load_system_hosts() {
                Some(hosts) if !hosts.is_empty() => {
                    info!(entries = hosts.len(), "System hosts loaded");
                    builder = builder.with_hosts(Arc::new(hosts));
                }
                _ => info!("No system hosts entries"),
            }
        }

        if dns.enhanced_mode == DnsMode::FakeIp {
            builder = builder.with_fake_ip_pool(Arc::new(Self::build_fake_ip_pool(dns)?));
        }

        if dns.enhanced_mode != DnsMode::Normal {
            info!(capacity = dns.mapping_cache_size, "Mapping cache enabled");
            builder = builder.with_mapping(Arc::new(LruMappingCache::new(dns.mapping_cache_size)));
        }

        let pipeline: Arc<dyn DnsHandler> = Arc::new(builder.build()?);
        let handler = DnsRequestHandler::new(Arc::new(HandleDnsQueryUseCase::new(pipeline)));

        info!("DNS services initialized successfully");
        Ok(Self { handler })
    }

    fn build_resolver(dns: &DnsConfig) -> anyhow::Result<Arc<UpstreamResolver>> {
        let servers = dns.upstream_addrs()?;
        Ok(Arc::new(UpstreamResolver::new(
            servers,
            Duration::from_secs(dns.query_timeout),
        )))
    }

    fn build_local_hosts(dns: &DnsConfig) -> anyhow::Result<Option<Arc<dyn HostsLookup>>> {
        if dns.hosts.is_empty() {
            return Ok(None);
        }
        let trie = forward_trie_from_pairs(dns.parsed_hosts()?);
        info!(entries = trie.len(), "Configured hosts loaded");
        let hosts: Arc<dyn HostsLookup> = Arc::new(trie);
        Ok(Some(hosts))
    }

    fn build_fake_ip_pool(dns: &DnsConfig) -> anyhow::Result<FakeIpPool> {
        let range: Ipv4Network = dns
            .fake_ip_range
            .parse()
            .with_context(|| format!("Invalid fake_ip_range '{}'", dns.fake_ip_range))?;

        let filter = if dns.fake_ip_filter.is_empty() {
            None
        } else {
            let mut trie = DomainTrie::new();
            for pattern in &dns.fake_ip_filter {
                if let Err(e) = trie.insert(pattern, ()) {
                    warn!(pattern = %pattern, error = %e, "Skipping fake-ip filter entry");
                }
            }
            info!(patterns = trie.len(), "Fake-ip filter loaded");
            Some(trie)
        };

        Ok(FakeIpPool::new(range, filter)?)
    }
}
