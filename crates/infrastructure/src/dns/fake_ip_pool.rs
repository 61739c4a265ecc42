use super::hosts::DomainTrie;
use ipnetwork::Ipv4Network;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use sluice_dns_application::ports::FakeIpAllocator;
use sluice_dns_domain::DomainError;
use std::net::Ipv4Addr;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Upper bound on remembered bindings, independent of range size.
const MAX_BINDINGS: u32 = 65_536;

struct PoolState {
    offset: u32,
    host_to_ip: LruCache<String, Ipv4Addr, FxBuildHasher>,
    ip_to_host: LruCache<Ipv4Addr, String, FxBuildHasher>,
}

impl PoolState {
    /// Bind a host that currently has no address. Whatever `ip` or the
    /// evicted LRU slot was bound to is unbound on both sides.
    fn bind(&mut self, host: String, ip: Ipv4Addr) {
        if let Some((_, old_host)) = self.ip_to_host.push(ip, host.clone()) {
            if old_host != host {
                self.host_to_ip.pop(&old_host);
            }
        }
        if let Some((old_host, old_ip)) = self.host_to_ip.push(host.clone(), ip) {
            if old_host != host && old_ip != ip {
                self.ip_to_host.pop(&old_ip);
            }
        }
    }
}

/// Cycling allocator of synthesized IPv4 addresses.
///
/// The network address, the gateway (first host) and the broadcast
/// address are never handed out. When the cycle reaches an address that is
/// still bound, the old binding is dropped and the address is reused.
pub struct FakeIpPool {
    network: Ipv4Network,
    gateway: Ipv4Addr,
    min: u32,
    size: u32,
    filter: Option<DomainTrie<()>>,
    state: Mutex<PoolState>,
}

impl FakeIpPool {
    pub fn new(network: Ipv4Network, filter: Option<DomainTrie<()>>) -> Result<Self, DomainError> {
        let base = u32::from(network.network());
        let broadcast = u32::from(network.broadcast());
        let gateway = base.saturating_add(1);
        let min = gateway.saturating_add(1);
        let max = broadcast.saturating_sub(1);

        if max < min {
            return Err(DomainError::InvalidFakeIpRange(format!(
                "{} has no usable addresses",
                network
            )));
        }

        let size = max - min + 1;
        let capacity = NonZeroUsize::new(size.min(MAX_BINDINGS) as usize)
            .unwrap_or(NonZeroUsize::MIN);

        info!(
            range = %network,
            gateway = %Ipv4Addr::from(gateway),
            size,
            "Fake-ip pool ready"
        );

        Ok(Self {
            network,
            gateway: Ipv4Addr::from(gateway),
            min,
            size,
            filter,
            state: Mutex::new(PoolState {
                offset: 0,
                host_to_ip: LruCache::with_hasher(capacity, FxBuildHasher),
                ip_to_host: LruCache::with_hasher(capacity, FxBuildHasher),
            }),
        })
    }

    pub fn gateway(&self) -> Ipv4Addr {
        self.gateway
    }

    /// Number of addresses available for allocation.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether `ip` is currently bound to a host.
    pub fn exists(&self, ip: Ipv4Addr) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ip_to_host
            .contains(&ip)
    }
}

impl FakeIpAllocator for FakeIpPool {
    fn lookup(&self, host: &str) -> Ipv4Addr {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(ip) = state.host_to_ip.get(&host).copied() {
            state.ip_to_host.get(&ip);
            return ip;
        }

        let ip = Ipv4Addr::from(self.min + state.offset);
        state.offset = (state.offset + 1) % self.size;

        debug!(host = %host, ip = %ip, "Fake-ip allocated");
        state.bind(host, ip);
        ip
    }

    fn should_skip(&self, host: &str) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.search(host).is_some())
    }

    fn lookback(&self, ip: Ipv4Addr) -> Option<String> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let host = state.ip_to_host.get(&ip).cloned()?;
        state.host_to_ip.get(&host);
        Some(host)
    }

    fn is_fake_ip(&self, ip: Ipv4Addr) -> bool {
        self.network.contains(ip)
    }
}
