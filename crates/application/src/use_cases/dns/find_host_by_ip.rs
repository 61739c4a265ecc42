use crate::ports::{FakeIpAllocator, MappingStore};
use std::net::IpAddr;
use std::sync::Arc;

/// Maps an address seen in proxied traffic back to the hostname that
/// produced it.
///
/// Built with neither collaborator in normal mode, in which case every
/// lookup misses.
#[derive(Default)]
pub struct FindHostByIpUseCase {
    fake_ip_pool: Option<Arc<dyn FakeIpAllocator>>,
    mapping: Option<Arc<dyn MappingStore>>,
}

impl FindHostByIpUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fake_ip_pool(mut self, pool: Arc<dyn FakeIpAllocator>) -> Self {
        self.fake_ip_pool = Some(pool);
        self
    }

    pub fn with_mapping(mut self, store: Arc<dyn MappingStore>) -> Self {
        self.mapping = Some(store);
        self
    }

    pub fn is_fake_ip(&self, ip: IpAddr) -> bool {
        match (ip.to_canonical(), &self.fake_ip_pool) {
            (IpAddr::V4(v4), Some(pool)) => pool.is_fake_ip(v4),
            _ => false,
        }
    }

    /// IPv4-mapped IPv6 input is looked up as IPv4.
    pub fn execute(&self, ip: IpAddr) -> Option<String> {
        let ip = ip.to_canonical();
        if let (IpAddr::V4(v4), Some(pool)) = (ip, &self.fake_ip_pool) {
            if pool.is_fake_ip(v4) {
                return pool.lookback(v4);
            }
        }

        self.mapping.as_ref().and_then(|store| store.get(ip))
    }
}
