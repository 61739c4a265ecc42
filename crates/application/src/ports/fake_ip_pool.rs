use std::net::Ipv4Addr;

/// Source of stable synthesized addresses.
pub trait FakeIpAllocator: Send + Sync {
    /// Allocate-or-fetch; the same host yields the same address until the
    /// binding is evicted.
    fn lookup(&self, host: &str) -> Ipv4Addr;

    /// Whether `host` is exempt from synthesis.
    fn should_skip(&self, host: &str) -> bool;

    /// Reverse of [`FakeIpAllocator::lookup`] without allocating.
    fn lookback(&self, ip: Ipv4Addr) -> Option<String>;

    fn is_fake_ip(&self, ip: Ipv4Addr) -> bool;
}
