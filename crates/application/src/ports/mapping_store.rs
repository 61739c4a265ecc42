use std::net::IpAddr;
use std::time::Instant;

/// Expiring address -> hostname store.
///
/// Implementations must tolerate concurrent callers and must report
/// entries past `expires_at` as absent. Capacity is their concern.
pub trait MappingStore: Send + Sync {
    fn set_with_expiry(&self, ip: IpAddr, host: &str, expires_at: Instant);

    fn get(&self, ip: IpAddr) -> Option<String>;
}
