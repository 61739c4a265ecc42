mod helpers;

use helpers::{DeterministicFakePool, RecordingMappingStore};
use sluice_dns_application::ports::{FakeIpAllocator, MappingStore};
use sluice_dns_application::use_cases::FindHostByIpUseCase;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn test_normal_mode_always_misses() {
    let use_case = FindHostByIpUseCase::new();
    assert_eq!(use_case.execute(ip("198.18.0.2")), None);
    assert!(!use_case.is_fake_ip(ip("198.18.0.2")));
}

#[test]
fn test_fake_address_resolved_from_pool() {
    let pool = Arc::new(DeterministicFakePool::new());
    let allocated = pool.lookup("example.com");
    let store = Arc::new(RecordingMappingStore::new());

    let use_case = FindHostByIpUseCase::new()
        .with_fake_ip_pool(pool)
        .with_mapping(store);

    assert!(use_case.is_fake_ip(IpAddr::V4(allocated)));
    assert_eq!(
        use_case.execute(IpAddr::V4(allocated)),
        Some("example.com".to_string())
    );
}

#[test]
fn test_v4_mapped_input_is_looked_up_as_ipv4() {
    let pool = Arc::new(DeterministicFakePool::new());
    let allocated = pool.lookup("example.com");
    let store = Arc::new(RecordingMappingStore::new());
    store.set_with_expiry(
        ip("203.0.113.9"),
        "real.example",
        Instant::now() + Duration::from_secs(60),
    );

    let use_case = FindHostByIpUseCase::new()
        .with_fake_ip_pool(pool)
        .with_mapping(store);

    let mapped_fake = IpAddr::V6(allocated.to_ipv6_mapped());
    assert!(use_case.is_fake_ip(mapped_fake));
    assert_eq!(use_case.execute(mapped_fake), Some("example.com".to_string()));
    assert_eq!(
        use_case.execute(ip("::ffff:203.0.113.9")),
        Some("real.example".to_string())
    );
}

#[test]
fn test_fake_range_does_not_fall_back_to_mapping() {
    let pool = Arc::new(DeterministicFakePool::new());
    let store = Arc::new(RecordingMappingStore::new());
    store.set_with_expiry(
        ip("198.18.9.9"),
        "stale.example",
        Instant::now() + Duration::from_secs(60),
    );

    let use_case = FindHostByIpUseCase::new()
        .with_fake_ip_pool(pool)
        .with_mapping(store);

    assert_eq!(use_case.execute(ip("198.18.9.9")), None);
}

#[test]
fn test_real_address_resolved_from_mapping() {
    let store = Arc::new(RecordingMappingStore::new());
    store.set_with_expiry(
        ip("2001:db8::7"),
        "v6.example",
        Instant::now() + Duration::from_secs(60),
    );

    let use_case = FindHostByIpUseCase::new()
        .with_fake_ip_pool(Arc::new(DeterministicFakePool::new()))
        .with_mapping(store);

    assert_eq!(
        use_case.execute(ip("2001:db8::7")),
        Some("v6.example".to_string())
    );
    assert!(!use_case.is_fake_ip(ip("2001:db8::7")));
}
