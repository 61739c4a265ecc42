use async_trait::async_trait;
use sluice_dns_application::ports::{DnsResolver, FakeIpAllocator, HostsLookup, MappingStore};
use sluice_dns_domain::{
    DnsAnswer, DnsQuery, DnsRecord, DomainError, HostRecord, RecordType, ResponseCode,
};
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

// ── upstream ────────────────────────────────────────────────────────────────

pub struct MockDnsResolver {
    answers: Mutex<HashMap<String, DnsAnswer>>,
    error: Mutex<Option<DomainError>>,
    queries: Mutex<Vec<DnsQuery>>,
    calls: AtomicUsize,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            error: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_answer(&self, host: &str, answer: DnsAnswer) {
        self.answers
            .lock()
            .unwrap()
            .insert(host.to_string(), answer);
    }

    pub fn set_error(&self, error: DomainError) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<DnsQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn exchange(&self, query: &DnsQuery) -> Result<DnsAnswer, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }

        Ok(self
            .answers
            .lock()
            .unwrap()
            .get(query.host())
            .cloned()
            .unwrap_or_else(|| DnsAnswer {
                response_code: ResponseCode::NXDomain,
                recursion_available: true,
                ..DnsAnswer::default()
            }))
    }
}

/// Non-authoritative upstream answer with one A record.
pub fn upstream_a(name: &str, ip: &str, ttl: u32) -> DnsAnswer {
    DnsAnswer {
        response_code: ResponseCode::NoError,
        authoritative: false,
        recursion_available: true,
        answers: vec![DnsRecord::a(name, ip.parse().unwrap(), ttl)],
        authority: Vec::new(),
    }
}

pub fn upstream_aaaa(name: &str, ip: &str, ttl: u32) -> DnsAnswer {
    DnsAnswer {
        answers: vec![DnsRecord::aaaa(name, ip.parse().unwrap(), ttl)],
        ..upstream_a(name, "0.0.0.0", ttl)
    }
}

// ── hosts ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct StaticHosts {
    records: HashMap<String, HostRecord>,
}

impl StaticHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addresses(mut self, name: &str, addrs: &[&str]) -> Self {
        let addrs = addrs.iter().map(|a| a.parse().unwrap()).collect();
        self.records
            .insert(name.to_string(), HostRecord::Addresses(addrs));
        self
    }

    pub fn with_pointers(mut self, name: &str, targets: &[&str]) -> Self {
        let targets = targets.iter().map(|t| Arc::from(*t)).collect();
        self.records
            .insert(name.to_string(), HostRecord::Pointers(targets));
        self
    }
}

impl HostsLookup for StaticHosts {
    fn search(&self, name: &str) -> Option<&HostRecord> {
        self.records.get(name)
    }
}

// ── mapping ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingMappingStore {
    entries: Mutex<HashMap<IpAddr, (String, Instant)>>,
    writes: AtomicUsize,
}

impl RecordingMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn expiry_of(&self, ip: &str) -> Option<Instant> {
        let ip: IpAddr = ip.parse().unwrap();
        self.entries.lock().unwrap().get(&ip).map(|(_, at)| *at)
    }
}

impl MappingStore for RecordingMappingStore {
    fn set_with_expiry(&self, ip: IpAddr, host: &str, expires_at: Instant) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(ip, (host.to_string(), expires_at));
    }

    fn get(&self, ip: IpAddr) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        match entries.get(&ip) {
            Some((host, expires_at)) if *expires_at > Instant::now() => Some(host.clone()),
            _ => None,
        }
    }
}

// ── fake ip ─────────────────────────────────────────────────────────────────

/// Hands out 198.18.0.2, 198.18.0.3, ... in request order.
pub struct DeterministicFakePool {
    state: Mutex<(u32, HashMap<String, Ipv4Addr>)>,
    skip: HashSet<String>,
    lookups: AtomicUsize,
}

impl DeterministicFakePool {
    pub fn new() -> Self {
        Self {
            state: Mutex::new((u32::from(Ipv4Addr::new(198, 18, 0, 2)), HashMap::new())),
            skip: HashSet::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn skipping(mut self, host: &str) -> Self {
        self.skip.insert(host.to_string());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for DeterministicFakePool {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeIpAllocator for DeterministicFakePool {
    fn lookup(&self, host: &str) -> Ipv4Addr {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(ip) = state.1.get(host) {
            return *ip;
        }
        let ip = Ipv4Addr::from(state.0);
        state.0 += 1;
        state.1.insert(host.to_string(), ip);
        ip
    }

    fn should_skip(&self, host: &str) -> bool {
        self.skip.contains(host)
    }

    fn lookback(&self, ip: Ipv4Addr) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .1
            .iter()
            .find(|(_, v)| **v == ip)
            .map(|(k, _)| k.clone())
    }

    fn is_fake_ip(&self, ip: Ipv4Addr) -> bool {
        ip.octets()[0] == 198 && ip.octets()[1] == 18
    }
}

pub fn query(name: &str, record_type: RecordType) -> DnsQuery {
    DnsQuery::new(name, record_type)
}
