use super::DomainTrie;
use sluice_dns_domain::HostRecord;
use std::collections::HashMap;
use std::fmt::Write;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Platform hosts file location.
pub fn hosts_path() -> PathBuf {
    if cfg!(windows) {
        let root = std::env::var("SYSTEMROOT").unwrap_or_else(|_| "C:\\Windows".to_string());
        PathBuf::from(root)
            .join("System32")
            .join("drivers")
            .join("etc")
            .join("hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}

/// Load the system hosts file; `None` if it can't be read.
pub fn load_system_hosts() -> Option<DomainTrie<HostRecord>> {
    let path = hosts_path();
    match load_hosts_file(&path) {
        Ok(trie) => Some(trie),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "System hosts not available");
            None
        }
    }
}

pub fn load_hosts_file(path: &Path) -> io::Result<DomainTrie<HostRecord>> {
    let text = std::fs::read_to_string(path)?;
    let trie = parse_hosts(&text);
    debug!(path = %path.display(), entries = trie.len(), "Loaded hosts file");
    Ok(trie)
}

/// Parse hosts-file text into forward and reverse-lookup entries.
pub fn parse_hosts(text: &str) -> DomainTrie<HostRecord> {
    let mut pairs = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        if !line.is_ascii() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(Ok(ip)) = fields.next().map(str::parse::<IpAddr>) else {
            continue;
        };
        pairs.extend(fields.map(|name| (name.to_string(), ip)));
    }

    trie_from_pairs(pairs)
}

/// Build a hosts trie from `(name, address)` pairs, adding the
/// reverse-lookup entry of every address.
///
/// Addresses for one name keep their input order. Names the trie rejects
/// are skipped with a warning. Wildcard names get no reverse entry.
pub fn trie_from_pairs<I>(pairs: I) -> DomainTrie<HostRecord>
where
    I: IntoIterator<Item = (String, IpAddr)>,
{
    build_trie(pairs, true)
}

/// Forward-only variant for the configured `hosts` table.
pub fn forward_trie_from_pairs<I>(pairs: I) -> DomainTrie<HostRecord>
where
    I: IntoIterator<Item = (String, IpAddr)>,
{
    build_trie(pairs, false)
}

fn build_trie<I>(pairs: I, with_reverse: bool) -> DomainTrie<HostRecord>
where
    I: IntoIterator<Item = (String, IpAddr)>,
{
    let mut forward: HashMap<String, Vec<IpAddr>> = HashMap::new();
    let mut reverse: HashMap<String, Vec<Arc<str>>> = HashMap::new();

    for (name, ip) in pairs {
        let name = name.to_ascii_lowercase();
        if with_reverse && !is_wildcard(&name) {
            reverse
                .entry(ip_to_ptr(ip))
                .or_default()
                .push(Arc::from(format!("{name}.")));
        }
        forward.entry(name).or_default().push(ip);
    }

    let mut trie = DomainTrie::new();
    for (name, addrs) in forward {
        if let Err(e) = trie.insert(&name, HostRecord::Addresses(addrs)) {
            warn!(name = %name, error = %e, "Skipping hosts entry");
        }
    }
    for (ptr, names) in reverse {
        if let Err(e) = trie.insert(&ptr, HostRecord::Pointers(names)) {
            warn!(name = %ptr, error = %e, "Skipping reverse hosts entry");
        }
    }
    trie
}

fn is_wildcard(name: &str) -> bool {
    name.split('.').any(|label| label == "*" || label == "+")
}

pub fn ip_to_ptr(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa")
        }
        IpAddr::V6(v6) => {
            let mut out = String::with_capacity(72);
            for byte in v6.octets().iter().rev() {
                let _ = write!(out, "{:x}.{:x}.", byte & 0x0f, byte >> 4);
            }
            out.push_str("ip6.arpa");
            out
        }
    }
}
