use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};

use super::errors::ConfigError;
use super::mode::DnsMode;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    /// Per-exchange timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    #[serde(default = "default_false")]
    pub ipv6: bool,

    #[serde(default)]
    pub enhanced_mode: DnsMode,

    #[serde(default = "default_fake_ip_range")]
    pub fake_ip_range: String,

    /// Domain patterns that never receive a fake address.
    #[serde(default)]
    pub fake_ip_filter: Vec<String>,

    #[serde(default = "default_true")]
    pub use_system_hosts: bool,

    /// Static name -> address table; `*.` and `+.` wildcards allowed.
    #[serde(default)]
    pub hosts: BTreeMap<String, String>,

    #[serde(default = "default_mapping_cache_size")]
    pub mapping_cache_size: usize,
}

impl DnsConfig {
    /// Parse `upstream_servers`, defaulting the port to 53.
    pub fn upstream_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.upstream_servers
            .iter()
            .map(|server| parse_upstream(server))
            .collect()
    }

    pub fn parsed_hosts(&self) -> Result<Vec<(String, IpAddr)>, ConfigError> {
        self.hosts
            .iter()
            .map(|(name, ip)| {
                ip.parse::<IpAddr>()
                    .map(|addr| (name.clone(), addr))
                    .map_err(|_| {
                        ConfigError::Validation(format!(
                            "Invalid address '{}' for host '{}'",
                            ip, name
                        ))
                    })
            })
            .collect()
    }
}

fn parse_upstream(server: &str) -> Result<SocketAddr, ConfigError> {
    let trimmed = server.trim();
    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let bare = trimmed.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| ConfigError::Validation(format!("Invalid upstream server: {}", server)))
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream_servers: default_upstream_servers(),
            query_timeout: default_query_timeout(),
            ipv6: false,
            enhanced_mode: DnsMode::Normal,
            fake_ip_range: default_fake_ip_range(),
            fake_ip_filter: vec![],
            use_system_hosts: true,
            hosts: BTreeMap::new(),
            mapping_cache_size: default_mapping_cache_size(),
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_query_timeout() -> u64 {
    5
}

fn default_fake_ip_range() -> String {
    "198.18.0.1/16".to_string()
}

fn default_mapping_cache_size() -> usize {
    4096
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}
