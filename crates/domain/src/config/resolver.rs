use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const RESOLV_CONF: &str = "/etc/resolv.conf";
const FALLBACK_NAMESERVER: &str = "8.8.8.8:53";

/// Upstream resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Nameservers as `ip:port`; empty means "read /etc/resolv.conf"
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// Per-server attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Total time budget of one lookup in milliseconds
    #[serde(default = "default_lifetime_ms")]
    pub lifetime_ms: u64,

    /// Fail with NoAnswer when the response lacks the requested type
    #[serde(default = "default_true")]
    pub raise_on_no_answer: bool,
}

impl ResolverConfig {
    /// Parsed nameserver addresses, falling back to resolv.conf and then
    /// to a public resolver.
    pub fn nameserver_addrs(&self) -> Vec<SocketAddr> {
        let configured: Vec<SocketAddr> = self
            .nameservers
            .iter()
            .filter_map(|s| parse_nameserver(s))
            .collect();
        if !configured.is_empty() {
            return configured;
        }

        let from_system = std::fs::read_to_string(RESOLV_CONF)
            .map(|content| parse_resolv_conf(&content))
            .unwrap_or_default();
        if !from_system.is_empty() {
            return from_system;
        }

        FALLBACK_NAMESERVER.parse().into_iter().collect()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            nameservers: Vec::new(),
            timeout_ms: default_timeout_ms(),
            lifetime_ms: default_lifetime_ms(),
            raise_on_no_answer: true,
        }
    }
}

/// Accepts `ip:port`, `[v6]:port` or a bare IP (port 53).
pub fn parse_nameserver(s: &str) -> Option<SocketAddr> {
    s.parse::<SocketAddr>()
        .ok()
        .or_else(|| s.parse::<std::net::IpAddr>().ok().map(|ip| SocketAddr::new(ip, 53)))
}

/// Extract `nameserver` lines from resolv.conf content.
pub fn parse_resolv_conf(content: &str) -> Vec<SocketAddr> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => parse_nameserver(addr),
                _ => None,
            }
        })
        .collect()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_lifetime_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}
