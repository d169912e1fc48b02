use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Read-only hosts-file layer placed in front of the dynamic cache.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_hosts_path")]
    pub path: PathBuf,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_hosts_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_hosts_path() -> PathBuf {
    PathBuf::from("/etc/hosts")
}
