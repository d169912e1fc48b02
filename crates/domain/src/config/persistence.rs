use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot persistence of the dynamic cache across restarts.
///
/// When `path` is unset the cache lives only for the process lifetime.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl PersistenceConfig {
    /// Snapshot file `dns.json` inside `directory`.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(directory.into().join("dns.json")),
        }
    }
}
