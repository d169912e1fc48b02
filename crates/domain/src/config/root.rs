use super::{CacheConfig, ConfigError, HostsConfig, LoggingConfig, PersistenceConfig, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration, one TOML table per concern.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub hosts: HostsConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from a TOML file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_size == Some(0) {
            return Err(ConfigError::Invalid(
                "cache.max_size must be greater than zero".into(),
            ));
        }
        if self.cache.cleaning_interval == Some(0) {
            return Err(ConfigError::Invalid(
                "cache.cleaning_interval must be greater than zero".into(),
            ));
        }
        if self.resolver.timeout_ms == 0 || self.resolver.lifetime_ms == 0 {
            return Err(ConfigError::Invalid(
                "resolver timeouts must be greater than zero".into(),
            ));
        }
        if let Some(bad) = self
            .resolver
            .nameservers
            .iter()
            .find(|s| super::resolver::parse_nameserver(s).is_none())
        {
            return Err(ConfigError::Invalid(format!("invalid nameserver '{}'", bad)));
        }
        Ok(())
    }
}
