//! Process-wide resolver injection point
//!
//! The host application builds a caching resolver once at startup and
//! installs it here; code that needs name resolution asks
//! [`system_resolver`] instead of reaching for the network directly.

use crate::dns::cache::{CacheGuard, DnsCache, LayeredCache, PersistentCache, SystemClock};
use crate::dns::resolver::{CoreResolver, ResolverBuilder};
use crate::system::HostsFileLoader;
use dnscache_application::ports::{CacheStore, Clock, DnsResolver};
use dnscache_domain::{Config, DomainError};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

static SYSTEM_RESOLVER: OnceLock<Arc<dyn DnsResolver>> = OnceLock::new();

/// Set the process-wide resolver. Fails if one is already installed.
pub fn install_resolver(resolver: Arc<dyn DnsResolver>) -> Result<(), DomainError> {
    SYSTEM_RESOLVER
        .set(resolver)
        .map_err(|_| DomainError::InvalidConfig("system resolver already installed".into()))
}

pub fn system_resolver() -> Option<Arc<dyn DnsResolver>> {
    SYSTEM_RESOLVER.get().cloned()
}

/// A caching resolver together with the guard owning its cache.
pub struct CachingStack {
    pub resolver: Arc<dyn DnsResolver>,
    pub guard: CacheGuard,
}

impl CachingStack {
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        self.guard.store()
    }
}

/// Resolver over the configured nameservers with the full cache stack.
pub fn build_default_resolver(config: &Config) -> CachingStack {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let upstream = Arc::new(CoreResolver::from_config(&config.resolver, Arc::clone(&clock)));
    info!(nameservers = ?upstream.nameservers(), "Using upstream nameservers");
    build_resolver_with(config, upstream, clock)
}

/// Cache stack around any upstream: dynamic store (snapshot-backed when
/// configured), hosts layer in front of it, then the caching resolvers.
pub fn build_resolver_with(
    config: &Config,
    upstream: Arc<dyn DnsResolver>,
    clock: Arc<dyn Clock>,
) -> CachingStack {
    let dynamic: Arc<dyn CacheStore> = match &config.persistence.path {
        Some(path) => {
            match PersistentCache::open(DnsCache::from_config(&config.cache, Arc::clone(&clock)), path) {
                Ok(persistent) => Arc::new(persistent.with_clock(Arc::clone(&clock))),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable cache snapshot");
                    Arc::new(DnsCache::from_config(&config.cache, Arc::clone(&clock)))
                }
            }
        }
        None => Arc::new(DnsCache::from_config(&config.cache, Arc::clone(&clock))),
    };

    let store: Arc<dyn CacheStore> = if config.hosts.enabled {
        let hosts = HostsFileLoader::cache(config.hosts.path.clone(), Arc::clone(&clock));
        Arc::new(LayeredCache::new(hosts, dynamic))
    } else {
        dynamic
    };

    let resolver = ResolverBuilder::new(upstream)
        .with_cache(Arc::clone(&store))
        .with_clock(clock)
        .aggressive(config.cache.aggressive)
        .negative_ttl(config.cache.negative_ttl)
        .build();

    CachingStack {
        resolver,
        guard: CacheGuard::new(store),
    }
}

/// Build the default stack, install its resolver process-wide and hand
/// back the guard that flushes the cache.
pub fn install_default_resolver(config: &Config) -> Result<CacheGuard, DomainError> {
    let stack = build_default_resolver(config);
    install_resolver(stack.resolver)?;
    Ok(stack.guard)
}

/// Process termination signals: SIGINT everywhere, SIGTERM on unix.
///
/// Handlers are registered by [`ShutdownSignal::register`], so a signal
/// delivered after registration is never lost to the default action.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next signal and return its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> std::io::Result<&'static str> {
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
            _ = self.terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> std::io::Result<&'static str> {
        tokio::signal::ctrl_c().await.map(|()| "SIGINT")
    }
}

/// Close `guard` once `signal` fires.
pub async fn close_on_signal(
    mut signal: ShutdownSignal,
    guard: CacheGuard,
) -> Result<(), DomainError> {
    let received = signal.recv().await?;
    info!(signal = received, "Shutdown signal received, closing DNS cache");
    guard.close()
}

/// Close `guard` on SIGINT or SIGTERM.
pub async fn close_on_shutdown(guard: CacheGuard) -> Result<(), DomainError> {
    close_on_signal(ShutdownSignal::register()?, guard).await
}
