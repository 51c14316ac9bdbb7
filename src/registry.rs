//! Process-local resilience state.
//!
//! Everything that outlives a single request (health records, content cache,
//! rate-limit buckets) hangs off one explicitly constructed registry, so each
//! server or test owns an isolated instance.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::GatewayConfig;
use crate::fallback::{ContentCache, FallbackManager};
use crate::health::HealthRegistry;
use crate::security::rate_limit::RateLimiter;

/// How often expired cache entries and refilled rate-limit buckets are dropped.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ResilienceRegistry {
    pub health: Arc<HealthRegistry>,
    pub cache: ContentCache,
    pub rate_limiter: Arc<RateLimiter>,
}

impl ResilienceRegistry {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            health: Arc::new(HealthRegistry::new(config.fallback.unhealthy_threshold)),
            cache: ContentCache::new(
                Duration::from_secs(config.fallback.cache_ttl_secs),
                config.fallback.cache_enabled,
            ),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit.requests_per_second,
                config.rate_limit.burst_size,
            )),
        }
    }

    /// Drop expired cache entries and idle rate-limit buckets.
    pub fn sweep(&self) {
        let expired = self.cache.purge_expired();
        let idle = self.rate_limiter.sweep_full();
        if expired > 0 || idle > 0 {
            tracing::debug!(expired, idle_clients = idle, "Registry sweep");
        }
    }

    /// Run [`ResilienceRegistry::sweep`] every `period` until `shutdown` fires.
    pub fn spawn_sweeper(&self, period: Duration, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => registry.sweep(),
                    _ = shutdown.recv() => {
                        tracing::debug!("Registry sweeper stopping");
                        break;
                    }
                }
            }
        })
    }

    /// Fallback manager sharing this registry's health records and cache.
    pub fn fallback_manager(&self, config: &GatewayConfig) -> FallbackManager {
        FallbackManager::new(
            self.health.clone(),
            self.cache.clone(),
            config.clinic.clone(),
            Duration::from_millis(config.fallback.operation_timeout_ms),
        )
    }
}

impl Default for ResilienceRegistry {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}
