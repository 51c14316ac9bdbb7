//! Health records for every fallback strategy.

use dashmap::DashMap;
use std::collections::BTreeMap;

use crate::fallback::strategy::FallbackStrategy;
use crate::health::state::{HealthSnapshot, ServiceHealth};
use crate::observability::metrics;

/// Default number of consecutive failures before a service is unhealthy.
pub const DEFAULT_UNHEALTHY_THRESHOLD: u32 = 3;

/// Concurrent map of strategy to health record.
///
/// Counters are advisory; concurrent updates may interleave.
#[derive(Debug)]
pub struct HealthRegistry {
    records: DashMap<FallbackStrategy, ServiceHealth>,
    threshold: u32,
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_UNHEALTHY_THRESHOLD)
    }
}

impl HealthRegistry {
    pub fn new(threshold: u32) -> Self {
        let records = DashMap::new();
        for strategy in FallbackStrategy::ALL {
            records.insert(strategy, ServiceHealth::new());
        }
        Self {
            records,
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    fn with<R>(&self, strategy: FallbackStrategy, f: impl FnOnce(&ServiceHealth) -> R) -> R {
        if let Some(record) = self.records.get(&strategy) {
            return f(record.value());
        }
        f(self.records.entry(strategy).or_default().value())
    }

    pub fn is_healthy(&self, strategy: FallbackStrategy) -> bool {
        self.with(strategy, |r| r.is_healthy(self.threshold))
    }

    pub fn record_success(&self, strategy: FallbackStrategy) {
        let cleared = self.with(strategy, ServiceHealth::mark_success);
        if cleared >= self.threshold {
            tracing::info!(strategy = %strategy, "Service recovered");
        }
        metrics::record_service_health(strategy.as_str(), true);
    }

    /// Count a failure; returns the new consecutive count.
    pub fn record_failure(&self, strategy: FallbackStrategy) -> u32 {
        let failures = self.with(strategy, ServiceHealth::mark_failure);
        if failures == self.threshold {
            tracing::warn!(
                strategy = %strategy,
                consecutive_failures = failures,
                "Service marked unhealthy"
            );
        }
        metrics::record_service_health(strategy.as_str(), failures < self.threshold);
        failures
    }

    pub fn reset(&self, strategy: FallbackStrategy) {
        self.with(strategy, ServiceHealth::reset);
        tracing::info!(strategy = %strategy, "Service health reset");
        metrics::record_service_health(strategy.as_str(), true);
    }

    pub fn snapshot(&self, strategy: FallbackStrategy) -> HealthSnapshot {
        self.with(strategy, |r| r.snapshot(self.threshold))
    }

    pub fn snapshot_all(&self) -> BTreeMap<FallbackStrategy, HealthSnapshot> {
        self.records
            .iter()
            .map(|entry| (*entry.key(), entry.value().snapshot(self.threshold)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_failures_flip_health() {
        let registry = HealthRegistry::default();
        for _ in 0..2 {
            registry.record_failure(FallbackStrategy::EmailService);
        }
        assert!(registry.is_healthy(FallbackStrategy::EmailService));
        registry.record_failure(FallbackStrategy::EmailService);
        assert!(!registry.is_healthy(FallbackStrategy::EmailService));

        // Other strategies are independent.
        assert!(registry.is_healthy(FallbackStrategy::ChatbotAi));
    }

    #[test]
    fn test_reset_and_success_restore() {
        let registry = HealthRegistry::new(2);
        registry.record_failure(FallbackStrategy::Database);
        registry.record_failure(FallbackStrategy::Database);
        assert!(!registry.is_healthy(FallbackStrategy::Database));
        registry.reset(FallbackStrategy::Database);
        assert!(registry.is_healthy(FallbackStrategy::Database));

        registry.record_failure(FallbackStrategy::Database);
        registry.record_failure(FallbackStrategy::Database);
        registry.record_success(FallbackStrategy::Database);
        let snap = registry.snapshot(FallbackStrategy::Database);
        assert!(snap.healthy);
        assert_eq!(snap.consecutive_failures, 0);
    }

    #[test]
    fn test_snapshot_covers_every_strategy() {
        let registry = HealthRegistry::default();
        assert_eq!(registry.snapshot_all().len(), FallbackStrategy::ALL.len());
    }
}
