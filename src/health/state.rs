//! Per-service health record.
//!
//! # State Transitions
//! ```text
//! Healthy → Unhealthy: consecutive failures >= threshold
//! Unhealthy → Healthy: one successful primary call, or a manual reset
//! ```
//!
//! There is no half-open probe and no time-based recovery: while unhealthy,
//! primaries are skipped, so only a reset brings the service back.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Consecutive-failure tracker for one external service.
#[derive(Debug, Default)]
pub struct ServiceHealth {
    consecutive_failures: AtomicU32,
    /// Epoch millis, 0 when never observed.
    last_failure_ms: AtomicI64,
    last_success_ms: AtomicI64,
}

/// Point-in-time view of a [`ServiceHealth`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub healthy: bool,
    pub consecutive_failures: u32,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
}

impl ServiceHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    pub fn is_healthy(&self, threshold: u32) -> bool {
        self.consecutive_failures() < threshold
    }

    /// Record a failure; returns the new consecutive count.
    pub fn mark_failure(&self) -> u32 {
        self.last_failure_ms.store(Utc::now().timestamp_millis(), Ordering::Relaxed);
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed).saturating_add(1)
    }

    /// Record a success; returns the count that was cleared.
    pub fn mark_success(&self) -> u32 {
        self.last_success_ms.store(Utc::now().timestamp_millis(), Ordering::Relaxed);
        self.consecutive_failures.swap(0, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self, threshold: u32) -> HealthSnapshot {
        let failures = self.consecutive_failures();
        HealthSnapshot {
            healthy: failures < threshold,
            consecutive_failures: failures,
            last_failure: to_datetime(self.last_failure_ms.load(Ordering::Relaxed)),
            last_success: to_datetime(self.last_success_ms.load(Ordering::Relaxed)),
        }
    }
}

fn to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        return None;
    }
    Utc.timestamp_millis_opt(millis).single()
}
