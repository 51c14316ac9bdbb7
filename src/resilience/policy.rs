//! Retry policies derived from classifications.
//!
//! # Tiers
//! ```text
//! tier        attempts  base     max      factor  jitter
//! default     3         1000ms   30s      2.0     0.10
//! network     5         2000ms   60s      1.5     0.20
//! api         3         1500ms   45s      2.0     0.15
//! rate_limit  2         60s      300s     2.0     0.10
//! recaptcha   2         3000ms   30s      2.0     0.10
//! ```
//!
//! Message-table hints (`max_retries`, `retry_delay_ms`) override the tier's
//! attempt budget and base delay. Non-retryable codes get a single attempt.

use serde::Serialize;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::errors::{ErrorClassification, ErrorType};
use crate::resilience::backoff::Backoff;

/// Attempt budget and backoff curve for one kind of failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

/// Serializable view of a policy for status and log output.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicySummary {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    fn tier(max_attempts: u32, base_ms: u64, max_ms: u64, factor: f64, jitter: f64) -> Self {
        Self {
            max_attempts,
            backoff: Backoff {
                base: Duration::from_millis(base_ms),
                max: Duration::from_millis(max_ms),
                factor,
                jitter,
            },
        }
    }

    pub fn network() -> Self {
        Self::tier(5, 2_000, 60_000, 1.5, 0.2)
    }

    pub fn api() -> Self {
        Self::tier(3, 1_500, 45_000, 2.0, 0.15)
    }

    pub fn rate_limit() -> Self {
        Self::tier(2, 60_000, 300_000, 2.0, 0.1)
    }

    pub fn recaptcha() -> Self {
        Self::tier(2, 3_000, 30_000, 2.0, 0.1)
    }

    /// Default tier as configured by the operator.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::tier(
            config.max_attempts.max(1),
            config.base_delay_ms,
            config.max_delay_ms,
            config.backoff_factor,
            config.jitter_factor,
        )
    }

    /// Deterministic policy for a classification.
    pub fn for_classification(classification: &ErrorClassification) -> Self {
        let mut policy = match classification.error_type {
            ErrorType::Network => Self::network(),
            ErrorType::RateLimit => Self::rate_limit(),
            ErrorType::Api | ErrorType::EmailService => Self::api(),
            ErrorType::Recaptcha => Self::recaptcha(),
            ErrorType::Validation | ErrorType::Unknown => Self::default(),
        };

        let message = classification.message();
        if !message.retryable {
            policy.max_attempts = 1;
            return policy;
        }
        if let Some(max_retries) = message.max_retries {
            policy.max_attempts = max_retries.max(1);
        }
        if let Some(delay_ms) = message.retry_delay_ms {
            policy.backoff.base = Duration::from_millis(delay_ms);
        }
        if policy.backoff.max < policy.backoff.base {
            policy.backoff.max = policy.backoff.base;
        }
        policy
    }

    pub fn should_retry(&self, classification: &ErrorClassification, attempt: u32) -> bool {
        classification.retryable && attempt < self.max_attempts
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    pub fn summary(&self) -> RetryPolicySummary {
        RetryPolicySummary {
            max_attempts: self.max_attempts,
            base_delay_ms: self.backoff.base.as_millis() as u64,
            max_delay_ms: self.backoff.max.as_millis() as u64,
        }
    }
}
