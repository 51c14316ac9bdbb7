//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and upstream URLs
//!
//! Returns every error found, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("admin.api_key: must not be empty when the admin API is enabled")]
    EmptyAdminKey,
}

/// Check a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "upstreams.email_url", &config.upstreams.email_url);
    check_url(&mut errors, "upstreams.cms_url", &config.upstreams.cms_url);
    check_url(&mut errors, "upstreams.chatbot_url", &config.upstreams.chatbot_url);

    let nonzero: [(&'static str, u64); 7] = [
        ("listener.max_body_bytes", config.listener.max_body_bytes as u64),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("retries.max_attempts", config.retries.max_attempts as u64),
        ("retries.base_delay_ms", config.retries.base_delay_ms),
        ("fallback.unhealthy_threshold", config.fallback.unhealthy_threshold as u64),
        ("fallback.operation_timeout_ms", config.fallback.operation_timeout_ms),
    ];
    for (field, value) in nonzero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let retries = &config.retries;
    let attempts = if retries.enabled { retries.max_attempts.max(1) as u64 } else { 1 };
    let attempt_budget_ms = attempts.saturating_mul(config.timeouts.upstream_secs.saturating_mul(1_000));
    if config.fallback.operation_timeout_ms <= attempt_budget_ms {
        errors.push(ValidationError::OutOfRange {
            field: "fallback.operation_timeout_ms",
            reason: format!(
                "must exceed retries.max_attempts x timeouts.upstream_secs ({attempt_budget_ms}ms)"
            ),
        });
    }
    if retries.max_delay_ms < retries.base_delay_ms {
        errors.push(ValidationError::OutOfRange {
            field: "retries.max_delay_ms",
            reason: "must not be below base_delay_ms".to_string(),
        });
    }
    if retries.backoff_factor < 1.0 + retries.jitter_factor {
        errors.push(ValidationError::OutOfRange {
            field: "retries.backoff_factor",
            reason: "must be at least 1.0 + jitter_factor".to_string(),
        });
    }
    if !(retries.jitter_factor > 0.0 && retries.jitter_factor < 1.0) {
        errors.push(ValidationError::OutOfRange {
            field: "retries.jitter_factor",
            reason: "must be within (0, 1)".to_string(),
        });
    }

    if config.rate_limit.enabled
        && (config.rate_limit.requests_per_second == 0 || config.rate_limit.burst_size == 0)
    {
        errors.push(ValidationError::OutOfRange {
            field: "rate_limit",
            reason: "requests_per_second and burst_size must be positive".to_string(),
        });
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::EmptyAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nope".into();
        config.upstreams.cms_url = "ftp://cms".into();
        config.fallback.unhealthy_threshold = 0;
        config.retries.jitter_factor = 0.0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero {
            field: "fallback.unhealthy_threshold"
        }));
    }

    #[test]
    fn test_operation_deadline_must_cover_every_attempt() {
        let mut config = GatewayConfig::default();
        config.timeouts.upstream_secs = 10;
        config.fallback.operation_timeout_ms = 10_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::OutOfRange { field: "fallback.operation_timeout_ms", .. }]
        ));

        config.fallback.operation_timeout_ms = 30_000;
        assert!(validate_config(&config).is_err());

        config.fallback.operation_timeout_ms = 30_001;
        assert_eq!(validate_config(&config), Ok(()));

        config.retries.enabled = false;
        config.fallback.operation_timeout_ms = 10_001;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_backoff_factor_must_outgrow_jitter() {
        let mut config = GatewayConfig::default();
        config.retries.backoff_factor = 1.0;
        config.retries.jitter_factor = 0.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::OutOfRange { field: "retries.backoff_factor", .. }]
        ));

        config.retries.backoff_factor = 1.5;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_empty_admin_key_rejected() {
        let mut config = GatewayConfig::default();
        config.admin.api_key = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyAdminKey]);
    }
}
