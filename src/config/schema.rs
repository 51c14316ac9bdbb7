//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML and default
//! every field, so a partial file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Request and upstream deadlines.
    pub timeouts: TimeoutConfig,

    /// Default retry tier.
    pub retries: RetryConfig,

    /// Fallback manager settings (health threshold, content cache).
    pub fallback: FallbackConfig,

    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,

    /// External collaborators.
    pub upstreams: UpstreamsConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Admin API.
    pub admin: AdminConfig,

    /// Contact details used in degraded responses.
    pub clinic: ClinicConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request deadline enforced by the HTTP layer.
    pub request_secs: u64,

    /// Connect timeout for upstream calls.
    pub connect_secs: u64,

    /// Per-attempt upstream request timeout.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            connect_secs: 5,
            upstream_secs: 10,
        }
    }
}

/// Default retry tier. Per-error tiers are fixed in code.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries for upstream calls.
    pub enabled: bool,

    /// Attempts including the first one.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay_ms: u64,

    /// Cap applied to every delay.
    pub max_delay_ms: u64,

    /// Exponential growth factor.
    pub backoff_factor: f64,

    /// Upper jitter bound as a fraction of the delay.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_factor: 2.0,
            jitter_factor: 0.1,
        }
    }
}

/// Fallback manager configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Consecutive failures before a strategy is treated as down.
    pub unhealthy_threshold: u32,

    /// Deadline for a primary operation, retries included. Must exceed
    /// `retries.max_attempts` × `timeouts.upstream_secs`.
    pub operation_timeout_ms: u64,

    /// Keep successful CMS payloads for fallback use.
    pub cache_enabled: bool,

    /// Content cache entry lifetime.
    pub cache_ttl_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            unhealthy_threshold: 3,
            operation_timeout_ms: 45_000,
            cache_enabled: true,
            cache_ttl_secs: 300,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting on `/api` routes.
    pub enabled: bool,

    /// Sustained requests per second per client IP.
    pub requests_per_second: u32,

    /// Burst capacity per client IP.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 5,
            burst_size: 20,
        }
    }
}

/// Upstream base URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Transactional email API (POST `{email_url}`).
    pub email_url: String,

    /// Bearer token for the email API, if required.
    pub email_api_key: Option<String>,

    /// WordPress REST base (GET `{cms_url}/{content_type}/{identifier}`).
    pub cms_url: String,

    /// Chat completion endpoint (POST `{chatbot_url}`).
    pub chatbot_url: String,

    /// Bearer token for the chatbot API, if required.
    pub chatbot_api_key: Option<String>,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            email_url: "http://127.0.0.1:9001/emails".to_string(),
            email_api_key: None,
            cms_url: "http://127.0.0.1:9002/wp-json/wp/v2".to_string(),
            chatbot_url: "http://127.0.0.1:9003/chat".to_string(),
            chatbot_api_key: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "clinic_resilience=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    pub enabled: bool,

    /// Bearer key required on every admin request.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: "change-me".to_string(),
        }
    }
}

/// Clinic contact details.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub name: String,
    pub phone: String,
    pub whatsapp_url: String,
    pub address: String,
    pub opening_hours: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            name: "Saraiva Vision".to_string(),
            phone: "(33) 99860-1427".to_string(),
            whatsapp_url: "https://wa.me/5533998601427".to_string(),
            address: "Rua Catarina Maria Passos, 97 - Santa Zita, Caratinga-MG, CEP: 35300-299"
                .to_string(),
            opening_hours: "de segunda a sexta, das 08:00 às 18:00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [fallback]
            unhealthy_threshold = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.fallback.unhealthy_threshold, 5);
        assert_eq!(config.fallback.cache_ttl_secs, 300);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.retries.max_attempts, 3);
    }
}
