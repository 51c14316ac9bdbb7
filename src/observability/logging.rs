//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (pretty or JSON)
//! - Emit one structured entry per classified failure
//!
//! The log level comes from `RUST_LOG` when set, otherwise from config.

use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::errors::{ErrorClassification, ErrorCode, ErrorType, Failure, Severity};
use crate::http::envelope::timestamp_now;

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init();
}

/// What gets logged for one classified failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorLogEntry {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub code: ErrorCode,
    pub message: String,
    pub context: Value,
}

/// Log a classified failure at a level derived from its severity.
pub fn log_error(failure: &Failure, classification: &ErrorClassification, context: Value) -> ErrorLogEntry {
    let entry = ErrorLogEntry {
        timestamp: timestamp_now(),
        error_type: classification.error_type,
        code: classification.code,
        message: failure.to_string(),
        context,
    };

    let error_type = entry.error_type.as_str();
    let code = entry.code.as_str();
    match classification.severity {
        Severity::Critical | Severity::High => tracing::error!(
            error_type,
            code,
            retryable = classification.retryable,
            context = %entry.context,
            "{}", entry.message
        ),
        Severity::Medium => tracing::warn!(
            error_type,
            code,
            retryable = classification.retryable,
            context = %entry.context,
            "{}", entry.message
        ),
        Severity::Low => tracing::info!(
            error_type,
            code,
            context = %entry.context,
            "{}", entry.message
        ),
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorClassifier, NetworkKind};
    use serde_json::json;

    #[test]
    fn test_log_entry_carries_classification() {
        let failure = Failure::Network(NetworkKind::Timeout);
        let classification = ErrorClassifier::default().classify(&failure);
        let entry = log_error(&failure, &classification, json!({"attempt": 2}));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], json!("NETWORK"));
        assert_eq!(value["code"], json!("network.timeout"));
        assert_eq!(value["context"]["attempt"], json!(2));
        assert_eq!(entry.message, "network error: timed out");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = ObservabilityConfig::default();
        init_logging(&config);
        init_logging(&config);
    }
}
