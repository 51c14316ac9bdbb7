//! JSON envelopes returned by every gateway endpoint.
//!
//! ```text
//! { "success": false, "error": { "code", "message", "category", ... } }
//! { "success": true,  "message", "data", "timestamp", "requestId" }
//! ```

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Severity;
use crate::http::mappings::ErrorCategory;

/// RFC 3339 UTC timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Degraded-mode hint carried on external-service errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackHint {
    pub action: String,
    pub message: String,
}

/// One failed form rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub recovery: String,
    pub retryable: bool,
    pub timestamp: String,
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<FieldError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope<T = Value> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub timestamp: String,
    pub request_id: String,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(message: impl Into<String>, data: T, request_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            timestamp: timestamp_now(),
            request_id: request_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_skips_absent_optionals() {
        let envelope = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: "NETWORK_ERROR".into(),
                message: "Erro de conexão de rede.".into(),
                category: ErrorCategory::Network,
                severity: Severity::High,
                recovery: "Verifique sua conexão com a internet e tente novamente.".into(),
                retryable: true,
                timestamp: timestamp_now(),
                request_id: "req-1".into(),
                field: None,
                validation_errors: None,
                retry_after: None,
                fallback: None,
                aria_label: None,
                context: None,
            },
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"]["category"], json!("network"));
        assert_eq!(value["error"]["requestId"], json!("req-1"));
        assert!(value["error"].get("retryAfter").is_none());
        assert!(value["error"].get("validationErrors").is_none());
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = SuccessEnvelope::new("ok", json!({"id": 1}), "req-2");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"]["id"], json!(1));
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
