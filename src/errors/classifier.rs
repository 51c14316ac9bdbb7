//! Failure classification.
//!
//! # Data Flow
//! ```text
//! transport error / JSON error body / form rule
//!        │  (boundary adapters: Failure::from_name, Failure::from_json, upstream client)
//!        ▼
//!     Failure ──► ErrorClassifier::classify ──► ErrorClassification
//!                        ▲                         (type, code, severity, retryable, field)
//!                        │
//!                  Connectivity (ambient online/offline signal)
//! ```
//!
//! Classification is total: any input yields a classification, falling back
//! to `UNKNOWN`/`unknown`.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::errors::messages::ErrorMessage;
use crate::errors::taxonomy::{ErrorCode, ErrorType, Severity};

/// reCAPTCHA verifier codes recognised when they arrive without a field.
pub const RECAPTCHA_CODES: [&str; 5] = [
    "missing_token",
    "missing_secret",
    "verification_failed",
    "low_score",
    "network_error",
];

/// Kind of transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    Failed,
    Timeout,
    Dns,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Failed => f.write_str("connection failed"),
            NetworkKind::Timeout => f.write_str("timed out"),
            NetworkKind::Dns => f.write_str("dns resolution failed"),
        }
    }
}

/// A raw failure as observed at a boundary, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("network error: {0}")]
    Network(NetworkKind),

    #[error("api error: {code}")]
    Api { code: String, status: Option<u16> },

    #[error("recaptcha error: {code}")]
    Recaptcha { code: String },

    #[error("validation error on {field}: {code}")]
    Validation { field: String, code: String },

    #[error("{0}")]
    Unknown(String),
}

impl Failure {
    pub fn api(code: impl Into<String>) -> Self {
        Failure::Api { code: code.into(), status: None }
    }

    pub fn validation(field: impl Into<String>, code: impl Into<String>) -> Self {
        Failure::Validation { field: field.into(), code: code.into() }
    }

    /// Adapter for named exceptions (`NetworkError`, `TimeoutError`).
    pub fn from_name(name: &str, message: &str) -> Self {
        match name {
            "NetworkError" => Failure::Network(NetworkKind::Failed),
            "TimeoutError" | "AbortError" => Failure::Network(NetworkKind::Timeout),
            _ => Failure::Unknown(message.to_string()),
        }
    }

    /// Adapter for untyped JSON error objects.
    ///
    /// Shapes are tested in a fixed order: `name`, then an `error` string,
    /// then a `code` matching a reCAPTCHA identifier, then `field` + `code`.
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str);
        let message = text("message").unwrap_or("Unknown error");

        if let Some(name) = text("name") {
            let failure = Failure::from_name(name, message);
            if !matches!(failure, Failure::Unknown(_)) {
                return failure;
            }
        }
        match text("code") {
            Some("NETWORK_ERROR") => return Failure::Network(NetworkKind::Failed),
            Some("TIMEOUT_ERROR") => return Failure::Network(NetworkKind::Timeout),
            _ => {}
        }
        if let Some(code) = text("error") {
            let status = value
                .get("status")
                .and_then(Value::as_u64)
                .and_then(|s| u16::try_from(s).ok());
            return Failure::Api { code: code.to_string(), status };
        }
        if let Some(code) = text("code") {
            if RECAPTCHA_CODES.contains(&code) {
                return Failure::Recaptcha { code: code.to_string() };
            }
            if let Some(field) = text("field") {
                return Failure::validation(field, code);
            }
        }
        if let Some(field) = text("field") {
            return Failure::validation(field, "invalid");
        }
        Failure::Unknown(message.to_string())
    }
}

/// Anything that can be reduced to a [`Failure`] for classification.
pub trait Classify {
    fn failure(&self) -> Failure;
}

impl Classify for Failure {
    fn failure(&self) -> Failure {
        self.clone()
    }
}

/// Ambient connectivity signal.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity source that always reports online.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Switchable connectivity flag.
#[derive(Debug)]
pub struct ConnectivityFlag {
    online: AtomicBool,
}

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self { online: AtomicBool::new(online) }
    }

    pub fn set_online(&self, online: bool) {
        let was = self.online.swap(online, Ordering::Relaxed);
        if was != online {
            tracing::info!(online, "Connectivity changed");
        }
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}

/// Result of classifying a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorClassification {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub code: ErrorCode,
    pub severity: Severity,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorClassification {
    fn new(error_type: ErrorType, code: ErrorCode) -> Self {
        let message = code.message();
        Self {
            error_type,
            code,
            severity: message.severity,
            retryable: message.retryable,
            field: None,
        }
    }

    pub fn message(&self) -> &'static ErrorMessage {
        self.code.message()
    }

    /// Everything except `CRITICAL` is recoverable by the user.
    pub fn is_recoverable(&self) -> bool {
        self.severity != Severity::Critical
    }
}

/// Maps failures to classifications.
#[derive(Clone)]
pub struct ErrorClassifier {
    connectivity: Arc<dyn Connectivity>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(Arc::new(AlwaysOnline))
    }
}

impl fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("online", &self.connectivity.is_online())
            .finish()
    }
}

impl ErrorClassifier {
    pub fn new(connectivity: Arc<dyn Connectivity>) -> Self {
        Self { connectivity }
    }

    pub fn classify(&self, failure: &Failure) -> ErrorClassification {
        if let Failure::Network(kind) = failure {
            return classify_network(*kind);
        }

        if !self.connectivity.is_online() {
            return ErrorClassification::new(ErrorType::Network, ErrorCode::NetworkOffline);
        }

        match failure {
            Failure::Network(kind) => classify_network(*kind),
            Failure::Api { code, status } => classify_api(code, *status),
            Failure::Recaptcha { code } => match code.as_str() {
                "missing_token" => {
                    ErrorClassification::new(ErrorType::Recaptcha, ErrorCode::RecaptchaMissingToken)
                }
                "missing_secret" => {
                    ErrorClassification::new(ErrorType::Recaptcha, ErrorCode::RecaptchaMissingSecret)
                }
                "verification_failed" => ErrorClassification::new(
                    ErrorType::Recaptcha,
                    ErrorCode::RecaptchaVerificationFailed,
                ),
                "low_score" => {
                    ErrorClassification::new(ErrorType::Recaptcha, ErrorCode::RecaptchaLowScore)
                }
                "network_error" => {
                    ErrorClassification::new(ErrorType::Recaptcha, ErrorCode::RecaptchaNetworkError)
                }
                _ => ErrorClassification::new(ErrorType::Unknown, ErrorCode::Unknown),
            },
            Failure::Validation { field, code } => {
                let mut classification =
                    ErrorClassification::new(ErrorType::Validation, ErrorCode::validation(code));
                classification.field = Some(field.clone());
                classification
            }
            Failure::Unknown(_) => ErrorClassification::new(ErrorType::Unknown, ErrorCode::Unknown),
        }
    }
}

fn classify_network(kind: NetworkKind) -> ErrorClassification {
    let code = match kind {
        NetworkKind::Failed => ErrorCode::NetworkFailed,
        NetworkKind::Timeout => ErrorCode::NetworkTimeout,
        NetworkKind::Dns => ErrorCode::NetworkDnsError,
    };
    ErrorClassification::new(ErrorType::Network, code)
}

fn classify_api(code: &str, status: Option<u16>) -> ErrorClassification {
    let (error_type, code) = match code {
        "missing_token" => (ErrorType::Api, ErrorCode::ApiMissingToken),
        "recaptcha_failed" => (ErrorType::Recaptcha, ErrorCode::ApiRecaptchaFailed),
        "missing_required_fields" => (ErrorType::Api, ErrorCode::ApiMissingRequiredFields),
        "rate_limited" => (ErrorType::RateLimit, ErrorCode::ApiRateLimited),
        "email_service_error" => (ErrorType::EmailService, ErrorCode::ApiEmailServiceError),
        "server_error" => (ErrorType::Api, ErrorCode::ApiServerError),
        "service_unavailable" => (ErrorType::Api, ErrorCode::ApiServiceUnavailable),
        "email_service_unavailable" => (ErrorType::EmailService, ErrorCode::EmailServiceUnavailable),
        "email_send_failed" => (ErrorType::EmailService, ErrorCode::EmailSendFailed),
        "email_template_error" => (ErrorType::EmailService, ErrorCode::EmailTemplateError),
        "timeout" => (ErrorType::Api, ErrorCode::Timeout),
        _ => match status {
            Some(503) => (ErrorType::Api, ErrorCode::ApiServiceUnavailable),
            Some(429) => (ErrorType::RateLimit, ErrorCode::ApiRateLimited),
            Some(s) if s >= 500 => (ErrorType::Api, ErrorCode::ApiServerError),
            _ => (ErrorType::Api, ErrorCode::Unknown),
        },
    };
    ErrorClassification::new(error_type, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classifier() -> ErrorClassifier {
        ErrorClassifier::default()
    }

    #[test]
    fn test_named_network_errors() {
        let c = classifier().classify(&Failure::from_name("NetworkError", "boom"));
        assert_eq!(c.error_type, ErrorType::Network);
        assert_eq!(c.code, ErrorCode::NetworkFailed);
        assert!(c.retryable);

        let c = classifier().classify(&Failure::from_name("TimeoutError", "slow"));
        assert_eq!(c.code, ErrorCode::NetworkTimeout);
        assert_eq!(c.severity, Severity::Medium);
    }

    #[test]
    fn test_offline_wins_over_later_rules() {
        let flag = Arc::new(ConnectivityFlag::new(false));
        let classifier = ErrorClassifier::new(flag.clone());

        let c = classifier.classify(&Failure::Unknown(String::new()));
        assert_eq!(c.code, ErrorCode::NetworkOffline);
        assert_eq!(c.severity, Severity::High);

        let c = classifier.classify(&Failure::validation("email", "email_invalid"));
        assert_eq!(c.code, ErrorCode::NetworkOffline);

        // Named network failures come first.
        let c = classifier.classify(&Failure::Network(NetworkKind::Timeout));
        assert_eq!(c.code, ErrorCode::NetworkTimeout);

        flag.set_online(true);
        let c = classifier.classify(&Failure::Unknown(String::new()));
        assert_eq!(c.code, ErrorCode::Unknown);
    }

    #[test]
    fn test_api_narrowing() {
        let c = classifier().classify(&Failure::api("rate_limited"));
        assert_eq!(c.error_type, ErrorType::RateLimit);
        assert_eq!(c.code.as_str(), "api.rate_limited");
        assert_eq!(c.severity, Severity::Medium);

        let c = classifier().classify(&Failure::api("recaptcha_failed"));
        assert_eq!(c.error_type, ErrorType::Recaptcha);

        let c = classifier().classify(&Failure::api("email_service_error"));
        assert_eq!(c.error_type, ErrorType::EmailService);
    }

    #[test]
    fn test_unrecognised_api_code() {
        let c = classifier().classify(&Failure::api("teapot"));
        assert_eq!(c.error_type, ErrorType::Api);
        assert_eq!(c.code, ErrorCode::Unknown);

        let c = classifier().classify(&Failure::Api { code: "boom".into(), status: Some(502) });
        assert_eq!(c.code, ErrorCode::ApiServerError);
    }

    #[test]
    fn test_validation_carries_field() {
        let c = classifier().classify(&Failure::validation("email", "invalid"));
        assert_eq!(c.error_type, ErrorType::Validation);
        assert_eq!(c.code.as_str(), "validation.invalid");
        assert_eq!(c.field.as_deref(), Some("email"));
        assert!(!c.retryable);
    }

    #[test]
    fn test_json_adapter_shape_order() {
        let f = Failure::from_json(&json!({"field": "email", "code": "low_score"}));
        assert_eq!(f, Failure::Recaptcha { code: "low_score".into() });

        let f = Failure::from_json(&json!({"field": "email", "code": "email_invalid"}));
        assert_eq!(f, Failure::validation("email", "email_invalid"));

        let f = Failure::from_json(&json!({"error": "rate_limited", "status": 429}));
        assert_eq!(f, Failure::Api { code: "rate_limited".into(), status: Some(429) });

        let f = Failure::from_json(&json!({"name": "NetworkError"}));
        assert_eq!(f, Failure::Network(NetworkKind::Failed));

        let f = Failure::from_json(&json!({}));
        assert!(matches!(f, Failure::Unknown(_)));
    }

    #[test]
    fn test_unmatched_recaptcha_code_is_unknown() {
        let c = classifier().classify(&Failure::Recaptcha { code: "weird".into() });
        assert_eq!(c.error_type, ErrorType::Unknown);
        assert_eq!(c.code, ErrorCode::Unknown);
    }

    #[test]
    fn test_recoverable() {
        let c = classifier().classify(&Failure::Recaptcha { code: "missing_secret".into() });
        assert!(!c.is_recoverable());
        let c = classifier().classify(&Failure::api("server_error"));
        assert!(c.is_recoverable());
    }
}
