//! Error taxonomy: types, severities and the closed set of error codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse error family a failure is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    Network,
    Api,
    Validation,
    RateLimit,
    Recaptcha,
    EmailService,
    Unknown,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Network => "network",
            ErrorType::Api => "api",
            ErrorType::Validation => "validation",
            ErrorType::RateLimit => "rate_limit",
            ErrorType::Recaptcha => "recaptcha",
            ErrorType::EmailService => "email_service",
            ErrorType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered severity scale. `Critical` is the only non-recoverable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Visual and spoken marker attached to a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityIndicator {
    pub color: &'static str,
    pub label: &'static str,
    pub aria_label: &'static str,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn indicator(&self) -> SeverityIndicator {
        match self {
            Severity::Low => SeverityIndicator {
                color: "yellow",
                label: "Atenção",
                aria_label: "Aviso de baixa prioridade",
            },
            Severity::Medium => SeverityIndicator {
                color: "orange",
                label: "Aviso",
                aria_label: "Aviso importante",
            },
            Severity::High => SeverityIndicator {
                color: "red",
                label: "Erro",
                aria_label: "Erro importante",
            },
            Severity::Critical => SeverityIndicator {
                color: "darkred",
                label: "Crítico",
                aria_label: "Erro crítico",
            },
        }
    }

    /// Whether announcements at this level interrupt the screen reader.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every code the classifier can produce.
///
/// The set is closed: each variant has exactly one entry in the message
/// table (`ErrorCode::message`), enforced by an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationNameRequired,
    ValidationNameTooShort,
    ValidationNameTooLong,
    ValidationNameInvalid,
    ValidationEmailRequired,
    ValidationEmailInvalid,
    ValidationEmailTooLong,
    ValidationPhoneRequired,
    ValidationPhoneInvalid,
    ValidationMessageRequired,
    ValidationMessageTooShort,
    ValidationMessageTooLong,
    ValidationMessageContainsLinks,
    ValidationConsentRequired,
    ValidationInvalid,

    NetworkOffline,
    NetworkTimeout,
    NetworkFailed,
    NetworkDnsError,

    ApiMissingToken,
    ApiRecaptchaFailed,
    ApiMissingRequiredFields,
    ApiRateLimited,
    ApiEmailServiceError,
    ApiServerError,
    ApiServiceUnavailable,

    RecaptchaMissingToken,
    RecaptchaMissingSecret,
    RecaptchaVerificationFailed,
    RecaptchaLowScore,
    RecaptchaNetworkError,

    EmailServiceUnavailable,
    EmailSendFailed,
    EmailTemplateError,

    Timeout,
    Unknown,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 36] = [
        ErrorCode::ValidationNameRequired,
        ErrorCode::ValidationNameTooShort,
        ErrorCode::ValidationNameTooLong,
        ErrorCode::ValidationNameInvalid,
        ErrorCode::ValidationEmailRequired,
        ErrorCode::ValidationEmailInvalid,
        ErrorCode::ValidationEmailTooLong,
        ErrorCode::ValidationPhoneRequired,
        ErrorCode::ValidationPhoneInvalid,
        ErrorCode::ValidationMessageRequired,
        ErrorCode::ValidationMessageTooShort,
        ErrorCode::ValidationMessageTooLong,
        ErrorCode::ValidationMessageContainsLinks,
        ErrorCode::ValidationConsentRequired,
        ErrorCode::ValidationInvalid,
        ErrorCode::NetworkOffline,
        ErrorCode::NetworkTimeout,
        ErrorCode::NetworkFailed,
        ErrorCode::NetworkDnsError,
        ErrorCode::ApiMissingToken,
        ErrorCode::ApiRecaptchaFailed,
        ErrorCode::ApiMissingRequiredFields,
        ErrorCode::ApiRateLimited,
        ErrorCode::ApiEmailServiceError,
        ErrorCode::ApiServerError,
        ErrorCode::ApiServiceUnavailable,
        ErrorCode::RecaptchaMissingToken,
        ErrorCode::RecaptchaMissingSecret,
        ErrorCode::RecaptchaVerificationFailed,
        ErrorCode::RecaptchaLowScore,
        ErrorCode::RecaptchaNetworkError,
        ErrorCode::EmailServiceUnavailable,
        ErrorCode::EmailSendFailed,
        ErrorCode::EmailTemplateError,
        ErrorCode::Timeout,
        ErrorCode::Unknown,
    ];

    /// Dotted wire form, e.g. `network.timeout`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationNameRequired => "validation.name_required",
            ErrorCode::ValidationNameTooShort => "validation.name_too_short",
            ErrorCode::ValidationNameTooLong => "validation.name_too_long",
            ErrorCode::ValidationNameInvalid => "validation.name_invalid",
            ErrorCode::ValidationEmailRequired => "validation.email_required",
            ErrorCode::ValidationEmailInvalid => "validation.email_invalid",
            ErrorCode::ValidationEmailTooLong => "validation.email_too_long",
            ErrorCode::ValidationPhoneRequired => "validation.phone_required",
            ErrorCode::ValidationPhoneInvalid => "validation.phone_invalid",
            ErrorCode::ValidationMessageRequired => "validation.message_required",
            ErrorCode::ValidationMessageTooShort => "validation.message_too_short",
            ErrorCode::ValidationMessageTooLong => "validation.message_too_long",
            ErrorCode::ValidationMessageContainsLinks => "validation.message_contains_links",
            ErrorCode::ValidationConsentRequired => "validation.consent_required",
            ErrorCode::ValidationInvalid => "validation.invalid",
            ErrorCode::NetworkOffline => "network.offline",
            ErrorCode::NetworkTimeout => "network.timeout",
            ErrorCode::NetworkFailed => "network.failed",
            ErrorCode::NetworkDnsError => "network.dns_error",
            ErrorCode::ApiMissingToken => "api.missing_token",
            ErrorCode::ApiRecaptchaFailed => "api.recaptcha_failed",
            ErrorCode::ApiMissingRequiredFields => "api.missing_required_fields",
            ErrorCode::ApiRateLimited => "api.rate_limited",
            ErrorCode::ApiEmailServiceError => "api.email_service_error",
            ErrorCode::ApiServerError => "api.server_error",
            ErrorCode::ApiServiceUnavailable => "api.service_unavailable",
            ErrorCode::RecaptchaMissingToken => "recaptcha.missing_token",
            ErrorCode::RecaptchaMissingSecret => "recaptcha.missing_secret",
            ErrorCode::RecaptchaVerificationFailed => "recaptcha.verification_failed",
            ErrorCode::RecaptchaLowScore => "recaptcha.low_score",
            ErrorCode::RecaptchaNetworkError => "recaptcha.network_error",
            ErrorCode::EmailServiceUnavailable => "email_service_unavailable",
            ErrorCode::EmailSendFailed => "email_send_failed",
            ErrorCode::EmailTemplateError => "email_template_error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Unknown => "unknown",
        }
    }

    /// Reverse of [`ErrorCode::as_str`].
    pub fn parse(code: &str) -> Option<ErrorCode> {
        ErrorCode::ALL.iter().copied().find(|c| c.as_str() == code)
    }

    /// Validation codes carry the bare suffix on the wire (`email_invalid`).
    pub fn validation(code: &str) -> ErrorCode {
        ErrorCode::parse(&format!("validation.{code}"))
            .filter(|c| c.as_str().starts_with("validation."))
            .unwrap_or(ErrorCode::ValidationInvalid)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ErrorCode::parse(&raw).unwrap_or(ErrorCode::Unknown))
    }
}
