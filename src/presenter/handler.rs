//! Turns failures and error envelopes into something the UI can render.
//!
//! # Data Flow
//! ```text
//! ErrorInput::Raw(Failure) ──► ErrorClassifier ──► message table ─┐
//!                                                                 ├─► PresentedDetail ─► DisplayConfig
//! ErrorInput::Envelope(ErrorEnvelope) ────────────────────────────┘          │
//!                                                                            ▼
//!                                                                 Announcer (aria-live)
//! ```

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{recovery_steps, ErrorClassifier, ErrorType, Failure, Severity};
use crate::http::envelope::{ErrorEnvelope, FallbackHint, FieldError};
use crate::http::mappings::ErrorCategory;
use crate::presenter::announcer::{Announcer, Priority, TracingAnnouncer};
use crate::presenter::display::{
    actions_for, field_label, title_for, Accessibility, ActionInputs, DisplayConfig, DisplayType,
};

/// What the presenter was handed.
#[derive(Debug, Clone)]
pub enum ErrorInput {
    Raw(Failure),
    Envelope(ErrorEnvelope),
}

impl From<Failure> for ErrorInput {
    fn from(failure: Failure) -> Self {
        ErrorInput::Raw(failure)
    }
}

impl From<ErrorEnvelope> for ErrorInput {
    fn from(envelope: ErrorEnvelope) -> Self {
        ErrorInput::Envelope(envelope)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PresentOptions {
    pub display_type: Option<DisplayType>,
    pub retry_available: bool,
    pub source: Option<String>,
    pub context: Option<Value>,
}

impl PresentOptions {
    pub fn display_type(mut self, display_type: DisplayType) -> Self {
        self.display_type = Some(display_type);
        self
    }

    /// The caller can re-run the failed operation.
    pub fn with_retry_handler(mut self) -> Self {
        self.retry_available = true;
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

/// Normalized view of the error, whichever form it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedDetail {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub recovery: String,
    pub recovery_steps: Vec<String>,
    pub retryable: bool,
    pub recoverable: bool,
    pub aria_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackHint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedError {
    pub success: bool,
    pub error_id: String,
    pub error: PresentedDetail,
    pub display_config: DisplayConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

fn category_for(error_type: ErrorType) -> ErrorCategory {
    match error_type {
        ErrorType::Network => ErrorCategory::Network,
        ErrorType::Api | ErrorType::EmailService => ErrorCategory::ExternalService,
        ErrorType::Validation => ErrorCategory::Validation,
        ErrorType::RateLimit => ErrorCategory::RateLimit,
        ErrorType::Recaptcha => ErrorCategory::Security,
        ErrorType::Unknown => ErrorCategory::System,
    }
}

#[derive(Clone)]
pub struct ErrorPresenter {
    classifier: ErrorClassifier,
    announcer: Arc<dyn Announcer>,
}

impl Default for ErrorPresenter {
    fn default() -> Self {
        Self::new(ErrorClassifier::default(), Arc::new(TracingAnnouncer))
    }
}

impl std::fmt::Debug for ErrorPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorPresenter")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl ErrorPresenter {
    pub fn new(classifier: ErrorClassifier, announcer: Arc<dyn Announcer>) -> Self {
        Self { classifier, announcer }
    }

    pub fn handle_error(&self, input: impl Into<ErrorInput>, options: PresentOptions) -> PresentedError {
        let error_id = format!("err_{}", Uuid::new_v4());
        let detail = self.detail(input.into());
        let display_config = display_config(&detail, &options);

        tracing::warn!(
            error_id = %error_id,
            code = %detail.code,
            severity = %detail.severity,
            source = options.source.as_deref().unwrap_or("client"),
            "Presenting error"
        );
        self.announcer
            .announce(&detail.aria_label, Priority::for_severity(detail.severity));

        PresentedError {
            success: false,
            error_id,
            error: detail,
            display_config,
            context: options.context,
        }
    }

    fn detail(&self, input: ErrorInput) -> PresentedDetail {
        match input {
            ErrorInput::Raw(failure) => {
                let classification = self.classifier.classify(&failure);
                let message = classification.message();
                PresentedDetail {
                    code: classification.code.as_str().to_string(),
                    message: message.user_message.to_string(),
                    category: category_for(classification.error_type),
                    severity: classification.severity,
                    recovery: message.recovery.to_string(),
                    recovery_steps: recovery_steps(&classification),
                    retryable: classification.retryable,
                    recoverable: classification.is_recoverable(),
                    aria_label: message.aria_label.to_string(),
                    field: classification.field.clone(),
                    validation_errors: None,
                    fallback: None,
                }
            }
            ErrorInput::Envelope(envelope) => {
                let body = envelope.error;
                let aria_label = body
                    .aria_label
                    .unwrap_or_else(|| format!("Erro: {}", body.message));
                PresentedDetail {
                    recovery_steps: vec![body.recovery.clone()],
                    recoverable: body.severity != Severity::Critical,
                    code: body.code,
                    message: body.message,
                    category: body.category,
                    severity: body.severity,
                    recovery: body.recovery,
                    retryable: body.retryable,
                    aria_label,
                    field: body.field,
                    validation_errors: body.validation_errors,
                    fallback: body.fallback,
                }
            }
        }
    }
}

fn display_config(detail: &PresentedDetail, options: &PresentOptions) -> DisplayConfig {
    let display_type = options
        .display_type
        .unwrap_or_else(|| DisplayType::default_for(detail.severity, detail.field.is_some()));

    DisplayConfig {
        display_type,
        title: title_for(detail.severity),
        message: detail.message.clone(),
        recovery: detail.recovery.clone(),
        severity: detail.severity,
        actions: actions_for(ActionInputs {
            retryable: detail.retryable,
            retry_available: options.retry_available,
            severity: detail.severity,
            category: detail.category,
            code: &detail.code,
        }),
        accessibility: Accessibility::alert(detail.aria_label.clone()),
        field: detail.field.clone(),
        field_label: detail.field.as_deref().map(field_label),
        validation_errors: detail.validation_errors.clone(),
        fallback: detail.fallback.clone(),
        auto_close: matches!(detail.severity, Severity::Low | Severity::Medium),
        persistent: detail.severity.is_urgent(),
    }
}
