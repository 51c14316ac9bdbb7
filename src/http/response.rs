//! Error and success responses.
//!
//! # Responsibilities
//! - Build the error envelope from the code table
//! - Map codes to HTTP status and `Retry-After`
//! - Log each error at the level its mapping names
//!
//! Unknown code strings use the internal-error mapping but keep the code the
//! caller supplied.

use axum::http::header::{HeaderValue, RETRY_AFTER};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::http::envelope::{timestamp_now, ErrorBody, ErrorEnvelope, FallbackHint, FieldError, SuccessEnvelope};
use crate::http::mappings::{ApiErrorCode, ErrorMapping, LogLevel};

/// An error response under construction.
#[derive(Debug, Clone)]
pub struct ApiError {
    code: String,
    mapping: &'static ErrorMapping,
    field: Option<String>,
    validation_errors: Option<Vec<FieldError>>,
    request_id: Option<String>,
    context: Option<Value>,
}

impl ApiError {
    pub fn new(code: ApiErrorCode) -> Self {
        Self {
            code: code.as_str().to_string(),
            mapping: code.mapping(),
            field: None,
            validation_errors: None,
            request_id: None,
            context: None,
        }
    }

    /// Build from a code string; unknown codes fall back to the internal mapping.
    pub fn from_code(code: &str) -> Self {
        let mapping = ApiErrorCode::parse(code)
            .unwrap_or(ApiErrorCode::InternalServerError)
            .mapping();
        Self {
            code: code.to_string(),
            mapping,
            ..Self::new(ApiErrorCode::InternalServerError)
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn validation_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.validation_errors = Some(errors);
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status(&self) -> StatusCode {
        self.mapping.status
    }

    pub fn log_level(&self) -> LogLevel {
        self.mapping.log_level
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let m = self.mapping;
        ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code.clone(),
                message: m.user_message.to_string(),
                category: m.category,
                severity: m.severity,
                recovery: m.recovery.to_string(),
                retryable: m.retryable,
                timestamp: timestamp_now(),
                request_id: self.request_id.clone().unwrap_or_else(|| "unknown".to_string()),
                field: self.field.clone(),
                validation_errors: self.validation_errors.clone(),
                retry_after: m.retry_after,
                fallback: m.fallback.map(|hint| FallbackHint {
                    action: hint.action.to_string(),
                    message: hint.message.to_string(),
                }),
                aria_label: Some(m.aria_label.to_string()),
                context: self.context.clone(),
            },
        }
    }

    fn log(&self) {
        let request_id = self.request_id.as_deref().unwrap_or("unknown");
        let technical = self.mapping.technical_message;
        let status = self.mapping.status.as_u16();
        match self.mapping.log_level {
            LogLevel::Info => {
                tracing::info!(code = %self.code, status, request_id, "{technical}")
            }
            LogLevel::Warn => {
                tracing::warn!(code = %self.code, status, request_id, "{technical}")
            }
            LogLevel::Error => {
                tracing::error!(code = %self.code, status, request_id, "{technical}")
            }
        }
    }
}

impl From<ApiErrorCode> for ApiError {
    fn from(code: ApiErrorCode) -> Self {
        ApiError::new(code)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        crate::observability::metrics::record_error_response(self.mapping.status.as_u16());
        let mut response = (self.mapping.status, Json(self.envelope())).into_response();
        if let Some(seconds) = self.mapping.retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

impl<T: Serialize> IntoResponse for SuccessEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
