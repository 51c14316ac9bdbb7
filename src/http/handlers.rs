//! Clinic API handlers.
//!
//! Each upstream-backed route runs its call through the retry executor,
//! wrapped by the fallback manager under the route's strategy:
//!
//! ```text
//! POST /api/contact                     → EMAIL_SERVICE  (queue on failure)
//! GET  /api/content/{type}/{identifier} → WORDPRESS_CMS  (serve from cache)
//! POST /api/chat                        → CHATBOT_AI     (static replies)
//! GET  /api/health                      → health snapshot
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{ErrorType, Failure};
use crate::fallback::{FallbackContext, FallbackOutcome, FallbackStrategy, OutcomeSource};
use crate::http::envelope::SuccessEnvelope;
use crate::http::forms::{field_errors, ContactForm};
use crate::http::mappings::ApiErrorCode;
use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::resilience::{RetryOptions, RetryPolicy};

pub const CHAT_MESSAGE_MAX_CHARS: usize = 1000;
pub const CONTENT_SEGMENT_MAX_CHARS: usize = 200;

type ApiResult = Result<SuccessEnvelope, ApiError>;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>, request_id: &RequestId) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        ApiError::new(ApiErrorCode::InvalidJson)
            .request_id(request_id.as_str())
            .context(json!({ "detail": rejection.body_text() }))
    })
}

impl AppState {
    /// Retry options for upstream calls: operator-configured curve, capped budget.
    ///
    /// Rate-limit failures need a delay of a minute or more, longer than any
    /// request may wait, so they go straight to the fallback.
    pub fn retry_options(&self) -> RetryOptions {
        let retries = &self.config.retries;
        if !retries.enabled {
            return RetryOptions::new().max_attempts(1);
        }
        RetryOptions::new()
            .policy(RetryPolicy::from_config(retries))
            .max_attempts(retries.max_attempts)
            .should_retry(|classification, _| {
                classification.retryable && classification.error_type != ErrorType::RateLimit
            })
    }
}

/// Map a fallback outcome to the HTTP response.
fn respond(
    strategy: FallbackStrategy,
    outcome: FallbackOutcome,
    primary_message: &str,
    request_id: &RequestId,
) -> ApiResult {
    match outcome.source {
        OutcomeSource::Primary | OutcomeSource::Fallback if outcome.success => {
            let message = outcome
                .message
                .clone()
                .unwrap_or_else(|| primary_message.to_string());
            let data = serde_json::to_value(&outcome).unwrap_or(Value::Null);
            Ok(SuccessEnvelope::new(message, data, request_id.as_str()))
        }
        _ => Err(ApiError::new(ApiErrorCode::for_strategy(strategy))
            .request_id(request_id.as_str())
            .context(json!({
                "operationId": outcome.operation_id,
                "fallbackError": outcome.error,
            }))),
    }
}

pub async fn submit_contact(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult {
    let form = json_body(payload, &request_id)?;

    if form.is_spam() {
        return Err(ApiError::new(ApiErrorCode::SpamDetected).request_id(request_id.as_str()));
    }
    let failures = form.validate();
    if !failures.is_empty() {
        let errors = field_errors(&failures);
        let mut error = ApiError::new(ApiErrorCode::ValidationError).request_id(request_id.as_str());
        if let Some(first) = errors.first() {
            error = error.field(first.field.clone());
        }
        return Err(error.validation_errors(errors));
    }

    let payload = form.email_payload();
    let options = state.retry_options();
    let outcome = state
        .fallback
        .execute_with_fallback(
            FallbackStrategy::EmailService,
            || {
                state.retry.run(
                    || state.upstream.send_email(&payload),
                    options,
                )
            },
            &FallbackContext::new().queue_for_retry(),
        )
        .await;

    respond(
        FallbackStrategy::EmailService,
        outcome,
        "Mensagem enviada com sucesso! Entraremos em contato em breve.",
        &request_id,
    )
}

/// CMS slugs and ids: ASCII letters, digits, `-` and `_` only.
fn is_content_segment(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= CONTENT_SEGMENT_MAX_CHARS
        && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub async fn get_content(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((content_type, identifier)): Path<(String, String)>,
) -> ApiResult {
    for (field, value) in [("content_type", &content_type), ("identifier", &identifier)] {
        if !is_content_segment(value) {
            tracing::warn!(field, request_id = %request_id, "Rejected content path segment");
            return Err(ApiError::new(ApiErrorCode::ValidationError)
                .field(field)
                .request_id(request_id.as_str()));
        }
    }

    let options = state.retry_options();
    let outcome = state
        .fallback
        .execute_with_fallback(
            FallbackStrategy::WordpressCms,
            || async {
                let data = state
                    .retry
                    .run(|| state.upstream.fetch_content(&content_type, &identifier), options)
                    .await?;
                state.registry.cache.set(&content_type, &identifier, data.clone());
                Ok::<_, Failure>(data)
            },
            &FallbackContext::new().content(content_type.as_str(), identifier.as_str()),
        )
        .await;

    respond(FallbackStrategy::WordpressCms, outcome, "Conteúdo carregado.", &request_id)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

pub async fn chat(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload, &request_id)?;
    let message = request.message.trim();
    if message.is_empty() || message.chars().count() > CHAT_MESSAGE_MAX_CHARS {
        return Err(ApiError::new(ApiErrorCode::ValidationError)
            .field("message")
            .request_id(request_id.as_str()));
    }

    let body = json!({ "message": message, "sessionId": request.session_id });
    let options = state.retry_options();
    let outcome = state
        .fallback
        .execute_with_fallback(
            FallbackStrategy::ChatbotAi,
            || state.retry.run(|| state.upstream.chat(&body), options),
            &FallbackContext::new().user_message(message),
        )
        .await;

    respond(FallbackStrategy::ChatbotAi, outcome, "Resposta gerada.", &request_id)
}

pub async fn health(State(state): State<AppState>, request_id: RequestId) -> ApiResult {
    let services = state.fallback.service_status();
    let degraded: Vec<_> = services
        .iter()
        .filter(|(_, snapshot)| !snapshot.healthy)
        .map(|(strategy, _)| strategy.as_str())
        .collect();
    let status = if degraded.is_empty() { "ok" } else { "degraded" };

    let data = json!({
        "status": status,
        "degraded": degraded,
        "services": services,
        "cacheEntries": state.registry.cache.len(),
        "version": env!("CARGO_PKG_VERSION"),
    });
    Ok(SuccessEnvelope::new("Status dos serviços.", data, request_id.as_str()))
}

pub async fn not_found(request_id: RequestId) -> ApiError {
    ApiError::new(ApiErrorCode::NotFound).request_id(request_id.as_str())
}

pub async fn method_not_allowed(request_id: RequestId) -> ApiError {
    ApiError::new(ApiErrorCode::MethodNotAllowed).request_id(request_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_segments() {
        assert!(is_content_segment("posts"));
        assert!(is_content_segment("catarata-2024_guia"));
        assert!(is_content_segment("42"));

        for bad in ["", "..", ".", "a/b", "a\\b", "../admin", "index.php", "a b"] {
            assert!(!is_content_segment(bad), "{bad:?}");
        }
        assert!(!is_content_segment(&"a".repeat(CONTENT_SEGMENT_MAX_CHARS + 1)));
    }
}
