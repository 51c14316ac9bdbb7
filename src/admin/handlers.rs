use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::fallback::FallbackStrategy;
use crate::health::HealthSnapshot;
use crate::http::envelope::SuccessEnvelope;
use crate::http::mappings::ApiErrorCode;
use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::resilience::{RetryPolicy, RetryPolicySummary};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub unhealthy_threshold: u32,
    pub cache_entries: usize,
    pub retry_policy: RetryPolicySummary,
}

pub async fn get_status(State(state): State<AppState>, request_id: RequestId) -> SuccessEnvelope<SystemStatus> {
    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        unhealthy_threshold: state.registry.health.threshold(),
        cache_entries: state.registry.cache.len(),
        retry_policy: RetryPolicy::from_config(&state.config.retries).summary(),
    };
    SuccessEnvelope::new("Status do sistema.", status, request_id.as_str())
}

pub async fn get_services(
    State(state): State<AppState>,
    request_id: RequestId,
) -> SuccessEnvelope<BTreeMap<FallbackStrategy, HealthSnapshot>> {
    SuccessEnvelope::new("Saúde dos serviços.", state.fallback.service_status(), request_id.as_str())
}

fn parse_strategy(raw: &str, request_id: &RequestId) -> Result<FallbackStrategy, ApiError> {
    raw.parse().map_err(|e| {
        ApiError::new(ApiErrorCode::NotFound)
            .request_id(request_id.as_str())
            .context(json!({ "detail": format!("{e}") }))
    })
}

pub async fn reset_service(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(strategy): Path<String>,
) -> Result<SuccessEnvelope<HealthSnapshot>, ApiError> {
    let strategy = parse_strategy(&strategy, &request_id)?;
    state.fallback.reset_service(strategy);
    tracing::info!(strategy = %strategy, request_id = %request_id, "Service reset by operator");
    Ok(SuccessEnvelope::new(
        "Serviço restaurado.",
        state.registry.health.snapshot(strategy),
        request_id.as_str(),
    ))
}

pub async fn mark_unhealthy(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(strategy): Path<String>,
) -> Result<SuccessEnvelope<HealthSnapshot>, ApiError> {
    let strategy = parse_strategy(&strategy, &request_id)?;
    let failures = state.fallback.mark_service_unhealthy(strategy);
    tracing::warn!(strategy = %strategy, failures, request_id = %request_id, "Service failure recorded by operator");
    Ok(SuccessEnvelope::new(
        "Falha registrada.",
        state.registry.health.snapshot(strategy),
        request_id.as_str(),
    ))
}

pub async fn clear_cache(State(state): State<AppState>, request_id: RequestId) -> SuccessEnvelope {
    let removed = state.registry.cache.len();
    state.fallback.clear_cache();
    tracing::info!(removed, request_id = %request_id, "Content cache cleared");
    SuccessEnvelope::new("Cache limpo.", json!({ "removed": removed }), request_id.as_str())
}
