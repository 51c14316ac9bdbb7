//! Primary-call wrapper with strategy-specific degraded modes.
//!
//! # Data Flow
//! ```text
//! execute_with_fallback(strategy, primary, context)
//!     │
//!     ├─ strategy unhealthy? ── yes ──────────────────────────┐
//!     │                                                       ▼
//!     ├─ primary() under deadline ── err ─► failures += 1 ─► fallback_for(strategy)
//!     │        │                                              │
//!     │       ok ─► failures = 0                        ok ─► source = fallback
//!     │        ▼                                       err ─► source = fallback_failed
//!     └─ source = primary
//! ```
//!
//! The manager never returns an error; every path yields a [`FallbackOutcome`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ClinicConfig;
use crate::fallback::cache::ContentCache;
use crate::fallback::responses::{contact_info, static_chatbot_response};
use crate::fallback::strategy::FallbackStrategy;
use crate::health::{HealthRegistry, HealthSnapshot};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

/// Default deadline for a primary operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Where an outcome's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    Primary,
    Fallback,
    FallbackFailed,
}

impl OutcomeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeSource::Primary => "primary",
            OutcomeSource::Fallback => "fallback",
            OutcomeSource::FallbackFailed => "fallback_failed",
        }
    }
}

/// Degraded mode that produced a fallback outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackType {
    Queued,
    AlternativeService,
    EmailOnly,
    CachedContent,
    StaticResponses,
    CachedData,
    QueuedWrite,
}

/// Data operation kind for the database strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOperation {
    Read,
    Write,
}

/// Strategy-specific hints for building a fallback.
#[derive(Debug, Clone, Default)]
pub struct FallbackContext {
    pub queue_for_retry: bool,
    pub alternative_service: bool,
    pub content_type: Option<String>,
    pub identifier: Option<String>,
    pub user_message: Option<String>,
    pub operation: Option<DataOperation>,
    pub table: Option<String>,
    /// Overrides the manager's primary deadline.
    pub timeout: Option<Duration>,
}

impl FallbackContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_for_retry(mut self) -> Self {
        self.queue_for_retry = true;
        self
    }

    pub fn alternative_service(mut self) -> Self {
        self.alternative_service = true;
        self
    }

    pub fn content(mut self, content_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self.identifier = Some(identifier.into());
        self
    }

    pub fn user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }

    pub fn data(mut self, operation: DataOperation, table: impl Into<String>) -> Self {
        self.operation = Some(operation);
        self.table = Some(table.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of a guarded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackOutcome {
    pub success: bool,
    pub source: OutcomeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_type: Option<FallbackType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub operation_id: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_error: Option<String>,
}

#[derive(Debug, Error)]
enum FallbackError {
    #[error("no cached content for {content_type}/{identifier}")]
    CacheMiss {
        content_type: String,
        identifier: String,
    },

    #[error("content type and identifier are required for cached content")]
    MissingContentKey,

    #[error("database unavailable and no fallback available")]
    DatabaseUnavailable,
}

struct Degraded {
    kind: FallbackType,
    data: Value,
    message: String,
}

/// Runs primary operations and degrades per strategy when they fail.
#[derive(Debug, Clone)]
pub struct FallbackManager {
    health: Arc<HealthRegistry>,
    cache: ContentCache,
    clinic: ClinicConfig,
    default_timeout: Duration,
}

impl Default for FallbackManager {
    fn default() -> Self {
        Self::new(
            Arc::new(HealthRegistry::default()),
            ContentCache::default(),
            ClinicConfig::default(),
            DEFAULT_OPERATION_TIMEOUT,
        )
    }
}

fn new_operation_id() -> String {
    format!("op_{}", Uuid::new_v4().simple())
}

impl FallbackManager {
    pub fn new(
        health: Arc<HealthRegistry>,
        cache: ContentCache,
        clinic: ClinicConfig,
        default_timeout: Duration,
    ) -> Self {
        Self {
            health,
            cache,
            clinic,
            default_timeout,
        }
    }

    pub fn health(&self) -> &HealthRegistry {
        &self.health
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Run `primary` for `strategy`, falling back when it fails or the
    /// strategy is known to be down.
    pub async fn execute_with_fallback<F, Fut, E>(
        &self,
        strategy: FallbackStrategy,
        primary: F,
        context: &FallbackContext,
    ) -> FallbackOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: Display,
    {
        let operation_id = new_operation_id();
        let start = Instant::now();

        if !self.health.is_healthy(strategy) {
            tracing::info!(
                strategy = %strategy,
                operation_id = %operation_id,
                "Service known to be down, using fallback immediately"
            );
            return self.execute_fallback(strategy, context, operation_id, start, None);
        }

        let limit = context.timeout.unwrap_or(self.default_timeout);
        match with_timeout(limit, primary()).await {
            Ok(data) => {
                self.health.record_success(strategy);
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::info!(
                    strategy = %strategy,
                    operation_id = %operation_id,
                    duration_ms,
                    "Primary operation successful"
                );
                metrics::record_fallback(strategy.as_str(), OutcomeSource::Primary.as_str());
                FallbackOutcome {
                    success: true,
                    source: OutcomeSource::Primary,
                    fallback_type: None,
                    data: Some(data),
                    message: None,
                    operation_id,
                    duration_ms,
                    error: None,
                    original_error: None,
                }
            }
            Err(err) => {
                let error = err.to_string();
                tracing::warn!(
                    strategy = %strategy,
                    operation_id = %operation_id,
                    error = %error,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Primary operation failed, attempting fallback"
                );
                self.health.record_failure(strategy);
                self.execute_fallback(strategy, context, operation_id, start, Some(error))
            }
        }
    }

    fn execute_fallback(
        &self,
        strategy: FallbackStrategy,
        context: &FallbackContext,
        operation_id: String,
        start: Instant,
        original_error: Option<String>,
    ) -> FallbackOutcome {
        let duration_ms = || start.elapsed().as_millis() as u64;

        match self.fallback_for(strategy, context) {
            Ok(degraded) => {
                tracing::info!(
                    strategy = %strategy,
                    operation_id = %operation_id,
                    fallback_type = ?degraded.kind,
                    original_error = original_error.as_deref(),
                    "Fallback executed successfully"
                );
                metrics::record_fallback(strategy.as_str(), OutcomeSource::Fallback.as_str());
                FallbackOutcome {
                    success: true,
                    source: OutcomeSource::Fallback,
                    fallback_type: Some(degraded.kind),
                    data: Some(degraded.data),
                    message: Some(degraded.message),
                    operation_id,
                    duration_ms: duration_ms(),
                    error: None,
                    original_error,
                }
            }
            Err(err) => {
                tracing::error!(
                    strategy = %strategy,
                    operation_id = %operation_id,
                    fallback_error = %err,
                    original_error = original_error.as_deref(),
                    "Fallback execution failed"
                );
                metrics::record_fallback(strategy.as_str(), OutcomeSource::FallbackFailed.as_str());
                FallbackOutcome {
                    success: false,
                    source: OutcomeSource::FallbackFailed,
                    fallback_type: None,
                    data: None,
                    message: None,
                    operation_id,
                    duration_ms: duration_ms(),
                    error: Some(err.to_string()),
                    original_error,
                }
            }
        }
    }

    fn fallback_for(
        &self,
        strategy: FallbackStrategy,
        context: &FallbackContext,
    ) -> Result<Degraded, FallbackError> {
        match strategy {
            FallbackStrategy::EmailService => Ok(email_fallback(context)),
            FallbackStrategy::SmsService => Ok(Degraded {
                kind: FallbackType::EmailOnly,
                data: json!({ "emailOnly": true }),
                message: "Confirmação será enviada apenas por email. SMS temporariamente indisponível."
                    .to_string(),
            }),
            FallbackStrategy::WordpressCms => {
                let (Some(content_type), Some(identifier)) =
                    (context.content_type.as_deref(), context.identifier.as_deref())
                else {
                    return Err(FallbackError::MissingContentKey);
                };
                let data = self.cache.get(content_type, identifier).ok_or_else(|| {
                    FallbackError::CacheMiss {
                        content_type: content_type.to_string(),
                        identifier: identifier.to_string(),
                    }
                })?;
                Ok(Degraded {
                    kind: FallbackType::CachedContent,
                    data,
                    message: "Conteúdo em cache sendo exibido.".to_string(),
                })
            }
            FallbackStrategy::ChatbotAi => Ok(Degraded {
                kind: FallbackType::StaticResponses,
                data: json!({
                    "response": static_chatbot_response(context.user_message.as_deref(), &self.clinic),
                    "isStatic": true,
                    "contactInfo": contact_info(&self.clinic),
                }),
                message: "Assistente virtual temporariamente indisponível. Respostas automáticas ativas."
                    .to_string(),
            }),
            FallbackStrategy::Database => match context.operation {
                Some(DataOperation::Read) => {
                    let table = context.table.as_deref().unwrap_or_default();
                    self.cache
                        .get("database", table)
                        .map(|data| Degraded {
                            kind: FallbackType::CachedData,
                            data,
                            message: "Dados em cache sendo utilizados.".to_string(),
                        })
                        .ok_or(FallbackError::DatabaseUnavailable)
                }
                Some(DataOperation::Write) => Ok(Degraded {
                    kind: FallbackType::QueuedWrite,
                    data: json!({ "queued": true, "retryAfter": 60 }),
                    message: "Operação foi adicionada à fila para processamento posterior."
                        .to_string(),
                }),
                None => Err(FallbackError::DatabaseUnavailable),
            },
        }
    }

    /// Count a failure without calling the primary.
    pub fn mark_service_unhealthy(&self, strategy: FallbackStrategy) -> u32 {
        self.health.record_failure(strategy)
    }

    pub fn reset_service(&self, strategy: FallbackStrategy) {
        self.health.reset(strategy);
    }

    pub fn service_status(&self) -> BTreeMap<FallbackStrategy, HealthSnapshot> {
        self.health.snapshot_all()
    }

    pub fn get_cached_content(&self, content_type: &str, identifier: &str) -> Option<Value> {
        self.cache.get(content_type, identifier)
    }

    pub fn set_cached_content(&self, content_type: &str, identifier: &str, data: Value) {
        self.cache.set(content_type, identifier, data);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn email_fallback(context: &FallbackContext) -> Degraded {
    if context.queue_for_retry {
        return Degraded {
            kind: FallbackType::Queued,
            data: json!({ "queued": true, "retryAfter": 300 }),
            message: "Email foi adicionado à fila para envio posterior.".to_string(),
        };
    }
    if context.alternative_service {
        return Degraded {
            kind: FallbackType::AlternativeService,
            data: json!({ "sent": true, "service": "alternative" }),
            message: "Email enviado através de serviço alternativo.".to_string(),
        };
    }
    Degraded {
        kind: FallbackType::Queued,
        data: json!({ "queued": true, "retryAfter": 300 }),
        message: "Sua mensagem foi salva e será enviada assim que o serviço for restaurado."
            .to_string(),
    }
}
