//! Retry execution.
//!
//! # Responsibilities
//! - Re-run a failing async operation with exponential backoff and jitter
//! - Derive the attempt budget from the first observed failure
//! - Re-raise the last failure unchanged once retries stop
//! - Announce form-submission retries to assistive technology
//!
//! # State Machine
//! ```text
//! Attempting ──ok──► Succeeded
//!     │
//!    err ── budget left && should_retry ──► Backoff ──sleep──► Attempting
//!     │
//!     └── otherwise ──► Exhausted (original error returned)
//! ```

use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{Classify, ErrorClassification, ErrorClassifier};
use crate::observability::{logging::log_error, metrics};
use crate::presenter::announcer::{Announcer, Priority};
use crate::resilience::policy::RetryPolicy;

type ShouldRetry = Arc<dyn Fn(&ErrorClassification, u32) -> bool + Send + Sync>;
type OnRetry = Arc<dyn Fn(&RetryNotice) + Send + Sync>;

/// Details handed to `on_retry` before each backoff sleep.
#[derive(Debug, Clone)]
pub struct RetryNotice {
    /// The attempt that just failed (1-based).
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay: Duration,
    pub classification: ErrorClassification,
}

/// Per-call retry overrides. Unset fields come from the policy derived from
/// the first failure.
#[derive(Clone, Default)]
pub struct RetryOptions {
    max_attempts: Option<u32>,
    policy: Option<RetryPolicy>,
    should_retry: Option<ShouldRetry>,
    on_retry: Option<OnRetry>,
}

impl RetryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts.max(1));
        self
    }

    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn should_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorClassification, u32) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Arc::new(f));
        self
    }

    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(&RetryNotice) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(f));
        self
    }
}

/// Runs operations under a retry policy.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    classifier: ErrorClassifier,
}

impl RetryExecutor {
    pub fn new(classifier: ErrorClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Invoke `operation` until it succeeds or retrying stops.
    pub async fn run<F, Fut, T, E>(&self, mut operation: F, options: RetryOptions) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify,
    {
        let mut policy = options.policy;
        let mut attempt: u32 = 1;
        let mut last_code = None;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(
                            attempt,
                            code = last_code.map(|c: crate::errors::ErrorCode| c.as_str()),
                            "Operation succeeded after retry"
                        );
                        metrics::record_retry_outcome("recovered");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            let failure = err.failure();
            let classification = self.classifier.classify(&failure);
            last_code = Some(classification.code);

            let active = *policy.get_or_insert_with(|| RetryPolicy::for_classification(&classification));
            let max_attempts = options.max_attempts.unwrap_or(active.max_attempts).max(1);
            let allowed = match &options.should_retry {
                Some(should_retry) => should_retry(&classification, attempt),
                None => classification.retryable,
            };

            if attempt >= max_attempts || !allowed {
                log_error(
                    &failure,
                    &classification,
                    json!({
                        "action": "retry_failed",
                        "attempt": attempt,
                        "totalAttempts": max_attempts,
                        "finalFailure": true,
                    }),
                );
                metrics::record_retry_outcome(if allowed { "exhausted" } else { "not_retryable" });
                return Err(err);
            }

            let delay = active.delay(attempt);
            let notice = RetryNotice {
                attempt,
                max_attempts,
                delay,
                classification,
            };
            if let Some(on_retry) = &options.on_retry {
                on_retry(&notice);
            }
            log_error(
                &failure,
                &notice.classification,
                json!({
                    "action": "retry_attempt",
                    "attempt": attempt,
                    "totalAttempts": max_attempts,
                    "delay": delay.as_millis() as u64,
                }),
            );
            metrics::record_retry_attempt(notice.classification.code.as_str());

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Like [`RetryExecutor::run`], announcing progress for a form submission.
    pub async fn run_form<F, Fut, T, E>(
        &self,
        mut submit: F,
        announcer: Arc<dyn Announcer>,
        options: RetryOptions,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify,
    {
        let attempts = AtomicU32::new(0);
        let caller_on_retry = options.on_retry.clone();
        let retry_announcer = announcer.clone();

        let options = options.on_retry(move |notice: &RetryNotice| {
            let seconds = notice.delay.as_millis().div_ceil(1000);
            retry_announcer.announce(
                &format!(
                    "Tentativa {} de {}. Tentando novamente em {} segundos.",
                    notice.attempt, notice.max_attempts, seconds
                ),
                Priority::Polite,
            );
            if let Some(on_retry) = &caller_on_retry {
                on_retry(notice);
            }
        });

        let result = self
            .run(
                || {
                    attempts.fetch_add(1, Ordering::Relaxed);
                    submit()
                },
                options,
            )
            .await;

        let made = attempts.load(Ordering::Relaxed);
        match &result {
            Ok(_) if made > 1 => announcer.announce(
                &format!("Sucesso na tentativa {made}. Formulário enviado com êxito."),
                Priority::Polite,
            ),
            Ok(_) => announcer.announce("Formulário enviado com sucesso.", Priority::Polite),
            Err(_) => announcer.announce(
                "Todas as tentativas falharam. Entre em contato conosco se necessário.",
                Priority::Assertive,
            ),
        }
        result
    }
}

/// Run `operation` with the default classifier.
pub async fn with_retry<F, Fut, T, E>(operation: F, options: RetryOptions) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
{
    RetryExecutor::default().run(operation, options).await
}

/// Run a form submission with retry announcements.
pub async fn with_form_retry<F, Fut, T, E>(
    submit: F,
    announcer: Arc<dyn Announcer>,
    options: RetryOptions,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
{
    RetryExecutor::default().run_form(submit, announcer, options).await
}
