//! Error classification and resilience layer for a clinic web platform.
//!
//! # Architecture Overview
//!
//! ```text
//!   raw failure ──► errors::ErrorClassifier ──► ErrorClassification
//!                                  │
//!            ┌─────────────────────┼─────────────────────────┐
//!            ▼                     ▼                         ▼
//!   resilience::RetryExecutor  fallback::FallbackManager  presenter::ErrorPresenter
//!   (backoff + jitter)         (health records, cache,    (display config,
//!                               per-strategy degradation)  screen-reader announcements)
//!            │                     │
//!            └──────────┬──────────┘
//!                       ▼
//!        http (Axum gateway: clinic API + admin API, JSON envelopes)
//!                       │
//!                       ▼
//!        upstream (email service, CMS, chatbot over reqwest)
//! ```
//!
//! Cross-cutting: `config` (TOML), `observability` (tracing, Prometheus),
//! `security` (rate limiting), `lifecycle` (signals, graceful shutdown).

pub mod admin;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod presenter;
pub mod registry;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use errors::{ErrorClassification, ErrorClassifier, Failure};
pub use fallback::{FallbackManager, FallbackStrategy};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use presenter::ErrorPresenter;
pub use registry::ResilienceRegistry;
pub use resilience::{with_form_retry, with_retry, RetryExecutor};
