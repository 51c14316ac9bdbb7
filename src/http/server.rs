//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared application state from config
//! - Create the Axum router (clinic API, admin API, fallbacks)
//! - Wire up middleware (request ID, tracing, timeout, body limit, rate limit)
//! - Serve until the shutdown broadcast fires

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::GatewayConfig;
use crate::errors::ErrorClassifier;
use crate::fallback::FallbackManager;
use crate::http::handlers;
use crate::observability::metrics;
use crate::registry::{ResilienceRegistry, SWEEP_INTERVAL};
use crate::resilience::RetryExecutor;
use crate::security::rate_limit_middleware;
use crate::upstream::UpstreamClient;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub registry: ResilienceRegistry,
    pub fallback: Arc<FallbackManager>,
    pub retry: RetryExecutor,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let registry = ResilienceRegistry::from_config(&config);
        Self::with_registry(config, registry)
    }

    /// State sharing an existing registry.
    pub fn with_registry(config: GatewayConfig, registry: ResilienceRegistry) -> Result<Self, ServerError> {
        let upstream = UpstreamClient::new(config.upstreams.clone(), &config.timeouts)?;
        let fallback = Arc::new(registry.fallback_manager(&config));
        Ok(Self {
            config: Arc::new(config),
            registry,
            fallback,
            retry: RetryExecutor::new(ErrorClassifier::default()),
            upstream,
        })
    }
}

/// HTTP server for the clinic gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    pub fn from_state(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let api = Router::new()
            .route("/api/contact", post(handlers::submit_contact))
            .route("/api/content/{content_type}/{identifier}", get(handlers::get_content))
            .route("/api/chat", post(handlers::chat))
            .route("/api/health", get(handlers::health))
            .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware));

        let mut router = api;
        if config.admin.enabled {
            router = router.merge(setup_admin_router(state.clone()));
        }

        router
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::method_not_allowed)
            .with_state(state)
            .layer(middleware::from_fn(track_request))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router without binding, for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = self
            .state
            .registry
            .spawn_sweeper(SWEEP_INTERVAL, shutdown.resubscribe());

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await;
        sweeper.abort();
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_request(
    request: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
