//! Per-client token-bucket rate limiting.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::time::Instant;

use crate::http::mappings::ApiErrorCode;
use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn is_full(&self, capacity: f64, refill_rate: f64) -> bool {
        self.tokens + self.last_update.elapsed().as_secs_f64() * refill_rate >= capacity
    }
}

/// Buckets keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    rps: f64,
    burst: f64,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            rps: requests_per_second as f64,
            burst: burst_size.max(1) as f64,
        }
    }

    /// Take one token for `key`; false when the bucket is empty.
    pub fn check(&self, key: &str) -> bool {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst));
        bucket.try_acquire(self.burst, self.rps)
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Forget clients whose bucket has refilled; returns how many were dropped.
    pub fn sweep_full(&self) -> usize {
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| !bucket.is_full(self.burst, self.rps));
        before.saturating_sub(self.buckets.len())
    }
}

/// Rejects over-limit clients with the `RATE_LIMIT_EXCEEDED` envelope.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.rate_limit.enabled {
        return next.run(request).await;
    }

    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    if state.registry.rate_limiter.check(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, request_id = %request_id, "Rate limit exceeded");
        metrics::record_rate_limited("rps_limit");
        ApiError::new(ApiErrorCode::RateLimitExceeded)
            .request_id(request_id.as_str())
            .into_response()
    }
}
