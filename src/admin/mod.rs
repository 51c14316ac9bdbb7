//! Operator API.
//!
//! ```text
//! GET    /admin/status
//! GET    /admin/services
//! POST   /admin/services/{strategy}/reset
//! POST   /admin/services/{strategy}/unhealthy
//! DELETE /admin/cache
//! ```
//!
//! Every route requires the configured bearer key.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/services", get(get_services))
        .route("/admin/services/{strategy}/reset", post(reset_service))
        .route("/admin/services/{strategy}/unhealthy", post(mark_unhealthy))
        .route("/admin/cache", delete(clear_cache))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
