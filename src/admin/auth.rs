use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::mappings::ApiErrorCode;
use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Requires `Authorization: Bearer <admin.api_key>`.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|key| key == state.config.admin.api_key);

    if authorized {
        return next.run(request).await;
    }
    tracing::warn!(request_id = %request_id, path = %request.uri().path(), "Admin request rejected");
    ApiError::new(ApiErrorCode::Unauthorized)
        .request_id(request_id.as_str())
        .into_response()
}
