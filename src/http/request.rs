//! Request identity.
//!
//! `tower-http` assigns a UUID v4 `x-request-id` to every request that lacks
//! one and copies it to the response; [`RequestId`] reads it back inside
//! handlers so envelopes and logs carry the same value.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;
use std::convert::Infallible;
use std::fmt;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_parts(parts: &Parts) -> Self {
        parts
            .headers
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(RequestId::new)
            .unwrap_or_else(|| RequestId::new("unknown"))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestId::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_reads_header_or_defaults() {
        let (parts, _) = Request::builder()
            .header("x-request-id", "abc-123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(RequestId::from_parts(&parts).as_str(), "abc-123");

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(RequestId::from_parts(&parts).as_str(), "unknown");
    }
}
