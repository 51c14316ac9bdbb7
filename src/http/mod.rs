//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, trace, timeout, body limit)
//!     → security::rate_limit (per-IP bucket on /api)
//!     → handlers.rs (forms.rs validation, retry + fallback around upstream calls)
//!     → response.rs (error envelope from mappings.rs, or success envelope)
//!     → Send to client
//! ```

pub mod envelope;
pub mod forms;
pub mod handlers;
pub mod mappings;
pub mod request;
pub mod response;
pub mod server;

pub use envelope::{ErrorBody, ErrorEnvelope, FallbackHint, FieldError, SuccessEnvelope};
pub use mappings::{ApiErrorCode, ErrorCategory, ErrorMapping, LogLevel};
pub use request::{RequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer, ServerError};
