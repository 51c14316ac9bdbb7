//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming /api request:
//!     → rate_limit.rs (per-IP token bucket)
//!     → handler
//! Incoming /admin request:
//!     → admin::auth (bearer key)
//!     → admin handler
//! ```

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
