//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! call to an external service:
//!     → retries.rs (classify failure, back off, try again)
//!     → policy.rs (attempt budget and curve derived from the classification)
//!     → backoff.rs (exponential delay with jitter)
//!     → timeouts.rs (deadline around the primary call)
//! ```

pub mod backoff;
pub mod policy;
pub mod retries;
pub mod timeouts;

pub use policy::{RetryPolicy, RetryPolicySummary};
pub use retries::{with_form_retry, with_retry, RetryExecutor, RetryNotice, RetryOptions};
pub use timeouts::{with_timeout, OperationError};
