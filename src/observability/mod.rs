//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! classifier / retry executor / fallback manager / http layer
//!     → logging.rs (structured error log entries, subscriber setup)
//!     → metrics.rs (counters and gauges, Prometheus scrape endpoint)
//! ```
//!
//! Request IDs flow through all log events as the `request_id` field.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_error, ErrorLogEntry};
