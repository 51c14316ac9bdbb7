//! Service health tracking.
//!
//! # Data Flow
//! ```text
//! Primary call outcome (fallback manager)
//!     → registry.rs (per-strategy record)
//!     → state.rs (consecutive failure counter, timestamps)
//!     → healthy = failures < threshold
//! ```

pub mod registry;
pub mod state;

pub use registry::{HealthRegistry, DEFAULT_UNHEALTHY_THRESHOLD};
pub use state::{HealthSnapshot, ServiceHealth};
