//! Graceful degradation for external services.
//!
//! # Responsibilities
//! - Guard primary calls per named strategy
//! - Fail fast while a strategy is unhealthy
//! - Produce strategy-specific degraded results (queue, cache, static replies)

pub mod cache;
pub mod manager;
pub mod responses;
pub mod strategy;

pub use cache::ContentCache;
pub use manager::{
    DataOperation, FallbackContext, FallbackManager, FallbackOutcome, FallbackType, OutcomeSource,
};
pub use strategy::FallbackStrategy;
