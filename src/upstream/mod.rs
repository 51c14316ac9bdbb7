//! Outbound calls to the clinic's third-party services.
//!
//! # Data Flow
//! ```text
//! handler → retry executor → UpstreamClient ──► email / CMS / chatbot
//!                                 │
//!                                 ▼
//!               reqwest::Error / non-2xx body → Failure
//! ```

pub mod client;

pub use client::UpstreamClient;
