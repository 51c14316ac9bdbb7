//! Error taxonomy and classification.
//!
//! # Responsibilities
//! - Model raw failures observed at boundaries (`Failure`)
//! - Classify them into type, code, severity and retryability
//! - Hold the patient-facing message table
//! - Derive recovery guidance

pub mod classifier;
pub mod messages;
pub mod recovery;
pub mod taxonomy;

pub use classifier::{
    AlwaysOnline, Classify, Connectivity, ConnectivityFlag, ErrorClassification, ErrorClassifier,
    Failure, NetworkKind,
};
pub use messages::ErrorMessage;
pub use recovery::recovery_steps;
pub use taxonomy::{ErrorCode, ErrorType, Severity, SeverityIndicator};
