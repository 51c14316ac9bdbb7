//! Client-side error presentation.
//!
//! # Responsibilities
//! - Normalize failures and error envelopes
//! - Pick display type, title and actions
//! - Announce every presented error to assistive technology

pub mod announcer;
pub mod display;
pub mod handler;

pub use announcer::{
    Announcement, Announcer, ChannelAnnouncer, NoopAnnouncer, Priority, RecordingAnnouncer,
    TracingAnnouncer,
};
pub use display::{Accessibility, ActionKind, DisplayConfig, DisplayType, ErrorAction};
pub use handler::{ErrorInput, ErrorPresenter, PresentOptions, PresentedDetail, PresentedError};
