//! Screen-reader announcements.
//!
//! Announcements are handed to an [`Announcer`]. The UI layer owns the live
//! region; this crate only decides the text and its urgency.

use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::errors::Severity;

/// `aria-live` politeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Polite,
    Assertive,
}

impl Priority {
    pub fn for_severity(severity: Severity) -> Self {
        if severity.is_urgent() {
            Priority::Assertive
        } else {
            Priority::Polite
        }
    }
}

/// A single announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub message: String,
    pub priority: Priority,
}

/// Sink for announcements.
pub trait Announcer: Send + Sync {
    fn announce(&self, message: &str, priority: Priority);
}

/// Writes announcements to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn announce(&self, message: &str, priority: Priority) {
        tracing::info!(?priority, message, "Announcement");
    }
}

/// Drops every announcement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnnouncer;

impl Announcer for NoopAnnouncer {
    fn announce(&self, _message: &str, _priority: Priority) {}
}

/// Forwards announcements over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelAnnouncer {
    tx: mpsc::UnboundedSender<Announcement>,
}

impl ChannelAnnouncer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Announcement>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Announcer for ChannelAnnouncer {
    fn announce(&self, message: &str, priority: Priority) {
        let announcement = Announcement {
            message: message.to_string(),
            priority,
        };
        if self.tx.send(announcement).is_err() {
            tracing::debug!("Announcement receiver dropped");
        }
    }
}

/// Keeps every announcement in memory.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    seen: Mutex<Vec<Announcement>>,
}

impl RecordingAnnouncer {
    pub fn announcements(&self) -> Vec<Announcement> {
        match self.seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, message: &str, priority: Priority) {
        let announcement = Announcement {
            message: message.to_string(),
            priority,
        };
        match self.seen.lock() {
            Ok(mut seen) => seen.push(announcement),
            Err(poisoned) => poisoned.into_inner().push(announcement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_follows_severity() {
        assert_eq!(Priority::for_severity(Severity::Critical), Priority::Assertive);
        assert_eq!(Priority::for_severity(Severity::High), Priority::Assertive);
        assert_eq!(Priority::for_severity(Severity::Medium), Priority::Polite);
        assert_eq!(Priority::for_severity(Severity::Low), Priority::Polite);
    }

    #[tokio::test]
    async fn test_channel_announcer_delivers() {
        let (announcer, mut rx) = ChannelAnnouncer::new();
        announcer.announce("Olá", Priority::Polite);
        let got = rx.recv().await.unwrap();
        assert_eq!(got.message, "Olá");
        assert_eq!(got.priority, Priority::Polite);
    }

    #[test]
    fn test_recording_announcer_keeps_order() {
        let announcer = RecordingAnnouncer::default();
        announcer.announce("a", Priority::Polite);
        announcer.announce("b", Priority::Assertive);
        let seen = announcer.announcements();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].message, "b");
    }
}
