//! Nullable announcement sink.

use std::sync::{Mutex, PoisonError};

use steward_voting::{VoteAnnouncement, VoteNotifier, VoteOutcome};

/// Keeps every announcement for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    announcements: Mutex<Vec<VoteAnnouncement>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<VoteAnnouncement> {
        self.announcements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the resolution announcements, in order.
    pub fn outcomes(&self) -> Vec<VoteOutcome> {
        self.announcements()
            .into_iter()
            .filter_map(|a| match a {
                VoteAnnouncement::Resolved(outcome) => Some(outcome),
                VoteAnnouncement::Started { .. } => None,
            })
            .collect()
    }
}

impl VoteNotifier for RecordingNotifier {
    fn announce(&self, announcement: &VoteAnnouncement) {
        self.announcements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(announcement.clone());
    }
}
