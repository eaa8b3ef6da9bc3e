//! Announcement sink.

use std::time::Duration;

use steward_types::VoterId;

use crate::outcome::VoteOutcome;
use crate::scope::VoteScope;
use crate::session::SessionId;

/// Something players should be told about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteAnnouncement {
    Started {
        session: SessionId,
        scope: VoteScope,
        creator: VoterId,
        title: String,
        description: String,
        electorate: usize,
        threshold: usize,
        timeout: Duration,
    },
    Resolved(VoteOutcome),
}

impl VoteAnnouncement {
    pub fn scope(&self) -> VoteScope {
        match self {
            Self::Started { scope, .. } => *scope,
            Self::Resolved(outcome) => outcome.scope,
        }
    }
}

/// Delivers announcements to players.
///
/// Composing and broadcasting the actual text is the implementor's job. The
/// manager calls this outside its lock.
pub trait VoteNotifier: Send + Sync {
    fn announce(&self, announcement: &VoteAnnouncement);
}
