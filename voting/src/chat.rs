//! Chat shorthand: a bare "y" in chat votes yes on the server-wide session.
//!
//! Kept outside the manager: it translates one chat event into
//! [`VoteManager::add_vote`] and nothing else. Group sessions are answered
//! through the confirmation prompt only.

use std::sync::Arc;

use steward_types::VoterId;

use crate::manager::VoteManager;
use crate::session::BallotResult;

/// Turns affirmative chat replies into server-wide ballots.
#[derive(Clone)]
pub struct ChatShorthand {
    manager: Arc<VoteManager>,
}

impl ChatShorthand {
    pub fn new(manager: Arc<VoteManager>) -> Self {
        Self { manager }
    }

    /// Whether `message` is the affirmative shorthand.
    pub fn is_affirmative(message: &str) -> bool {
        message.trim().eq_ignore_ascii_case("y")
    }

    /// Handle one chat message.
    ///
    /// Returns `None` when the message is not a ballot (not "y", no
    /// server-wide session, or sent by the session's creator); the caller
    /// should treat it as ordinary chat. Otherwise returns how the ballot
    /// was received.
    pub fn on_chat(&self, sender: &VoterId, message: &str) -> Option<BallotResult> {
        if !Self::is_affirmative(message) {
            return None;
        }
        let creator = self.manager.global_creator()?;
        if &creator == sender {
            return None;
        }
        Some(self.manager.add_vote(sender))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_bare_y_is_affirmative() {
        assert!(ChatShorthand::is_affirmative("y"));
        assert!(ChatShorthand::is_affirmative(" Y "));
        assert!(!ChatShorthand::is_affirmative("yes"));
        assert!(!ChatShorthand::is_affirmative("why"));
        assert!(!ChatShorthand::is_affirmative(""));
    }
}
