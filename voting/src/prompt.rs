//! Confirmation prompt collaborator.
//!
//! How the yes/no question reaches a player (menu, popup, chat line) is up to
//! the host layer. Answers come back through
//! [`VoteManager::submit_choice`](crate::VoteManager::submit_choice).

use steward_types::VoterId;

use crate::scope::VoteScope;
use crate::session::SessionId;

/// A player's answer to a confirmation prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
}

impl From<bool> for Choice {
    fn from(accepted: bool) -> Self {
        if accepted {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Everything needed to ask the electorate of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptRequest {
    pub session: SessionId,
    pub scope: VoteScope,
    pub title: String,
    pub description: String,
    pub voters: Vec<VoterId>,
}

/// Presents a binary choice to each voter.
///
/// Called once per session, right after creation, outside the manager lock.
/// Implementations may therefore call back into the manager.
pub trait ConfirmationPrompt: Send + Sync {
    fn solicit(&self, request: &PromptRequest);
}
