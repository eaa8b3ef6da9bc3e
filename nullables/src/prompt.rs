//! Nullable confirmation prompt: records who was asked.

use std::sync::{Mutex, PoisonError};

use steward_types::VoterId;
use steward_voting::{ConfirmationPrompt, PromptRequest, SessionId};

/// Records every [`PromptRequest`] instead of showing anything.
#[derive(Debug, Default)]
pub struct NullPrompt {
    requests: Mutex<Vec<PromptRequest>>,
}

impl NullPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests so far, oldest first.
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Voters prompted for `session`.
    pub fn voters_for(&self, session: SessionId) -> Vec<VoterId> {
        self.requests()
            .into_iter()
            .filter(|r| r.session == session)
            .flat_map(|r| r.voters)
            .collect()
    }
}

impl ConfirmationPrompt for NullPrompt {
    fn solicit(&self, request: &PromptRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
    }
}
