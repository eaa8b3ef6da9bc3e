//! Confirmation prompts shown as host menus.

use std::sync::Arc;

use steward_voting::{ConfirmationPrompt, PromptRequest};

use crate::host::HostApi;

/// Shows every voter a yes/no menu; answers return as
/// [`HostEvent::MenuChoice`](crate::HostEvent::MenuChoice).
pub struct MenuPrompt {
    host: Arc<dyn HostApi>,
}

impl MenuPrompt {
    pub fn new(host: Arc<dyn HostApi>) -> Self {
        Self { host }
    }
}

impl ConfirmationPrompt for MenuPrompt {
    fn solicit(&self, request: &PromptRequest) {
        tracing::debug!(session = %request.session, voters = request.voters.len(), "showing vote menu");
        for voter in &request.voters {
            self.host
                .show_confirmation(voter, request.session, &request.title, &request.description);
        }
    }
}
