//! Localized vote announcements.

use std::collections::BTreeMap;
use std::sync::Arc;

use steward_types::VoterId;
use steward_utils::format_duration;
use steward_voting::{VoteAnnouncement, VoteNotifier, VoteScope, VoterRegistry};

use crate::host::HostApi;
use crate::locale::Locale;
use crate::players::PlayerDirectory;

/// Tells the players in a vote's scope that it started or resolved.
///
/// Recipients are grouped by language. When they all share one, the text goes
/// out as a single broadcast or group message; otherwise each player gets a
/// private message in their own language.
pub struct HostNotifier {
    host: Arc<dyn HostApi>,
    locale: Arc<Locale>,
    players: Arc<PlayerDirectory>,
    registry: Arc<VoterRegistry>,
}

impl HostNotifier {
    pub fn new(
        host: Arc<dyn HostApi>,
        locale: Arc<Locale>,
        players: Arc<PlayerDirectory>,
        registry: Arc<VoterRegistry>,
    ) -> Self {
        Self {
            host,
            locale,
            players,
            registry,
        }
    }

    fn render(&self, lang: &str, announcement: &VoteAnnouncement) -> String {
        match announcement {
            VoteAnnouncement::Started {
                scope,
                title,
                electorate,
                threshold,
                timeout,
                ..
            } => {
                let key = if scope.is_global() {
                    "vote.started"
                } else {
                    "vote.started.group"
                };
                let threshold = threshold.to_string();
                let electorate = electorate.to_string();
                let remaining = format_duration(*timeout);
                self.locale.text(
                    lang,
                    key,
                    &[title.as_str(), threshold.as_str(), electorate.as_str(), remaining.as_str()],
                )
            }
            VoteAnnouncement::Resolved(outcome) => {
                let key = if outcome.passed { "vote.passed" } else { "vote.failed" };
                let percent = outcome.percent.to_string();
                self.locale
                    .text(lang, key, &[outcome.title.as_str(), percent.as_str()])
            }
        }
    }
}

impl VoteNotifier for HostNotifier {
    fn announce(&self, announcement: &VoteAnnouncement) {
        let scope = announcement.scope();
        let recipients = match scope {
            VoteScope::Global => self.registry.online(),
            VoteScope::Group(group) => self.registry.members(group),
        };
        if recipients.is_empty() {
            return;
        }

        let mut by_language: BTreeMap<String, Vec<VoterId>> = BTreeMap::new();
        for id in recipients {
            by_language.entry(self.players.language_of(&id)).or_default().push(id);
        }

        if by_language.len() == 1 {
            if let Some(lang) = by_language.keys().next() {
                let text = self.render(lang, announcement);
                match scope {
                    VoteScope::Global => self.host.broadcast(&text),
                    VoteScope::Group(group) => self.host.send_to_group(group, &text),
                }
            }
            return;
        }

        for (lang, ids) in &by_language {
            let text = self.render(lang, announcement);
            for id in ids {
                self.host.send_to_player(id, &text);
            }
        }
    }
}
