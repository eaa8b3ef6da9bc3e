//! The plugin entry point: routes host events into accounts and votes.

use std::sync::Arc;

use steward_accounts::{unix_now_secs, Account, AccountStore, JsonAccountStore, PermissionLevel};
use steward_types::{Clock, GroupId, MonotonicClock, VoterId};
use steward_utils::StatsCounter;
use steward_voting::{
    BallotResult, ChatShorthand, Choice, OutcomeHandler, SessionHandle, VoteError, VoteManager,
    VoteOutcome, VoteRequest, VoteScope, VoterRegistry,
};

use crate::announcer::HostNotifier;
use crate::commands::{Command, Usage};
use crate::config::PluginConfig;
use crate::host::{Disposition, HostApi, HostEvent};
use crate::locale::Locale;
use crate::players::PlayerDirectory;
use crate::prompt::MenuPrompt;
use crate::PluginError;

/// Counter names reported by [`StewardPlugin::stats`].
pub const STAT_NAMES: &[&str] = &[
    "ballots_cast",
    "players_joined",
    "players_rejected",
    "votes_failed",
    "votes_passed",
    "votes_rejected",
    "votes_started",
];

/// A vote a player can propose from chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteKind {
    /// Server-wide; the target is left out of the electorate.
    Kick { target: VoterId, reason: Option<String> },
    /// Server-wide.
    Map { map: String },
    /// Restricted to the proposer's team.
    Surrender { group: GroupId },
}

pub struct StewardPlugin {
    config: PluginConfig,
    host: Arc<dyn HostApi>,
    accounts: Arc<dyn AccountStore>,
    locale: Arc<Locale>,
    players: Arc<PlayerDirectory>,
    registry: Arc<VoterRegistry>,
    manager: Arc<VoteManager>,
    chat: ChatShorthand,
    stats: StatsCounter,
}

impl StewardPlugin {
    /// Assemble the plugin from its collaborators.
    ///
    /// The configuration is validated first. Banned accounts are loaded into
    /// the voter registry up front so they are excluded even before they
    /// rejoin.
    pub fn new(
        config: PluginConfig,
        host: Arc<dyn HostApi>,
        accounts: Arc<dyn AccountStore>,
        locale: Locale,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PluginError> {
        config.validate()?;
        let locale = Arc::new(locale);
        let players = Arc::new(PlayerDirectory::new(config.default_language.clone()));
        let registry = Arc::new(VoterRegistry::new());

        let banned = accounts.banned()?;
        for account in &banned {
            registry.ban(account.id.clone());
        }

        let notifier = HostNotifier::new(host.clone(), locale.clone(), players.clone(), registry.clone());
        let manager = Arc::new(VoteManager::new(
            config.voting.clone(),
            registry.clone(),
            clock,
            Arc::new(MenuPrompt::new(host.clone())),
            Arc::new(notifier),
        ));

        tracing::info!(
            banned = banned.len(),
            languages = locale.languages().count(),
            maps = config.maps.len(),
            "steward plugin ready"
        );

        Ok(Self {
            chat: ChatShorthand::new(manager.clone()),
            config,
            host,
            accounts,
            locale,
            players,
            registry,
            manager,
            stats: StatsCounter::new(STAT_NAMES),
        })
    }

    /// Open the file-backed account store and locale bundles named by `config`.
    pub fn open(config: PluginConfig, host: Arc<dyn HostApi>) -> Result<Self, PluginError> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir)?;
        let accounts = JsonAccountStore::open(config.accounts_path())?;
        let locale = Locale::load_dir(&config.locale_path(), config.default_language.clone())?;
        Self::new(config, host, Arc::new(accounts), locale, Arc::new(MonotonicClock::new()))
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn manager(&self) -> &Arc<VoteManager> {
        &self.manager
    }

    pub fn registry(&self) -> &Arc<VoterRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Handle one host event.
    pub fn handle_event(&self, event: HostEvent) -> Result<Disposition, PluginError> {
        match event {
            HostEvent::PlayerJoined { id, name, group } => self.on_join(id, &name, group),
            HostEvent::PlayerLeft { id } => {
                self.registry.leave(&id);
                self.players.remove(&id);
                Ok(Disposition::Continue)
            }
            HostEvent::TeamChanged { id, group } => {
                self.registry.assign_group(&id, group);
                Ok(Disposition::Continue)
            }
            HostEvent::Chat { sender, message } => self.on_chat(&sender, &message),
            HostEvent::MenuChoice {
                player,
                session,
                accepted,
            } => {
                let result = self.manager.submit_choice(session, &player, Choice::from(accepted));
                self.count_ballot(result);
                Ok(Disposition::Consumed)
            }
            HostEvent::GameReset | HostEvent::GameOver { .. } => {
                let cleared = self.manager.clear_all_votes();
                if cleared > 0 {
                    tracing::info!(cleared, "round ended, votes cleared");
                }
                Ok(Disposition::Continue)
            }
        }
    }

    /// Resolve due sessions. Called by the resolver task.
    pub fn tick(&self) -> Vec<VoteOutcome> {
        let outcomes = self.manager.check_all_sessions();
        for outcome in &outcomes {
            self.stats
                .increment(if outcome.passed { "votes_passed" } else { "votes_failed" });
        }
        if !outcomes.is_empty() {
            tracing::debug!(stats = %self.stats, "sessions resolved");
        }
        outcomes
    }

    /// Propose a vote on behalf of `creator`.
    ///
    /// Creation failures are reported to the creator and returned.
    pub fn start_vote(&self, creator: &VoterId, kind: VoteKind) -> Result<SessionHandle, VoteError> {
        let lang = self.locale.default_language();
        let creator_name = self.players.name_of(creator);
        let result = match kind {
            VoteKind::Kick { target, reason } => {
                let target_name = self.players.name_of(&target);
                let reason = reason.unwrap_or_else(|| self.locale.text(lang, "reason.none", &[]));
                let request = VoteRequest::new(
                    VoteScope::Global,
                    creator.clone(),
                    self.locale.text(lang, "vote.kick.title", &[target_name.as_str()]),
                )
                .description(self.locale.text(
                    lang,
                    "vote.kick.description",
                    &[target_name.as_str(), creator_name.as_str(), reason.as_str()],
                ))
                .exclude(target.clone());
                let host = self.host.clone();
                self.create(request, move |outcome: &VoteOutcome| {
                    if outcome.passed {
                        host.kick(&target, &reason);
                    }
                })
            }
            VoteKind::Map { map } => {
                let request = VoteRequest::new(
                    VoteScope::Global,
                    creator.clone(),
                    self.locale.text(lang, "vote.map.title", &[map.as_str()]),
                )
                .description(self.locale.text(
                    lang,
                    "vote.map.description",
                    &[map.as_str(), creator_name.as_str()],
                ));
                let host = self.host.clone();
                self.create(request, move |outcome: &VoteOutcome| {
                    if outcome.passed {
                        host.change_map(&map);
                    }
                })
            }
            VoteKind::Surrender { group } => {
                let request = VoteRequest::new(
                    VoteScope::Group(group),
                    creator.clone(),
                    self.locale.text(lang, "vote.surrender.title", &[]),
                )
                .description(self.locale.text(
                    lang,
                    "vote.surrender.description",
                    &[creator_name.as_str()],
                ));
                let host = self.host.clone();
                self.create(request, move |outcome: &VoteOutcome| {
                    if outcome.passed {
                        host.surrender(group);
                    }
                })
            }
        };

        match &result {
            Ok(_) => self.stats.increment("votes_started"),
            Err(err) => {
                self.stats.increment("votes_rejected");
                tracing::debug!(creator = %creator, error = %err, "vote rejected");
                self.report_vote_error(creator, err);
            }
        }
        result
    }

    /// Start a vote from a chat command. Failures are already reported to
    /// the creator by [`start_vote`](Self::start_vote).
    fn propose(&self, creator: &VoterId, kind: VoteKind) {
        if let Ok(handle) = self.start_vote(creator, kind) {
            tracing::debug!(session = %handle.id, creator = %creator, "vote proposed from chat");
        }
    }

    fn create<H>(&self, request: VoteRequest, handler: H) -> Result<SessionHandle, VoteError>
    where
        H: OutcomeHandler + 'static,
    {
        // Unreadable accounts cannot vote.
        let accounts = self.accounts.clone();
        let request = request.eligible_if(move |id: &VoterId| match accounts.get(id) {
            Ok(Some(account)) => account.permission(false).can_vote(),
            Ok(None) => true,
            Err(_) => false,
        });
        self.manager.create_vote(request, handler)
    }

    fn report_vote_error(&self, player: &VoterId, err: &VoteError) {
        match err {
            VoteError::InsufficientParticipants { .. } => self.reply(player, "vote.error.insufficient", &[]),
            VoteError::ScopeBusy(scope) => {
                let scope = scope.to_string();
                self.reply(player, "vote.error.busy", &[scope.as_str()])
            }
            VoteError::NoEligibleVoters => self.reply(player, "vote.error.no_voters", &[]),
        }
    }

    fn reply(&self, player: &VoterId, key: &str, args: &[&str]) {
        let lang = self.players.language_of(player);
        self.host.send_to_player(player, &self.locale.text(&lang, key, args));
    }

    fn permission(&self, player: &VoterId) -> Result<PermissionLevel, PluginError> {
        let host_admin = self.host.is_admin(player);
        Ok(match self.accounts.get(player)? {
            Some(account) => account.permission(host_admin),
            None if host_admin => PermissionLevel::Admin,
            None => PermissionLevel::Player,
        })
    }

    fn count_ballot(&self, result: BallotResult) {
        if result == BallotResult::Accepted {
            self.stats.increment("ballots_cast");
        }
    }

    fn on_join(&self, id: VoterId, name: &str, group: Option<GroupId>) -> Result<Disposition, PluginError> {
        let now = unix_now_secs();
        let mut account = self
            .accounts
            .get(&id)?
            .unwrap_or_else(|| Account::new(id.clone(), name, now));
        account.touch(name, now);
        self.accounts.put(&account)?;

        if account.banned || self.registry.is_banned(&id) {
            let reason = account
                .ban_reason
                .clone()
                .unwrap_or_else(|| self.locale.text(self.locale.default_language(), "reason.none", &[]));
            let lang = account
                .language
                .clone()
                .unwrap_or_else(|| self.config.default_language.clone());
            tracing::info!(player = %id, "banned player rejected");
            self.stats.increment("players_rejected");
            self.host
                .kick(&id, &self.locale.text(&lang, "ban.kicked", &[reason.as_str()]));
            return Ok(Disposition::Consumed);
        }

        self.players.insert(id.clone(), name, account.language.clone());
        self.registry.join(id, group);
        self.stats.increment("players_joined");
        Ok(Disposition::Continue)
    }

    fn on_chat(&self, sender: &VoterId, message: &str) -> Result<Disposition, PluginError> {
        match Command::parse(message) {
            Some(Ok(command)) => {
                self.run_command(sender, command)?;
                Ok(Disposition::Consumed)
            }
            Some(Err(Usage(key))) => {
                self.reply(sender, key, &[]);
                Ok(Disposition::Consumed)
            }
            None if self.config.voting.chat_shorthand => match self.chat.on_chat(sender, message) {
                Some(result) => {
                    self.count_ballot(result);
                    Ok(Disposition::Consumed)
                }
                None => Ok(Disposition::Continue),
            },
            None => Ok(Disposition::Continue),
        }
    }

    fn run_command(&self, sender: &VoterId, command: Command) -> Result<(), PluginError> {
        match command {
            Command::VoteKick { target, reason } => {
                let Some(target_id) = self.players.resolve(&target) else {
                    self.reply(sender, "command.unknown_player", &[target.as_str()]);
                    return Ok(());
                };
                if &target_id == sender {
                    self.reply(sender, "command.cannot_target_self", &[]);
                    return Ok(());
                }
                if self.permission(&target_id)?.can_moderate() {
                    let name = self.players.name_of(&target_id);
                    self.reply(sender, "command.cannot_kick_admin", &[name.as_str()]);
                    return Ok(());
                }
                self.propose(sender, VoteKind::Kick { target: target_id, reason });
            }
            Command::VoteMap { map } => {
                let known = self.config.maps.iter().find(|m| m.eq_ignore_ascii_case(&map));
                let map = match known {
                    Some(m) => m.clone(),
                    None if self.config.maps.is_empty() => map,
                    None => {
                        let available = self.config.maps.join(", ");
                        self.reply(sender, "command.unknown_map", &[map.as_str(), available.as_str()]);
                        return Ok(());
                    }
                };
                self.propose(sender, VoteKind::Map { map });
            }
            Command::Surrender => {
                let Some(group) = self.registry.group_of(sender) else {
                    self.reply(sender, "command.no_team", &[]);
                    return Ok(());
                };
                self.propose(sender, VoteKind::Surrender { group });
            }
            Command::Ban { target, reason } => {
                if !self.permission(sender)?.can_moderate() {
                    self.reply(sender, "command.not_admin", &[]);
                    return Ok(());
                }
                let Some(id) = self.find_account(&target)? else {
                    self.reply(sender, "command.unknown_player", &[target.as_str()]);
                    return Ok(());
                };
                if &id == sender {
                    self.reply(sender, "command.cannot_target_self", &[]);
                    return Ok(());
                }
                let account = self.accounts.ban(&id, reason.clone())?;
                self.registry.ban(id.clone());
                tracing::info!(player = %id, by = %sender, "player banned");
                if self.registry.is_online(&id) {
                    let reason = reason.unwrap_or_else(|| {
                        self.locale.text(self.locale.default_language(), "reason.none", &[])
                    });
                    let lang = self.players.language_of(&id);
                    self.host
                        .kick(&id, &self.locale.text(&lang, "ban.kicked", &[reason.as_str()]));
                }
                let text = self
                    .locale
                    .text(self.locale.default_language(), "ban.done", &[account.name.as_str()]);
                self.host.broadcast(&text);
            }
            Command::Unban { target } => {
                if !self.permission(sender)?.can_moderate() {
                    self.reply(sender, "command.not_admin", &[]);
                    return Ok(());
                }
                let Some(id) = self.find_account(&target)? else {
                    self.reply(sender, "command.unknown_player", &[target.as_str()]);
                    return Ok(());
                };
                let account = self.accounts.unban(&id)?;
                self.registry.unban(&id);
                tracing::info!(player = %id, by = %sender, "player unbanned");
                self.reply(sender, "unban.done", &[account.name.as_str()]);
            }
        }
        Ok(())
    }

    /// Online players first, then any stored account by identity or name.
    fn find_account(&self, query: &str) -> Result<Option<VoterId>, PluginError> {
        if let Some(id) = self.players.resolve(query) {
            return Ok(Some(id));
        }
        let id = VoterId::new(query);
        if self.accounts.get(&id)?.is_some() {
            return Ok(Some(id));
        }
        Ok(self.accounts.find_by_name(query)?.map(|a| a.id))
    }
}
