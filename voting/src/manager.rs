//! Vote manager: owns every live session.
//!
//! At most one server-wide session and at most one session per group exist at
//! any time. All session state sits behind a single mutex, so ballot arrival
//! (connection threads) and the resolve pass (timer task) are serialized: a
//! ballot either lands before resolution and is counted, or after and finds no
//! session.
//!
//! Outcome handlers run while that mutex is held; the prompt and notifier run
//! after it is released.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use steward_types::{Clock, GroupId, VoterId};

use crate::error::VoteError;
use crate::notify::{VoteAnnouncement, VoteNotifier};
use crate::outcome::{OutcomeHandler, VoteOutcome};
use crate::params::VotingParams;
use crate::prompt::{Choice, ConfirmationPrompt, PromptRequest};
use crate::quorum::pass_threshold;
use crate::registry::VoterRegistry;
use crate::scope::VoteScope;
use crate::session::{BallotResult, SessionId, SessionSnapshot, VoteSession};

type Eligibility = Box<dyn Fn(&VoterId) -> bool + Send + Sync>;

/// Parameters of a vote to start.
pub struct VoteRequest {
    pub scope: VoteScope,
    pub creator: VoterId,
    pub title: String,
    pub description: String,
    /// Barred from voting regardless of eligibility (e.g. a kick target).
    pub excluded: BTreeSet<VoterId>,
    eligibility: Option<Eligibility>,
}

impl VoteRequest {
    pub fn new(scope: VoteScope, creator: VoterId, title: impl Into<String>) -> Self {
        Self {
            scope,
            creator,
            title: title.into(),
            description: String::new(),
            excluded: BTreeSet::new(),
            eligibility: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn exclude(mut self, id: VoterId) -> Self {
        self.excluded.insert(id);
        self
    }

    /// Restrict the electorate to players accepted by `predicate`.
    ///
    /// Evaluated once per online player when the session is created.
    pub fn eligible_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&VoterId) -> bool + Send + Sync + 'static,
    {
        self.eligibility = Some(Box::new(predicate));
        self
    }

    fn is_eligible(&self, id: &VoterId) -> bool {
        self.eligibility.as_ref().map_or(true, |p| p(id))
    }
}

impl fmt::Debug for VoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoteRequest")
            .field("scope", &self.scope)
            .field("creator", &self.creator)
            .field("title", &self.title)
            .field("excluded", &self.excluded)
            .field("filtered", &self.eligibility.is_some())
            .finish()
    }
}

/// Returned by a successful [`VoteManager::create_vote`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: SessionId,
    pub scope: VoteScope,
    pub electorate: usize,
    pub threshold: usize,
}

#[derive(Default)]
struct Sessions {
    global: Option<VoteSession>,
    groups: BTreeMap<GroupId, VoteSession>,
    next_id: u64,
}

impl Sessions {
    fn is_busy(&self, scope: VoteScope) -> bool {
        match scope {
            VoteScope::Global => self.global.is_some(),
            VoteScope::Group(g) => self.groups.contains_key(&g),
        }
    }

    fn by_id_mut(&mut self, id: SessionId) -> Option<&mut VoteSession> {
        if self.global.as_ref().is_some_and(|s| s.id() == id) {
            return self.global.as_mut();
        }
        self.groups.values_mut().find(|s| s.id() == id)
    }

    fn by_scope(&self, scope: VoteScope) -> Option<&VoteSession> {
        match scope {
            VoteScope::Global => self.global.as_ref(),
            VoteScope::Group(g) => self.groups.get(&g),
        }
    }

    fn len(&self) -> usize {
        usize::from(self.global.is_some()) + self.groups.len()
    }
}

/// Owns and resolves all vote sessions.
///
/// Construct one per server instance and share it behind an `Arc`.
pub struct VoteManager {
    params: VotingParams,
    registry: Arc<VoterRegistry>,
    clock: Arc<dyn Clock>,
    prompt: Arc<dyn ConfirmationPrompt>,
    notifier: Arc<dyn VoteNotifier>,
    sessions: Mutex<Sessions>,
}

impl VoteManager {
    pub fn new(
        params: VotingParams,
        registry: Arc<VoterRegistry>,
        clock: Arc<dyn Clock>,
        prompt: Arc<dyn ConfirmationPrompt>,
        notifier: Arc<dyn VoteNotifier>,
    ) -> Self {
        Self {
            params,
            registry,
            clock,
            prompt,
            notifier,
            sessions: Mutex::new(Sessions::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn params(&self) -> &VotingParams {
        &self.params
    }

    pub fn registry(&self) -> &Arc<VoterRegistry> {
        &self.registry
    }

    /// Start a vote.
    ///
    /// Checks, in order: more than one eligible player online, the scope is
    /// free, the electorate is non-empty. On success the session is live
    /// before the electorate is prompted.
    pub fn create_vote<H>(&self, request: VoteRequest, handler: H) -> Result<SessionHandle, VoteError>
    where
        H: OutcomeHandler + 'static,
    {
        let (handle, prompt, started) = {
            let mut sessions = self.lock();

            let population = self.registry.eligible_population();
            if population <= 1 {
                return Err(VoteError::InsufficientParticipants { population });
            }
            if sessions.is_busy(request.scope) {
                return Err(VoteError::ScopeBusy(request.scope));
            }

            let electorate = self.registry.electorate(
                request.scope,
                &request.creator,
                &request.excluded,
                &|id: &VoterId| request.is_eligible(id),
            );
            if electorate.is_empty() {
                return Err(VoteError::NoEligibleVoters);
            }

            sessions.next_id += 1;
            let id = SessionId::new(sessions.next_id);
            let threshold = pass_threshold(electorate.len(), self.params.pass_bps(request.scope));
            let handle = SessionHandle {
                id,
                scope: request.scope,
                electorate: electorate.len(),
                threshold,
            };
            let prompt = PromptRequest {
                session: id,
                scope: request.scope,
                title: request.title.clone(),
                description: request.description.clone(),
                voters: electorate.iter().cloned().collect(),
            };
            let started = VoteAnnouncement::Started {
                session: id,
                scope: request.scope,
                creator: request.creator.clone(),
                title: request.title.clone(),
                description: request.description.clone(),
                electorate: electorate.len(),
                threshold,
                timeout: self.params.timeout(),
            };

            let session = VoteSession::new(
                id,
                request.scope,
                request.creator,
                request.title,
                request.description,
                electorate,
                request.excluded,
                self.clock.now(),
                Box::new(handler),
            );
            match request.scope {
                VoteScope::Global => sessions.global = Some(session),
                VoteScope::Group(g) => {
                    sessions.groups.insert(g, session);
                }
            }
            (handle, prompt, started)
        };

        tracing::info!(
            session = %handle.id,
            scope = %handle.scope,
            electorate = handle.electorate,
            threshold = handle.threshold,
            "vote started"
        );
        self.notifier.announce(&started);
        self.prompt.solicit(&prompt);
        Ok(handle)
    }

    /// Cast a "yes" ballot on the server-wide session.
    ///
    /// Ignored when there is no such session, when `voter` already voted, or
    /// when `voter` is not in the electorate snapshot.
    pub fn add_vote(&self, voter: &VoterId) -> BallotResult {
        let mut sessions = self.lock();
        let result = match sessions.global.as_mut() {
            Some(session) => session.add_ballot(voter),
            None => BallotResult::NoSession,
        };
        tracing::debug!(voter = %voter, ?result, "server ballot");
        result
    }

    /// Route a confirmation-prompt answer to the session it was asked for.
    ///
    /// Answers to a session that has since resolved find nothing and are
    /// ignored, even if a new session now occupies the same scope.
    pub fn submit_choice(&self, session: SessionId, voter: &VoterId, choice: Choice) -> BallotResult {
        let mut sessions = self.lock();
        let result = match sessions.by_id_mut(session) {
            None => BallotResult::NoSession,
            Some(_) if choice == Choice::No => BallotResult::Declined,
            Some(s) => s.add_ballot(voter),
        };
        tracing::debug!(session = %session, voter = %voter, ?result, "prompt ballot");
        result
    }

    /// Resolve every session that is done. Returns the outcomes, in
    /// resolution order (server-wide first, then groups by id).
    ///
    /// Sessions that are not done are left untouched, so calling this
    /// repeatedly is harmless.
    pub fn check_all_sessions(&self) -> Vec<VoteOutcome> {
        let now = self.clock.now();
        let mut resolved = Vec::new();
        {
            let mut sessions = self.lock();

            if let Some(tally) = sessions
                .global
                .as_ref()
                .map(|s| s.tally(now, &self.params))
                .filter(|t| t.done())
            {
                if let Some(session) = sessions.global.take() {
                    resolved.push(session.resolve(tally));
                }
            }

            let done: Vec<_> = sessions
                .groups
                .iter()
                .map(|(g, s)| (*g, s.tally(now, &self.params)))
                .filter(|(_, t)| t.done())
                .collect();
            for (group, tally) in done {
                if let Some(session) = sessions.groups.remove(&group) {
                    resolved.push(session.resolve(tally));
                }
            }
        }

        for outcome in &resolved {
            tracing::info!(
                session = %outcome.session,
                scope = %outcome.scope,
                passed = outcome.passed,
                ballots = outcome.ballots,
                electorate = outcome.electorate,
                reason = ?outcome.reason,
                "vote resolved"
            );
            self.notifier.announce(&VoteAnnouncement::Resolved(outcome.clone()));
        }
        resolved
    }

    /// Drop every session without firing handlers. Returns how many were dropped.
    pub fn clear_all_votes(&self) -> usize {
        let dropped = {
            let mut sessions = self.lock();
            let dropped = sessions.len();
            sessions.global = None;
            sessions.groups.clear();
            dropped
        };
        if dropped > 0 {
            tracing::info!(dropped, "cleared all votes");
        }
        dropped
    }

    /// Creator of the server-wide session, if one is running.
    pub fn global_creator(&self) -> Option<VoterId> {
        self.lock().global.as_ref().map(|s| s.creator().clone())
    }

    /// Excluded set of the server-wide session, if one is running.
    pub fn global_excluded(&self) -> Option<BTreeSet<VoterId>> {
        self.lock().global.as_ref().map(|s| s.excluded().clone())
    }

    pub fn snapshot(&self, scope: VoteScope) -> Option<SessionSnapshot> {
        self.lock().by_scope(scope).map(VoteSession::snapshot)
    }

    pub fn is_active(&self, scope: VoteScope) -> bool {
        self.lock().is_busy(scope)
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use steward_types::Timestamp;

    use crate::outcome::{outcome_channel, ResolveReason};

    // ── test doubles ───────────────────────────────────────────────────

    #[derive(Default)]
    struct TestClock(AtomicU64);

    impl TestClock {
        fn advance_secs(&self, secs: u64) {
            self.0.fetch_add(secs * 1000, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0.load(Ordering::SeqCst))
        }
    }

    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<PromptRequest>>,
        announcements: Mutex<Vec<VoteAnnouncement>>,
    }

    impl ConfirmationPrompt for Recorder {
        fn solicit(&self, request: &PromptRequest) {
            self.prompts.lock().unwrap().push(request.clone());
        }
    }

    impl VoteNotifier for Recorder {
        fn announce(&self, announcement: &VoteAnnouncement) {
            self.announcements.lock().unwrap().push(announcement.clone());
        }
    }

    struct Fixture {
        manager: VoteManager,
        clock: Arc<TestClock>,
        recorder: Arc<Recorder>,
    }

    fn voter(name: &str) -> VoterId {
        VoterId::new(name)
    }

    fn red() -> GroupId {
        GroupId::new(1)
    }

    /// `creator` plus the named voters online, everyone in group red.
    fn fixture(voters: &[&str]) -> Fixture {
        fixture_with(VotingParams::default(), voters)
    }

    fn fixture_with(params: VotingParams, voters: &[&str]) -> Fixture {
        let registry = Arc::new(VoterRegistry::new());
        registry.join(voter("creator"), Some(red()));
        for v in voters {
            registry.join(voter(v), Some(red()));
        }
        let clock = Arc::new(TestClock::default());
        let recorder = Arc::new(Recorder::default());
        let manager = VoteManager::new(
            params,
            registry,
            clock.clone(),
            recorder.clone(),
            recorder.clone(),
        );
        Fixture {
            manager,
            clock,
            recorder,
        }
    }

    fn global(title: &str) -> VoteRequest {
        VoteRequest::new(VoteScope::Global, voter("creator"), title)
    }

    fn counting() -> (Arc<AtomicUsize>, Arc<AtomicUsize>, impl OutcomeHandler) {
        let calls = Arc::new(AtomicUsize::new(0));
        let passes = Arc::new(AtomicUsize::new(0));
        let (c, p) = (Arc::clone(&calls), Arc::clone(&passes));
        let handler = move |o: &VoteOutcome| {
            c.fetch_add(1, Ordering::SeqCst);
            if o.passed {
                p.fetch_add(1, Ordering::SeqCst);
            }
        };
        (calls, passes, handler)
    }

    // ── creation ───────────────────────────────────────────────────────

    #[test]
    fn lone_player_cannot_start_a_vote() {
        let f = fixture(&[]);
        let err = f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap_err();
        assert_eq!(err, VoteError::InsufficientParticipants { population: 1 });
    }

    #[test]
    fn banned_players_do_not_count_toward_population() {
        let f = fixture(&["a"]);
        f.manager.registry().ban(voter("a"));
        let err = f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap_err();
        assert!(matches!(err, VoteError::InsufficientParticipants { .. }));
    }

    #[test]
    fn second_vote_in_same_scope_is_busy() {
        let f = fixture(&["a", "b"]);
        f.manager.create_vote(global("one"), |_: &VoteOutcome| {}).unwrap();
        let err = f.manager.create_vote(global("two"), |_: &VoteOutcome| {}).unwrap_err();
        assert_eq!(err, VoteError::ScopeBusy(VoteScope::Global));

        let group = VoteRequest::new(VoteScope::Group(red()), voter("creator"), "surrender");
        f.manager.create_vote(group, |_: &VoteOutcome| {}).unwrap();
        let again = VoteRequest::new(VoteScope::Group(red()), voter("a"), "surrender");
        let err = f.manager.create_vote(again, |_: &VoteOutcome| {}).unwrap_err();
        assert_eq!(err, VoteError::ScopeBusy(VoteScope::Group(red())));
        assert_eq!(f.manager.active_count(), 2);
    }

    #[test]
    fn population_check_wins_over_busy_scope() {
        let f = fixture(&["a"]);
        f.manager.create_vote(global("one"), |_: &VoteOutcome| {}).unwrap();
        f.manager.registry().leave(&voter("a"));
        let err = f.manager.create_vote(global("two"), |_: &VoteOutcome| {}).unwrap_err();
        assert!(matches!(err, VoteError::InsufficientParticipants { .. }));
    }

    #[test]
    fn empty_electorate_is_rejected() {
        let f = fixture(&["target"]);
        let request = global("kick").exclude(voter("target"));
        let err = f.manager.create_vote(request, |_: &VoteOutcome| {}).unwrap_err();
        assert_eq!(err, VoteError::NoEligibleVoters);
        assert_eq!(f.manager.active_count(), 0);
    }

    #[test]
    fn predicate_filters_electorate() {
        let f = fixture(&["a", "b", "c"]);
        let request = global("map").eligible_if(|v| v.as_str() != "c");
        let handle = f.manager.create_vote(request, |_: &VoteOutcome| {}).unwrap();
        assert_eq!(handle.electorate, 2);
        assert_eq!(handle.threshold, 2);
    }

    #[test]
    fn creator_is_never_in_the_electorate() {
        let f = fixture(&["a", "b"]);
        f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap();
        let snap = f.manager.snapshot(VoteScope::Global).unwrap();
        assert!(!snap.eligible.contains(&snap.creator));
        assert!(snap.eligible.is_disjoint(&snap.excluded));
    }

    #[test]
    fn electorate_is_prompted_after_creation() {
        let f = fixture(&["a", "b"]);
        let handle = f
            .manager
            .create_vote(global("map").description("switch to desert"), |_: &VoteOutcome| {})
            .unwrap();
        let prompts = f.recorder.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].session, handle.id);
        assert_eq!(prompts[0].description, "switch to desert");
        assert_eq!(prompts[0].voters, vec![voter("a"), voter("b")]);
    }

    // ── ballots ────────────────────────────────────────────────────────

    #[test]
    fn add_vote_without_session_is_ignored() {
        let f = fixture(&["a"]);
        assert_eq!(f.manager.add_vote(&voter("a")), BallotResult::NoSession);
    }

    #[test]
    fn add_vote_is_idempotent() {
        let f = fixture(&["a", "b", "c"]);
        f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap();
        assert_eq!(f.manager.add_vote(&voter("a")), BallotResult::Accepted);
        assert_eq!(f.manager.add_vote(&voter("a")), BallotResult::Duplicate);
        assert_eq!(f.manager.snapshot(VoteScope::Global).unwrap().ballots.len(), 1);
    }

    #[test]
    fn excluded_target_cannot_vote() {
        let f = fixture(&["a", "b", "target"]);
        f.manager
            .create_vote(global("kick").exclude(voter("target")), |_: &VoteOutcome| {})
            .unwrap();
        assert_eq!(f.manager.add_vote(&voter("target")), BallotResult::NotEligible);
        assert_eq!(f.manager.add_vote(&voter("creator")), BallotResult::NotEligible);
    }

    #[test]
    fn late_joiners_are_not_in_the_snapshot() {
        let f = fixture(&["a", "b"]);
        f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap();
        f.manager.registry().join(voter("late"), None);
        assert_eq!(f.manager.add_vote(&voter("late")), BallotResult::NotEligible);
    }

    #[test]
    fn choices_route_by_session_id() {
        let f = fixture(&["a", "b", "c"]);
        let group = VoteRequest::new(VoteScope::Group(red()), voter("creator"), "surrender");
        let handle = f.manager.create_vote(group, |_: &VoteOutcome| {}).unwrap();

        assert_eq!(f.manager.submit_choice(handle.id, &voter("a"), Choice::Yes), BallotResult::Accepted);
        assert_eq!(f.manager.submit_choice(handle.id, &voter("b"), Choice::No), BallotResult::Declined);
        assert_eq!(
            f.manager.submit_choice(SessionId::new(999), &voter("c"), Choice::Yes),
            BallotResult::NoSession
        );
        // the chat path only reaches the server-wide session
        assert_eq!(f.manager.add_vote(&voter("c")), BallotResult::NoSession);
        let snap = f.manager.snapshot(VoteScope::Group(red())).unwrap();
        assert_eq!(snap.ballots, BTreeSet::from([voter("a")]));
    }

    #[test]
    fn stale_prompt_answer_does_not_leak_into_next_session() {
        let f = fixture(&["a", "b"]);
        let first = f.manager.create_vote(global("one"), |_: &VoteOutcome| {}).unwrap();
        f.clock.advance_secs(22);
        f.manager.check_all_sessions();
        f.manager.create_vote(global("two"), |_: &VoteOutcome| {}).unwrap();
        assert_eq!(
            f.manager.submit_choice(first.id, &voter("a"), Choice::Yes),
            BallotResult::NoSession
        );
        assert!(f.manager.snapshot(VoteScope::Global).unwrap().ballots.is_empty());
    }

    // ── resolution ─────────────────────────────────────────────────────

    #[test]
    fn unanimous_yes_below_unreachable_threshold_fails_as_all_voted() {
        let params = VotingParams {
            global_pass_bps: 10_000,
            ..VotingParams::default()
        };
        let f = fixture_with(params, &["a", "b", "c"]);
        let (calls, passes, handler) = counting();
        let handle = f.manager.create_vote(global("map"), handler).unwrap();
        // ceil(1.0 * 4) = 4 > 3 voters
        assert_eq!(handle.threshold, 4);

        for v in ["a", "b", "c"] {
            assert_eq!(f.manager.add_vote(&voter(v)), BallotResult::Accepted);
        }
        let outcomes = f.manager.check_all_sessions();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].passed);
        assert_eq!(outcomes[0].reason, ResolveReason::AllVoted);
        assert_eq!(outcomes[0].ballots, 3);
        assert_eq!(outcomes[0].percent, 100);

        assert!(f.manager.check_all_sessions().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(passes.load(Ordering::SeqCst), 0);
        assert!(!f.manager.is_active(VoteScope::Global));
    }

    #[test]
    fn undecided_session_is_left_alone() {
        let f = fixture(&["a", "b", "c", "d", "e"]);
        let (calls, _, handler) = counting();
        f.manager.create_vote(global("map"), handler).unwrap();
        f.manager.add_vote(&voter("a"));
        for _ in 0..3 {
            assert!(f.manager.check_all_sessions().is_empty());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(f.manager.is_active(VoteScope::Global));
    }

    #[test]
    fn quorum_of_three_needs_all_three() {
        let f = fixture(&["a", "b", "c"]);
        let (calls, passes, handler) = counting();
        f.manager.create_vote(global("map"), handler).unwrap();
        f.manager.add_vote(&voter("a"));
        f.manager.add_vote(&voter("b"));
        assert!(f.manager.check_all_sessions().is_empty());

        f.manager.add_vote(&voter("c"));
        let outcomes = f.manager.check_all_sessions();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].passed);
        assert_eq!(outcomes[0].threshold, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(passes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn two_voters_need_unanimity() {
        let f = fixture(&["a", "b"]);
        let (calls, _, handler) = counting();
        f.manager.create_vote(global("map"), handler).unwrap();
        f.manager.add_vote(&voter("a"));
        assert!(f.manager.check_all_sessions().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn timeout_fails_the_vote_once() {
        let f = fixture(&["a", "b", "c", "d", "e"]);
        let (calls, passes, handler) = counting();
        f.manager.create_vote(global("map"), handler).unwrap();
        f.manager.add_vote(&voter("a"));

        f.clock.advance_secs(21);
        assert!(f.manager.check_all_sessions().is_empty());

        f.clock.advance_secs(1);
        let outcomes = f.manager.check_all_sessions();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].passed);
        assert_eq!(outcomes[0].reason, ResolveReason::TimedOut);
        assert_eq!(outcomes[0].percent, 20);

        for _ in 0..3 {
            assert!(f.manager.check_all_sessions().is_empty());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(passes.load(Ordering::SeqCst), 0);
        assert!(!f.manager.is_active(VoteScope::Global));
    }

    #[test]
    fn ballots_after_resolution_find_nothing() {
        let f = fixture(&["a", "b"]);
        f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap();
        f.manager.add_vote(&voter("a"));
        f.manager.add_vote(&voter("b"));
        assert_eq!(f.manager.check_all_sessions().len(), 1);
        assert_eq!(f.manager.add_vote(&voter("a")), BallotResult::NoSession);
    }

    #[test]
    fn group_sessions_use_the_stricter_ratio() {
        // eight voters: server needs 6, group needs 7
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let f = fixture(&names);
        let group = VoteRequest::new(VoteScope::Group(red()), voter("creator"), "surrender");
        let handle = f.manager.create_vote(group, |_: &VoteOutcome| {}).unwrap();
        assert_eq!(handle.threshold, 7);
        for v in &names[..6] {
            f.manager.submit_choice(handle.id, &voter(v), Choice::Yes);
        }
        assert!(f.manager.check_all_sessions().is_empty());
        f.manager.submit_choice(handle.id, &voter("g"), Choice::Yes);
        let outcomes = f.manager.check_all_sessions();
        assert!(outcomes[0].passed);
        assert_eq!(outcomes[0].scope, VoteScope::Group(red()));
    }

    #[test]
    fn scopes_resolve_independently() {
        let f = fixture(&["a", "b"]);
        let (global_calls, _, global_handler) = counting();
        let (group_calls, _, group_handler) = counting();
        f.manager.create_vote(global("map"), global_handler).unwrap();
        let group = VoteRequest::new(VoteScope::Group(red()), voter("creator"), "surrender");
        let handle = f.manager.create_vote(group, group_handler).unwrap();

        f.manager.submit_choice(handle.id, &voter("a"), Choice::Yes);
        f.manager.submit_choice(handle.id, &voter("b"), Choice::Yes);
        let outcomes = f.manager.check_all_sessions();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(group_calls.load(Ordering::SeqCst), 1);
        assert_eq!(global_calls.load(Ordering::SeqCst), 0);
        assert!(f.manager.is_active(VoteScope::Global));
    }

    #[test]
    fn resolution_is_announced() {
        let f = fixture(&["a", "b"]);
        f.manager.create_vote(global("map"), |_: &VoteOutcome| {}).unwrap();
        f.manager.add_vote(&voter("a"));
        f.manager.add_vote(&voter("b"));
        f.manager.check_all_sessions();
        let announcements = f.recorder.announcements.lock().unwrap();
        assert_eq!(announcements.len(), 2);
        assert!(matches!(announcements[0], VoteAnnouncement::Started { electorate: 2, .. }));
        assert!(matches!(&announcements[1], VoteAnnouncement::Resolved(o) if o.passed));
    }

    #[test]
    fn clearing_drops_sessions_without_handlers() {
        let f = fixture(&["a", "b"]);
        let (calls, _, handler) = counting();
        f.manager.create_vote(global("map"), handler).unwrap();
        let group = VoteRequest::new(VoteScope::Group(red()), voter("creator"), "surrender");
        f.manager.create_vote(group, |_: &VoteOutcome| {}).unwrap();

        assert_eq!(f.manager.clear_all_votes(), 2);
        f.clock.advance_secs(60);
        assert!(f.manager.check_all_sessions().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.manager.clear_all_votes(), 0);
    }

    #[test]
    fn global_accessors_reflect_live_session() {
        let f = fixture(&["a", "target"]);
        assert!(f.manager.global_creator().is_none());
        f.manager
            .create_vote(global("kick").exclude(voter("target")), |_: &VoteOutcome| {})
            .unwrap();
        assert_eq!(f.manager.global_creator(), Some(voter("creator")));
        assert_eq!(f.manager.global_excluded(), Some(BTreeSet::from([voter("target")])));
    }

    #[tokio::test]
    async fn outcome_can_be_awaited() {
        let f = fixture(&["a", "b"]);
        let (tx, rx) = outcome_channel();
        f.manager.create_vote(global("map"), tx).unwrap();
        f.manager.add_vote(&voter("a"));
        f.manager.add_vote(&voter("b"));
        f.manager.check_all_sessions();
        let outcome = rx.await.expect("outcome delivered");
        assert!(outcome.passed);
    }

    #[tokio::test]
    async fn cleared_session_closes_the_channel() {
        let f = fixture(&["a", "b"]);
        let (tx, rx) = outcome_channel();
        f.manager.create_vote(global("map"), tx).unwrap();
        f.manager.clear_all_votes();
        assert!(rx.await.is_err());
    }
}
