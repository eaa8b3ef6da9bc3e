//! A single in-flight vote.
//!
//! A session is `Active` from creation until the resolve pass finds it done;
//! it is then consumed by [`VoteSession::resolve`], which fires the outcome
//! handler. There is no intermediate or re-openable state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use steward_types::{Timestamp, VoterId};

use crate::outcome::{OutcomeHandler, ResolveReason, VoteOutcome};
use crate::params::VotingParams;
use crate::quorum::{display_percent, pass_threshold};
use crate::scope::VoteScope;

/// Manager-assigned session number, unique for the manager's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vote-{}", self.0)
    }
}

/// Result of offering a ballot to a session.
///
/// None of these are errors; duplicates and strays are expected in
/// interactive use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallotResult {
    /// Counted.
    Accepted,
    /// This identity already voted yes.
    Duplicate,
    /// Not part of the electorate snapshot (creator, excluded, banned, late joiner).
    NotEligible,
    /// A "no" answer; only affirmative ballots are recorded.
    Declined,
    /// No live session matched.
    NoSession,
}

/// Counts derived from a session at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub ok: usize,
    pub threshold: usize,
    pub elapsed: Duration,
    pub timed_out: bool,
}

impl Tally {
    pub fn all_voted(&self) -> bool {
        self.ok >= self.total
    }

    pub fn passed(&self) -> bool {
        self.ok >= self.threshold
    }

    pub fn done(&self) -> bool {
        self.passed() || self.all_voted() || self.timed_out
    }

    pub fn percent(&self) -> u32 {
        display_percent(self.ok, self.total)
    }

    pub fn reason(&self) -> ResolveReason {
        if self.passed() {
            ResolveReason::ThresholdReached
        } else if self.all_voted() {
            ResolveReason::AllVoted
        } else {
            ResolveReason::TimedOut
        }
    }
}

/// A single vote awaiting resolution.
///
/// Owned by the [`VoteManager`](crate::VoteManager) for its whole life.
pub struct VoteSession {
    id: SessionId,
    scope: VoteScope,
    creator: VoterId,
    title: String,
    description: String,
    /// Electorate snapshot; never re-evaluated.
    eligible: BTreeSet<VoterId>,
    excluded: BTreeSet<VoterId>,
    /// Affirmative ballots. Always a subset of `eligible`.
    ballots: BTreeSet<VoterId>,
    started_at: Timestamp,
    handler: Box<dyn OutcomeHandler>,
}

/// Read-only copy of a session's state, for callers outside the manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub scope: VoteScope,
    pub creator: VoterId,
    pub title: String,
    pub description: String,
    pub eligible: BTreeSet<VoterId>,
    pub excluded: BTreeSet<VoterId>,
    pub ballots: BTreeSet<VoterId>,
    pub started_at: Timestamp,
}

impl VoteSession {
    /// Build a session. `eligible` must already exclude the creator and the
    /// excluded set; any stragglers are removed here to keep the invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SessionId,
        scope: VoteScope,
        creator: VoterId,
        title: String,
        description: String,
        mut eligible: BTreeSet<VoterId>,
        excluded: BTreeSet<VoterId>,
        started_at: Timestamp,
        handler: Box<dyn OutcomeHandler>,
    ) -> Self {
        eligible.remove(&creator);
        eligible.retain(|v| !excluded.contains(v));
        Self {
            id,
            scope,
            creator,
            title,
            description,
            eligible,
            excluded,
            ballots: BTreeSet::new(),
            started_at,
            handler,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn scope(&self) -> VoteScope {
        self.scope
    }

    pub fn creator(&self) -> &VoterId {
        &self.creator
    }

    pub fn excluded(&self) -> &BTreeSet<VoterId> {
        &self.excluded
    }

    pub fn eligible(&self) -> &BTreeSet<VoterId> {
        &self.eligible
    }

    pub fn ballots(&self) -> &BTreeSet<VoterId> {
        &self.ballots
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Record a "yes" ballot.
    pub fn add_ballot(&mut self, voter: &VoterId) -> BallotResult {
        if self.ballots.contains(voter) {
            return BallotResult::Duplicate;
        }
        if !self.eligible.contains(voter) {
            return BallotResult::NotEligible;
        }
        self.ballots.insert(voter.clone());
        BallotResult::Accepted
    }

    pub fn tally(&self, now: Timestamp, params: &VotingParams) -> Tally {
        let total = self.eligible.len();
        let elapsed = self.started_at.elapsed_since(now);
        Tally {
            total,
            ok: self.ballots.len(),
            threshold: pass_threshold(total, params.pass_bps(self.scope)),
            elapsed,
            timed_out: elapsed > params.timeout(),
        }
    }

    /// Consume the session, fire its handler and return the outcome.
    pub fn resolve(self, tally: Tally) -> VoteOutcome {
        let outcome = VoteOutcome {
            session: self.id,
            scope: self.scope,
            creator: self.creator,
            title: self.title,
            passed: tally.passed(),
            reason: tally.reason(),
            ballots: tally.ok,
            electorate: tally.total,
            threshold: tally.threshold,
            percent: tally.percent(),
        };
        self.handler.resolved(&outcome);
        outcome
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            scope: self.scope,
            creator: self.creator.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            eligible: self.eligible.clone(),
            excluded: self.excluded.clone(),
            ballots: self.ballots.clone(),
            started_at: self.started_at,
        }
    }
}

impl fmt::Debug for VoteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoteSession")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("creator", &self.creator)
            .field("title", &self.title)
            .field("eligible", &self.eligible.len())
            .field("ballots", &self.ballots.len())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
