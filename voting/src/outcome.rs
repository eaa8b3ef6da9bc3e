//! Vote outcomes and one-shot delivery.

use tokio::sync::oneshot;

use steward_types::VoterId;

use crate::scope::VoteScope;
use crate::session::SessionId;

/// Why a session stopped accepting ballots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveReason {
    /// Enough "yes" ballots to pass.
    ThresholdReached,
    /// Every eligible voter answered yes without reaching the threshold.
    AllVoted,
    /// The timeout elapsed first.
    TimedOut,
}

/// Final result of a session, delivered exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteOutcome {
    pub session: SessionId,
    pub scope: VoteScope,
    pub creator: VoterId,
    pub title: String,
    pub passed: bool,
    pub reason: ResolveReason,
    /// Number of "yes" ballots.
    pub ballots: usize,
    /// Size of the electorate snapshot.
    pub electorate: usize,
    pub threshold: usize,
    /// Informational only; never used for pass/fail.
    pub percent: u32,
}

/// Receives a session's outcome.
///
/// The handler is consumed on invocation, so it can run at most once. It is
/// called on the resolving thread while the manager lock is held: it must not
/// call back into the [`VoteManager`](crate::VoteManager).
pub trait OutcomeHandler: Send {
    fn resolved(self: Box<Self>, outcome: &VoteOutcome);
}

impl<F> OutcomeHandler for F
where
    F: FnOnce(&VoteOutcome) + Send,
{
    fn resolved(self: Box<Self>, outcome: &VoteOutcome) {
        (*self)(outcome)
    }
}

/// Sending half of [`outcome_channel`].
#[derive(Debug)]
pub struct OutcomeSender(oneshot::Sender<VoteOutcome>);

/// Awaitable outcome. Yields `Err` if the session was cleared instead of
/// resolved.
pub type OutcomeReceiver = oneshot::Receiver<VoteOutcome>;

/// Deliver the outcome through a future instead of a callback.
pub fn outcome_channel() -> (OutcomeSender, OutcomeReceiver) {
    let (tx, rx) = oneshot::channel();
    (OutcomeSender(tx), rx)
}

impl OutcomeHandler for OutcomeSender {
    fn resolved(self: Box<Self>, outcome: &VoteOutcome) {
        // receiver may have been dropped; nobody is waiting then
        let _ = self.0.send(outcome.clone());
    }
}
