use thiserror::Error;

use crate::scope::VoteScope;

/// Reasons a vote cannot be started.
///
/// These are the only failures in the voting core. Ballot acceptance and
/// resolution never fail; they either apply or are silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("not enough players online to hold a vote: {population} eligible")]
    InsufficientParticipants { population: usize },

    #[error("a vote is already running for {0}")]
    ScopeBusy(VoteScope),

    #[error("nobody is eligible to vote on this proposal")]
    NoEligibleVoters,
}
