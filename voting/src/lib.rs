//! Voting core: scoped, time-boxed yes/no votes among online players.
//!
//! A vote is proposed by one player and answered by an electorate snapshot
//! taken at creation time. Only affirmative ballots are recorded. A periodic
//! caller asks the manager to resolve sessions; a session resolves when it
//! reaches its quorum threshold, when everybody has voted, or when it times
//! out. Its outcome handler fires exactly once and the session is discarded.
//!
//! ## Module overview
//!
//! - [`scope`]: Server-wide vs. per-group electorate boundary.
//! - [`registry`]: Who is online, in which group, and who is banned.
//! - [`quorum`]: Pass-threshold and display-percentage arithmetic.
//! - [`session`]: A single in-flight vote and its tally.
//! - [`outcome`]: Resolution results and one-shot outcome handlers.
//! - [`prompt`]: Confirmation prompt collaborator interface.
//! - [`notify`]: Announcement sink interface.
//! - [`manager`]: Owns all sessions; create, ballot, resolve, clear.
//! - [`chat`]: Adapter turning a bare "y" chat reply into a ballot.
//! - [`params`]: Tunable ratios, timeout and polling cadence.
//! - [`error`]: Vote creation errors.

pub mod chat;
pub mod error;
pub mod manager;
pub mod notify;
pub mod outcome;
pub mod params;
pub mod prompt;
pub mod quorum;
pub mod registry;
pub mod scope;
pub mod session;

pub use chat::ChatShorthand;
pub use error::VoteError;
pub use manager::{SessionHandle, VoteManager, VoteRequest};
pub use notify::{VoteAnnouncement, VoteNotifier};
pub use outcome::{outcome_channel, OutcomeHandler, OutcomeReceiver, OutcomeSender, ResolveReason, VoteOutcome};
pub use params::VotingParams;
pub use prompt::{Choice, ConfirmationPrompt, PromptRequest};
pub use quorum::{display_percent, pass_threshold};
pub use registry::VoterRegistry;
pub use scope::VoteScope;
pub use session::{BallotResult, SessionId, SessionSnapshot, Tally, VoteSession};
