//! Fundamental types for the Steward plugin.
//!
//! This crate defines the identifiers and time primitives shared across every
//! other crate in the workspace: voter identities, group (team) identifiers,
//! timestamps and the clock abstraction.

pub mod group;
pub mod time;
pub mod voter;

pub use group::GroupId;
pub use time::{Clock, MonotonicClock, Timestamp};
pub use voter::VoterId;
