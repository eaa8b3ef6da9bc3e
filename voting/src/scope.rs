//! Electorate boundary of a vote.

use serde::{Deserialize, Serialize};
use std::fmt;

use steward_types::GroupId;

/// Which part of the server a vote is held among.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteScope {
    /// Every online player.
    Global,
    /// Members of a single group (team) only.
    Group(GroupId),
}

impl VoteScope {
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// The group this scope is restricted to, if any.
    pub fn group(&self) -> Option<GroupId> {
        match self {
            Self::Global => None,
            Self::Group(g) => Some(*g),
        }
    }
}

impl fmt::Display for VoteScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "server"),
            Self::Group(g) => write!(f, "group {}", g),
        }
    }
}
