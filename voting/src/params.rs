//! Tunable voting parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scope::VoteScope;

/// Ratios, timeout and polling cadence for vote resolution.
///
/// Loaded from the `[voting]` table of the plugin configuration; every field
/// has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingParams {
    /// Pass ratio for server-wide votes, in basis points.
    #[serde(default = "default_global_pass_bps")]
    pub global_pass_bps: u32,

    /// Pass ratio for group votes, in basis points.
    #[serde(default = "default_group_pass_bps")]
    pub group_pass_bps: u32,

    /// A session resolves once strictly more than this many seconds have elapsed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How often the resolver polls all sessions.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,

    /// Whether a bare "y" in chat counts as a ballot on the server-wide vote.
    #[serde(default = "default_true")]
    pub chat_shorthand: bool,
}

fn default_global_pass_bps() -> u32 {
    6500
}

fn default_group_pass_bps() -> u32 {
    7000
}

fn default_timeout_secs() -> u64 {
    21
}

fn default_check_interval_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

impl VotingParams {
    pub fn pass_bps(&self, scope: VoteScope) -> u32 {
        match scope {
            VoteScope::Global => self.global_pass_bps,
            VoteScope::Group(_) => self.group_pass_bps,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

impl Default for VotingParams {
    fn default() -> Self {
        Self {
            global_pass_bps: default_global_pass_bps(),
            group_pass_bps: default_group_pass_bps(),
            timeout_secs: default_timeout_secs(),
            check_interval_ms: default_check_interval_ms(),
            chat_shorthand: default_true(),
        }
    }
}
