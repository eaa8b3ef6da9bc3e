//! Account records and permission levels.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use steward_types::VoterId;

/// Current wall-clock time in Unix seconds. Zero if the clock is before 1970.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// What a player is allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Banned,
    Player,
    Admin,
}

impl PermissionLevel {
    pub fn can_vote(&self) -> bool {
        *self >= Self::Player
    }

    pub fn can_moderate(&self) -> bool {
        *self >= Self::Admin
    }
}

/// A persisted player record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: VoterId,
    /// Last display name seen for this player.
    pub name: String,
    /// Preferred language code (e.g. `"en"`); `None` means server default.
    #[serde(default)]
    pub language: Option<String>,
    /// Granted by an operator in the account file, independent of the host.
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub ban_reason: Option<String>,
    /// Unix seconds.
    pub first_seen: u64,
    /// Unix seconds.
    pub last_seen: u64,
    #[serde(default)]
    pub times_joined: u64,
}

impl Account {
    pub fn new(id: VoterId, name: impl Into<String>, now: u64) -> Self {
        Self {
            id,
            name: name.into(),
            language: None,
            admin: false,
            banned: false,
            ban_reason: None,
            first_seen: now,
            last_seen: now,
            times_joined: 0,
        }
    }

    /// Record a join under `name` at `now`.
    pub fn touch(&mut self, name: &str, now: u64) {
        if self.name != name {
            tracing::debug!(account = %self.id, old = %self.name, new = %name, "player renamed");
            self.name = name.to_string();
        }
        self.last_seen = now;
        self.times_joined += 1;
    }

    /// Effective permission, combining our flags with the host's admin flag.
    ///
    /// A ban overrides everything, including host admin status.
    pub fn permission(&self, host_admin: bool) -> PermissionLevel {
        if self.banned {
            PermissionLevel::Banned
        } else if self.admin || host_admin {
            PermissionLevel::Admin
        } else {
            PermissionLevel::Player
        }
    }
}
