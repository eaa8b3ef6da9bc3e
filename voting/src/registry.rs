//! Voter registry: the live roster the electorate is drawn from.
//!
//! The host layer keeps the registry current (joins, leaves, team changes,
//! bans). The vote manager only reads it, when a session is created, to take
//! an electorate snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use steward_types::{GroupId, VoterId};

use crate::scope::VoteScope;

#[derive(Default)]
struct Roster {
    /// Online participants and the group each currently belongs to.
    online: BTreeMap<VoterId, Option<GroupId>>,
    /// Identities barred from every vote, online or not.
    banned: BTreeSet<VoterId>,
}

/// Thread-safe roster of online participants and banned identities.
#[derive(Default)]
pub struct VoterRegistry {
    roster: RwLock<Roster>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Roster> {
        self.roster.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Roster> {
        self.roster.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a participant online. Re-joining updates their group.
    pub fn join(&self, id: VoterId, group: Option<GroupId>) {
        self.write().online.insert(id, group);
    }

    /// Mark a participant offline. Returns whether they were online.
    pub fn leave(&self, id: &VoterId) -> bool {
        self.write().online.remove(id).is_some()
    }

    /// Move an online participant to another group. Ignored for offline ids.
    pub fn assign_group(&self, id: &VoterId, group: Option<GroupId>) {
        if let Some(slot) = self.write().online.get_mut(id) {
            *slot = group;
        }
    }

    pub fn ban(&self, id: VoterId) {
        self.write().banned.insert(id);
    }

    pub fn unban(&self, id: &VoterId) -> bool {
        self.write().banned.remove(id)
    }

    pub fn is_banned(&self, id: &VoterId) -> bool {
        self.read().banned.contains(id)
    }

    pub fn is_online(&self, id: &VoterId) -> bool {
        self.read().online.contains_key(id)
    }

    pub fn group_of(&self, id: &VoterId) -> Option<GroupId> {
        self.read().online.get(id).copied().flatten()
    }

    /// Everyone online, in identity order.
    pub fn online(&self) -> Vec<VoterId> {
        self.read().online.keys().cloned().collect()
    }

    /// Online participants that are not banned.
    pub fn eligible_population(&self) -> usize {
        let roster = self.read();
        roster
            .online
            .keys()
            .filter(|id| !roster.banned.contains(*id))
            .count()
    }

    /// Online members of `group`.
    pub fn members(&self, group: GroupId) -> Vec<VoterId> {
        self.read()
            .online
            .iter()
            .filter(|(_, g)| **g == Some(group))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Compute the electorate for a new vote.
    ///
    /// Online, not banned, accepted by `eligible`, not the creator, not in
    /// `excluded`, and inside the scope's group when there is one.
    pub fn electorate(
        &self,
        scope: VoteScope,
        creator: &VoterId,
        excluded: &BTreeSet<VoterId>,
        eligible: &dyn Fn(&VoterId) -> bool,
    ) -> BTreeSet<VoterId> {
        let roster = self.read();
        roster
            .online
            .iter()
            .filter(|(_, group)| match scope {
                VoteScope::Global => true,
                VoteScope::Group(g) => **group == Some(g),
            })
            .map(|(id, _)| id)
            .filter(|id| *id != creator)
            .filter(|id| !excluded.contains(*id))
            .filter(|id| !roster.banned.contains(*id))
            .filter(|id| eligible(id))
            .cloned()
            .collect()
    }
}
