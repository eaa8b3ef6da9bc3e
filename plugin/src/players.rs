//! Display names and languages of online players.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use steward_types::VoterId;

#[derive(Clone, Debug)]
struct Entry {
    name: String,
    language: Option<String>,
}

/// What the plugin needs to talk to and about online players.
///
/// The voter registry owns membership; this only carries presentation data
/// keyed by the same identities.
pub struct PlayerDirectory {
    default_language: String,
    entries: RwLock<BTreeMap<VoterId, Entry>>,
}

impl PlayerDirectory {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn insert(&self, id: VoterId, name: impl Into<String>, language: Option<String>) {
        let entry = Entry {
            name: name.into(),
            language,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, entry);
    }

    pub fn remove(&self, id: &VoterId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    /// Display name, or the raw identity for unknown players.
    pub fn name_of(&self, id: &VoterId) -> String {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn language_of(&self, id: &VoterId) -> String {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .and_then(|e| e.language.clone())
            .unwrap_or_else(|| self.default_language.clone())
    }

    /// Find an online player from command input.
    ///
    /// Tries the exact identity, then the display name ignoring case, then a
    /// unique case-insensitive name prefix.
    pub fn resolve(&self, query: &str) -> Option<VoterId> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let exact = VoterId::new(query);
        if entries.contains_key(&exact) {
            return Some(exact);
        }
        if let Some((id, _)) = entries.iter().find(|(_, e)| e.name.eq_ignore_ascii_case(query)) {
            return Some(id.clone());
        }
        let needle = query.to_ascii_lowercase();
        let mut matches = entries
            .iter()
            .filter(|(_, e)| e.name.to_ascii_lowercase().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some((id, _)), None) if !needle.is_empty() => Some(id.clone()),
            _ => None,
        }
    }
}
