//! Localized message lookup.
//!
//! Bundles map message keys to templates with positional `{0}`, `{1}`, ...
//! placeholders. Lookup falls back from the requested language to the default
//! language, and finally to the key itself.

use std::collections::BTreeMap;
use std::path::Path;

use crate::PluginError;

/// English text for every key the plugin emits.
const BUILTIN_EN: &[(&str, &str)] = &[
    ("vote.kick.title", "Kick {0}?"),
    ("vote.kick.description", "{1} wants to kick {0}: {2}"),
    ("vote.map.title", "Change map to {0}?"),
    ("vote.map.description", "{1} wants to play {0} next"),
    ("vote.surrender.title", "Surrender?"),
    ("vote.surrender.description", "{0} wants your team to surrender"),
    ("vote.started", "Vote: {0} ({1} of {2} needed, {3} left). Type y to agree."),
    ("vote.started.group", "Team vote: {0} ({1} of {2} needed, {3} left)"),
    ("vote.passed", "Vote passed: {0} ({1}%)"),
    ("vote.failed", "Vote failed: {0} ({1}%)"),
    ("vote.error.insufficient", "Not enough players online to start a vote."),
    ("vote.error.busy", "A vote is already running for the {0}."),
    ("vote.error.no_voters", "Nobody is eligible to answer that vote."),
    ("command.usage.votekick", "Usage: !votekick <player> [reason]"),
    ("command.usage.votemap", "Usage: !votemap <map>"),
    ("command.usage.ban", "Usage: !ban <player> [reason]"),
    ("command.usage.unban", "Usage: !unban <player>"),
    ("command.unknown_player", "No online player matches {0}."),
    ("command.unknown_map", "Unknown map {0}. Available: {1}"),
    ("command.no_team", "You are not on a team."),
    ("command.not_admin", "Only admins can do that."),
    ("command.cannot_kick_admin", "{0} is an admin and cannot be kicked."),
    ("command.cannot_target_self", "You cannot target yourself."),
    ("ban.kicked", "You are banned: {0}"),
    ("ban.done", "{0} was banned."),
    ("unban.done", "{0} was unbanned."),
    ("reason.none", "no reason given"),
];

type Bundle = BTreeMap<String, String>;

/// Language bundles plus the default language.
#[derive(Clone, Debug)]
pub struct Locale {
    default_language: String,
    bundles: BTreeMap<String, Bundle>,
}

impl Locale {
    /// Built-in English only.
    pub fn builtin(default_language: impl Into<String>) -> Self {
        let english = BUILTIN_EN
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            default_language: default_language.into(),
            bundles: BTreeMap::from([("en".to_string(), english)]),
        }
    }

    /// Built-in English plus every `<lang>.json` in `dir`.
    ///
    /// A missing directory is not an error. Keys in a file override the
    /// built-in text of the same language.
    pub fn load_dir(dir: &Path, default_language: impl Into<String>) -> Result<Self, PluginError> {
        let mut locale = Self::builtin(default_language);
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "no locale directory, using built-in text");
            return Ok(locale);
        }
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)?;
            let bundle: Bundle = serde_json::from_str(&content)
                .map_err(|e| PluginError::Locale(format!("{}: {e}", path.display())))?;
            tracing::debug!(lang, keys = bundle.len(), "loaded locale bundle");
            locale.insert_bundle(lang, bundle);
        }
        Ok(locale)
    }

    /// Merge `bundle` into the bundle for `lang`.
    pub fn insert_bundle(&mut self, lang: &str, bundle: Bundle) {
        self.bundles.entry(lang.to_string()).or_default().extend(bundle);
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    /// Look up `key` and substitute `args` into its placeholders.
    pub fn text(&self, lang: &str, key: &str, args: &[&str]) -> String {
        let template = self
            .lookup(lang, key)
            .or_else(|| self.lookup(&self.default_language, key))
            .or_else(|| self.lookup("en", key))
            .unwrap_or(key);
        substitute(template, args)
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.bundles.get(lang)?.get(key).map(String::as_str)
    }
}

fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}
