//! Plugin configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use steward_voting::quorum::BPS_DENOMINATOR;
use steward_voting::VotingParams;

use crate::logging::LogFormat;
use crate::PluginError;

/// Configuration for the Steward plugin.
///
/// Can be loaded from a TOML file via [`PluginConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Directory holding the account file and locale bundles.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Account file name, relative to `data_dir`.
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,

    /// Locale bundle directory, relative to `data_dir`.
    #[serde(default = "default_locale_dir")]
    pub locale_dir: String,

    /// Language used when a player has no preference or a key is missing.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Maps that may be proposed with `!votemap`. Empty allows any name.
    #[serde(default)]
    pub maps: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub voting: VotingParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./steward_data")
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_locale_dir() -> String {
    "locales".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PluginConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, PluginError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PluginError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, PluginError> {
        let config: Self = toml::from_str(s).map_err(|e| PluginError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, PluginError> {
        toml::to_string_pretty(self).map_err(|e| PluginError::Config(e.to_string()))
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.accounts_file)
    }

    pub fn locale_path(&self) -> PathBuf {
        self.data_dir.join(&self.locale_dir)
    }

    pub fn log_format(&self) -> Result<LogFormat, PluginError> {
        match self.log_format.as_str() {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(PluginError::Config(format!(
                "log_format must be \"human\" or \"json\", got {other:?}"
            ))),
        }
    }

    /// Reject values the voting core cannot work with.
    pub fn validate(&self) -> Result<(), PluginError> {
        let v = &self.voting;
        for (name, bps) in [
            ("global_pass_bps", v.global_pass_bps),
            ("group_pass_bps", v.group_pass_bps),
        ] {
            if bps == 0 || u64::from(bps) > BPS_DENOMINATOR {
                return Err(PluginError::Config(format!(
                    "voting.{name} must be within 1..={BPS_DENOMINATOR}, got {bps}"
                )));
            }
        }
        if v.check_interval_ms == 0 {
            return Err(PluginError::Config(
                "voting.check_interval_ms must be positive".to_string(),
            ));
        }
        if self.default_language.trim().is_empty() {
            return Err(PluginError::Config("default_language must not be empty".to_string()));
        }
        self.log_format()?;
        Ok(())
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            accounts_file: default_accounts_file(),
            locale_dir: default_locale_dir(),
            default_language: default_language(),
            maps: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            voting: VotingParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = PluginConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = PluginConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.voting, config.voting);
        assert_eq!(parsed.accounts_path(), config.accounts_path());
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = PluginConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.voting.timeout_secs, 21);
        assert_eq!(config.voting.global_pass_bps, 6500);
        assert_eq!(config.default_language, "en");
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            maps = ["desert", "tundra"]

            [voting]
            timeout_secs = 30
            group_pass_bps = 7500
        "#;
        let config = PluginConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.maps, vec!["desert", "tundra"]);
        assert_eq!(config.voting.timeout_secs, 30);
        assert_eq!(config.voting.group_pass_bps, 7500);
        assert_eq!(config.voting.global_pass_bps, 6500); // default
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let err = PluginConfig::from_toml_str("[voting]\nglobal_pass_bps = 12000").unwrap_err();
        assert!(matches!(err, PluginError::Config(msg) if msg.contains("global_pass_bps")));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = PluginConfig::from_toml_str("log_format = \"xml\"").unwrap_err();
        assert!(matches!(err, PluginError::Config(_)));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = PluginConfig::from_toml_file("/nonexistent/steward.toml");
        assert!(matches!(result, Err(PluginError::Config(_))));
    }
}
