//! Steward host plugin.
//!
//! Glues the voting core to a game server: the host forwards [`HostEvent`]s,
//! the plugin keeps accounts and the voter registry current, turns chat
//! commands into votes, and carries out passed votes through [`HostApi`].
//!
//! ## Module overview
//!
//! - [`plugin`]: Event routing, vote kinds and their consequences.
//! - [`host`]: Host operations and events.
//! - [`commands`]: `!votekick`, `!votemap`, `!surrender`, `!ban`, `!unban`.
//! - [`prompt`] / [`announcer`]: Voting collaborators backed by the host.
//! - [`players`]: Display names and languages of online players.
//! - [`locale`]: Localized message templates.
//! - [`resolver`]: Periodic session resolution task.
//! - [`config`], [`logging`], [`shutdown`], [`error`]: Plumbing.

pub mod announcer;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod locale;
pub mod logging;
pub mod players;
pub mod plugin;
pub mod prompt;
pub mod resolver;
pub mod shutdown;

pub use announcer::HostNotifier;
pub use commands::Command;
pub use config::PluginConfig;
pub use error::PluginError;
pub use host::{Disposition, HostApi, HostEvent};
pub use locale::Locale;
pub use logging::{init_logging, LogFormat};
pub use players::PlayerDirectory;
pub use plugin::{StewardPlugin, VoteKind, STAT_NAMES};
pub use prompt::MenuPrompt;
pub use resolver::spawn_resolver;
pub use shutdown::ShutdownController;
