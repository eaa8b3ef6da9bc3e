//! Player accounts for the Steward plugin.
//!
//! Accounts are keyed by the host's player identity and persisted as a single
//! JSON document. There is no database: the whole file is rewritten on every
//! change, which is fine for the few hundred records a game server sees.

pub mod account;
pub mod error;
pub mod json;
pub mod store;

pub use account::{unix_now_secs, Account, PermissionLevel};
pub use error::AccountError;
pub use json::JsonAccountStore;
pub use store::AccountStore;
