//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the voting core and the plugin (clock, confirmation
//! prompt, announcement sink, account storage) is abstracted behind a trait.
//! This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Record what they were asked to do, for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod accounts;
pub mod clock;
pub mod notifier;
pub mod prompt;

pub use accounts::NullAccountStore;
pub use clock::NullClock;
pub use notifier::RecordingNotifier;
pub use prompt::NullPrompt;
