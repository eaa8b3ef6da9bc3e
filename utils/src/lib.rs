//! Shared utilities for the Steward plugin.

pub mod stats;
pub mod time;

pub use stats::StatsCounter;
pub use time::format_duration;
