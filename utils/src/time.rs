//! Time formatting helpers.

use std::time::Duration;

/// Format a duration as a short human-readable string for chat messages.
///
/// Sub-second remainders are dropped: `21.9s` renders as `21s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
