//! Background task that resolves due votes.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::plugin::StewardPlugin;
use crate::shutdown::ShutdownController;

/// Poll every session at the configured interval until shutdown.
///
/// Must be called from within a tokio runtime.
pub fn spawn_resolver(plugin: Arc<StewardPlugin>, shutdown: &ShutdownController) -> JoinHandle<()> {
    let mut shutdown_rx = shutdown.subscribe();
    let period = plugin.config().voting.check_interval();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = period.as_millis() as u64, "vote resolver started");
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::info!("vote resolver shutting down");
                    break;
                }
                _ = interval.tick() => {
                    plugin.tick();
                }
            }
        }
    })
}
