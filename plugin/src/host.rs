//! The game server as seen from the plugin.

use steward_types::{GroupId, VoterId};
use steward_voting::SessionId;

/// Operations the host game server exposes to the plugin.
///
/// Calls are fire-and-forget: the host queues them onto its own thread. They
/// may be invoked from inside an outcome handler, so implementations must not
/// call back into the plugin synchronously.
pub trait HostApi: Send + Sync {
    fn broadcast(&self, message: &str);
    fn send_to_group(&self, group: GroupId, message: &str);
    fn send_to_player(&self, player: &VoterId, message: &str);

    /// Show a yes/no menu. The answer comes back as [`HostEvent::MenuChoice`].
    fn show_confirmation(&self, player: &VoterId, session: SessionId, title: &str, description: &str);

    fn kick(&self, player: &VoterId, reason: &str);
    fn change_map(&self, map: &str);
    fn surrender(&self, group: GroupId);

    /// Whether the host itself considers `player` an administrator.
    fn is_admin(&self, player: &VoterId) -> bool;
}

/// Everything the host forwards to the plugin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    PlayerJoined {
        id: VoterId,
        name: String,
        group: Option<GroupId>,
    },
    PlayerLeft {
        id: VoterId,
    },
    TeamChanged {
        id: VoterId,
        group: Option<GroupId>,
    },
    Chat {
        sender: VoterId,
        message: String,
    },
    MenuChoice {
        player: VoterId,
        session: SessionId,
        accepted: bool,
    },
    GameReset,
    GameOver {
        winner: Option<GroupId>,
    },
}

/// Whether the host should keep processing an event after the plugin saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Pass on as usual (e.g. show the chat line).
    Continue,
    /// The plugin handled it; suppress default handling.
    Consumed,
}
