//! What handlers produce: packets to send and events to report.
//!
//! Handlers don't touch the network or the orchestrator directly. They
//! return a list of [`Effect`]s in the order they happened, and whoever
//! drives the session (see the `idlebot` crate) carries them out.

use idlebot_protocol::OutboundMessage;

/// A roster change as reported to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCount {
    /// Roster size after the change.
    pub count: usize,
    /// Configured capacity.
    pub max: usize,
    pub player_name: String,
    /// `true` for a join, `false` for any kind of leave.
    pub joined: bool,
    pub is_bot: bool,
}

/// Notifications flowing up to whatever orchestrates the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PlayerCountChanged(PlayerCount),
    /// The master asked the bot to shut down.
    ShutdownRequested,
}

/// One thing a handler wants done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Encode and hand to the transport (fire-and-forget).
    Send(OutboundMessage),
    /// Report to the event sink.
    Notify(SessionEvent),
}
