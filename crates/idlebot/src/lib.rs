//! # idlebot
//!
//! Session core for an always-online game bot.
//!
//! The bot keeps a roster of who is in the game, invites everyone it sees
//! into its party, accepts every party request, and leaves when its master
//! tells it `#exit`. The socket is somebody else's job: raw packets go in
//! through a [`ClientHandle`], encoded replies come out through a
//! [`PacketSink`](idlebot_transport::PacketSink).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idlebot::prelude::*;
//!
//! # async fn run() -> Result<(), IdlebotError> {
//! init_logging();
//! let config = SessionConfig::load("idlebot.toml").await?;
//! let (sink, mut outbound) = ChannelSink::new();
//! let (events_tx, mut events) = tokio::sync::mpsc::unbounded_channel();
//!
//! let (client, _task) = GameClient::spawn(config, sink, events_tx);
//! client.enter_game().await?;
//! // feed packets with client.deliver(bytes), write `outbound` to the socket
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod logging;

pub use client::{ClientHandle, DEFAULT_CHANNEL_SIZE, GameClient, SessionSnapshot};
pub use error::IdlebotError;
pub use logging::{DEFAULT_FILTER, init_logging};

/// Re-exports everything a bot application usually needs.
pub mod prelude {
    pub use crate::{ClientHandle, GameClient, IdlebotError, SessionSnapshot, init_logging};

    pub use idlebot_protocol::{
        Codec, GameCodec, InboundMessage, OutboundMessage, PlayerId, ProtocolError,
    };
    pub use idlebot_session::{
        GameSession, PlayerCount, SessionConfig, SessionError, SessionEvent, SessionPhase,
    };
    pub use idlebot_transport::{ChannelSink, PacketSink, TransportError, WriterSink};
}
