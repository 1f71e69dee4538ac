//! Wire protocol for the idlebot game client.
//!
//! This crate defines the "language" the bot speaks with a game server:
//!
//! - **Types** ([`InboundMessage`], [`OutboundMessage`], [`PlayerId`], etc.)
//!   the closed set of messages the bot understands or sends.
//! - **Codec** ([`Codec`] trait, [`GameCodec`]) converting those messages
//!   to and from little-endian binary payloads.
//! - **Errors** ([`ProtocolError`], [`DecodeError`]) for payloads that
//!   can't be parsed.
//!
//! # Architecture
//!
//! ```text
//! Transport (framed bytes) → Protocol (InboundMessage) → Session (roster, party, chat)
//! ```
//!
//! The protocol layer keeps no state. It doesn't know who is in the game
//! or what phase the session is in; it only parses and builds packets.

mod clock;
mod codec;
mod error;
mod reader;
mod types;
mod writer;

pub use clock::PingClock;
pub use codec::{Codec, GameCodec};
pub use error::{DecodeError, DecodeFault, ProtocolError};
pub use types::{
    ChatKind, ChatMessage, InboundKind, InboundMessage, InformationEvent,
    InformationMessage, NO_PARTY, OutboundMessage, PING_AUX, PartyAction,
    PartyRequest, PlayerId, PlayerPresence, WorldItemAction,
};
