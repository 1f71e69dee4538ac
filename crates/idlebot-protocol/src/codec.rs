//! Codec trait and the binary game-server codec.
//!
//! A codec turns raw payloads into [`InboundMessage`]s and
//! [`OutboundMessage`]s back into payloads. The session layer only talks
//! to the [`Codec`] trait, so a recorded-traffic or test codec can stand in
//! for [`GameCodec`].
//!
//! Framing is the transport's job: every payload handed to `decode` is one
//! complete packet whose first byte is the kind tag.

use crate::reader::{NAME_LEN, PacketReader};
use crate::writer::PacketWriter;
use crate::{
    ChatKind, ChatMessage, DecodeError, DecodeFault, InboundKind,
    InboundMessage, InformationEvent, InformationMessage, OutboundMessage,
    PlayerId, PlayerPresence, ProtocolError, WorldItemAction,
};

/// Converts between payload bytes and typed messages.
///
/// `Send + Sync + 'static` so a codec can live inside the session task.
pub trait Codec: Send + Sync + 'static {
    /// Decodes one inbound payload.
    ///
    /// Unknown tags are not an error: they come back as
    /// [`InboundMessage::Ignored`].
    ///
    /// # Errors
    /// - [`ProtocolError::EmptyPacket`] if `data` has no tag byte
    /// - [`ProtocolError::Decode`] if a recognized kind is malformed
    fn decode(&self, data: &[u8]) -> Result<InboundMessage, ProtocolError>;

    /// Encodes one outbound message. Infallible.
    fn encode(&self, msg: &OutboundMessage) -> Vec<u8>;
}

// Outbound tags.
const TAG_OVERHEAD: u8 = 0x14;
const TAG_CHAT: u8 = 0x15;
const TAG_PARTY_REQUEST: u8 = 0x5E;
const TAG_EXIT_GAME: u8 = 0x69;
const TAG_PING: u8 = 0x6D;

const CHAT_TO_ALL: u16 = 0x0001;
const CHAT_TO_TARGET: u16 = 0x0002;

// ---------------------------------------------------------------------------
// GameCodec
// ---------------------------------------------------------------------------

/// The little-endian binary codec spoken by the game server.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameCodec;

impl Codec for GameCodec {
    fn decode(&self, data: &[u8]) -> Result<InboundMessage, ProtocolError> {
        let (&tag, _) = data.split_first().ok_or(ProtocolError::EmptyPacket)?;
        let Some(kind) = InboundKind::from_tag(tag) else {
            return Ok(InboundMessage::Ignored(tag));
        };

        let decoded = match kind {
            InboundKind::GameMessage => decode_game_message(data).map(InboundMessage::GameMessage),
            InboundKind::InformationMessage => {
                decode_information(data).map(InboundMessage::InformationMessage)
            }
            InboundKind::PlayerPresence => {
                decode_presence(data).map(InboundMessage::PlayerPresence)
            }
            InboundKind::WorldItemAction => {
                decode_world_item(data).map(InboundMessage::WorldItemAction)
            }
        };

        decoded.map_err(|fault| DecodeError::new(kind, fault, data).into())
    }

    fn encode(&self, msg: &OutboundMessage) -> Vec<u8> {
        match msg {
            OutboundMessage::Chat { text, target } => {
                let (mode, target) = match target {
                    Some(target) => (CHAT_TO_TARGET, target.as_str()),
                    None => (CHAT_TO_ALL, ""),
                };
                PacketWriter::new(TAG_CHAT)
                    .u16(mode)
                    .cstr(text)
                    .cstr(target)
                    .u8(0)
                    .finish()
            }
            OutboundMessage::Overhead { text } => PacketWriter::new(TAG_OVERHEAD)
                .u16(0)
                .cstr(text)
                .u8(0)
                .u8(0)
                .finish(),
            OutboundMessage::PartyRequest(req) => {
                PacketWriter::new(TAG_PARTY_REQUEST)
                    .u8(req.action.code())
                    .u32(req.target.0)
                    .finish()
            }
            OutboundMessage::ExitGame => PacketWriter::new(TAG_EXIT_GAME).finish(),
            OutboundMessage::Ping { timestamp, aux } => PacketWriter::new(TAG_PING)
                .u32(*timestamp)
                .u32(u32::from(*aux))
                .u32(0)
                .finish(),
        }
    }
}

impl GameCodec {
    /// Builds the payload a game server would send for `msg`.
    ///
    /// The client never needs this at runtime; it exists for fake servers
    /// in tests and for replaying captured sessions.
    pub fn encode_inbound(&self, msg: &InboundMessage) -> Vec<u8> {
        match msg {
            InboundMessage::GameMessage(chat) => {
                let code = match chat.kind {
                    ChatKind::DirectChat => 0x01,
                    ChatKind::WhisperReceived => 0x02,
                    ChatKind::WhisperSent => 0x04,
                    ChatKind::Overhead => 0x05,
                    ChatKind::Scroll => 0x06,
                    ChatKind::Other(code) => code,
                };
                PacketWriter::new(InboundKind::GameMessage.tag())
                    .u8(code)
                    .u8(0)
                    .u8(0)
                    .u32(chat.unit_id)
                    .u8(0)
                    .u8(0)
                    .cstr(&chat.sender)
                    .cstr(&chat.text)
                    .finish()
            }
            InboundMessage::InformationMessage(info) => {
                let code = match info.event {
                    InformationEvent::PlayerTimeout => 0x00,
                    InformationEvent::PlayerDropped => 0x01,
                    InformationEvent::PlayerJoined => 0x02,
                    InformationEvent::PlayerQuit => 0x03,
                    InformationEvent::PlayerRelation => 0x07,
                    InformationEvent::Other(code) => code,
                };
                PacketWriter::new(InboundKind::InformationMessage.tag())
                    .u8(code)
                    .u8(info.action)
                    .u32(info.entity_id)
                    .u8(info.entity_type)
                    .fixed_str(&info.first_name, NAME_LEN)
                    .fixed_str(&info.second_name, NAME_LEN)
                    .finish()
            }
            InboundMessage::PlayerPresence(p) => {
                PacketWriter::new(InboundKind::PlayerPresence.tag())
                    .u16(PRESENCE_LEN as u16)
                    .u32(p.player_id.0)
                    .u8(p.class)
                    .fixed_str(&p.name, NAME_LEN)
                    .u16(p.level)
                    .u16(p.party_id)
                    .bytes(&[0; 8])
                    .finish()
            }
            InboundMessage::WorldItemAction(item) => {
                let len = WORLD_ITEM_HEADER_LEN + item.body.len();
                PacketWriter::new(InboundKind::WorldItemAction.tag())
                    .u8(item.action)
                    .u8(u8::try_from(len).unwrap_or(u8::MAX))
                    .u8(item.category)
                    .u32(item.item_id)
                    .bytes(&item.body)
                    .finish()
            }
            InboundMessage::Ignored(tag) => vec![*tag],
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind decoders
// ---------------------------------------------------------------------------

/// Full size of a presence packet, tag included.
const PRESENCE_LEN: usize = 36;

/// Tag, action, length, category and item id.
const WORLD_ITEM_HEADER_LEN: usize = 8;

fn decode_game_message(data: &[u8]) -> Result<ChatMessage, DecodeFault> {
    let mut r = PacketReader::at(data, 1);
    let kind = ChatKind::from_code(r.u8()?);
    r.skip(2)?; // language, unit type
    let unit_id = r.u32()?;
    r.skip(2)?; // name color, unused
    let sender = r.cstr()?;
    let text = r.cstr()?;
    Ok(ChatMessage {
        kind,
        unit_id,
        sender,
        text,
    })
}

fn decode_information(data: &[u8]) -> Result<InformationMessage, DecodeFault> {
    let mut r = PacketReader::at(data, 1);
    Ok(InformationMessage {
        event: InformationEvent::from_code(r.u8()?),
        action: r.u8()?,
        entity_id: r.u32()?,
        entity_type: r.u8()?,
        first_name: r.fixed_str(NAME_LEN)?,
        second_name: r.fixed_str(NAME_LEN)?,
    })
}

fn decode_presence(data: &[u8]) -> Result<PlayerPresence, DecodeFault> {
    let mut r = PacketReader::at(data, 1);
    let declared = usize::from(r.u16()?);
    if declared != data.len() {
        return Err(DecodeFault::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }
    let presence = PlayerPresence {
        player_id: PlayerId(r.u32()?),
        class: r.u8()?,
        name: r.fixed_str(NAME_LEN)?,
        level: r.u16()?,
        party_id: r.u16()?,
    };
    r.skip(8)?;
    Ok(presence)
}

fn decode_world_item(data: &[u8]) -> Result<WorldItemAction, DecodeFault> {
    let mut r = PacketReader::at(data, 1);
    let action = r.u8()?;
    let declared = usize::from(r.u8()?);
    if declared != data.len() {
        return Err(DecodeFault::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }
    Ok(WorldItemAction {
        action,
        category: r.u8()?,
        item_id: r.u32()?,
        body: r.rest(),
    })
}

// =========================================================================
// Tests
// =========================================================================
