//! Typed game-server messages.
//!
//! Inbound messages are what the server sends us; outbound messages are
//! what we send back. Both sets are closed enums: the bot understands only
//! the handful of kinds it needs to stay in a game, keep a party together
//! and listen to its master. Everything else decodes to
//! [`InboundMessage::Ignored`].

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Server-assigned unit id of a player.
///
/// Newtype so a player id can't be confused with an item id or a party id,
/// which are plain integers of the same width on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Inbound kinds
// ---------------------------------------------------------------------------

/// The inbound packet kinds this client decodes.
///
/// The discriminant is the tag byte that opens every payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InboundKind {
    /// Chat, whispers and overhead text.
    GameMessage = 0x26,
    /// Roster notices (join/leave) and relation requests.
    InformationMessage = 0x5A,
    /// "This player is already in the game world."
    PlayerPresence = 0x5B,
    /// An item appeared, moved or was picked up.
    WorldItemAction = 0x9C,
}

impl InboundKind {
    /// Maps a tag byte to a kind, or `None` for tags we don't handle.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x26 => Some(Self::GameMessage),
            0x5A => Some(Self::InformationMessage),
            0x5B => Some(Self::PlayerPresence),
            0x9C => Some(Self::WorldItemAction),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for InboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GameMessage => "GameMessage",
            Self::InformationMessage => "InformationMessage",
            Self::PlayerPresence => "PlayerPresence",
            Self::WorldItemAction => "WorldItemAction",
        };
        write!(f, "{name}(0x{:02x})", self.tag())
    }
}

// ---------------------------------------------------------------------------
// GameMessage
// ---------------------------------------------------------------------------

/// Which channel a chat line came through.
///
/// Only [`ChatKind::DirectChat`] is ever inspected for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Ordinary in-game chat typed by a player.
    DirectChat,
    WhisperReceived,
    WhisperSent,
    Overhead,
    Scroll,
    /// A channel code we don't name.
    Other(u8),
}

impl ChatKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::DirectChat,
            0x02 => Self::WhisperReceived,
            0x04 => Self::WhisperSent,
            0x05 => Self::Overhead,
            0x06 => Self::Scroll,
            other => Self::Other(other),
        }
    }
}

/// A decoded chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: ChatKind,
    /// Unit id of the speaker (0 for system text).
    pub unit_id: u32,
    pub sender: String,
    pub text: String,
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.kind, self.sender, self.text)
    }
}

// ---------------------------------------------------------------------------
// InformationMessage
// ---------------------------------------------------------------------------

/// Sub-event carried by an information message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InformationEvent {
    PlayerTimeout,
    PlayerDropped,
    PlayerJoined,
    PlayerQuit,
    /// A social-graph action between two entities (party invite, etc).
    PlayerRelation,
    Other(u8),
}

impl InformationEvent {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::PlayerTimeout,
            0x01 => Self::PlayerDropped,
            0x02 => Self::PlayerJoined,
            0x03 => Self::PlayerQuit,
            0x07 => Self::PlayerRelation,
            other => Self::Other(other),
        }
    }
}

/// A decoded information message.
///
/// The same fixed 40-byte layout serves every sub-event; which fields are
/// meaningful depends on [`InformationMessage::event`]. Roster events use
/// `first_name`; relation events use `action`, `entity_type` and
/// `entity_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformationMessage {
    pub event: InformationEvent,
    pub action: u8,
    pub entity_id: u32,
    pub entity_type: u8,
    pub first_name: String,
    pub second_name: String,
}

impl fmt::Display for InformationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event {
            InformationEvent::PlayerRelation => write!(
                f,
                "{:?} action=0x{:02x} entity_type=0x{:02x} entity_id={}",
                self.event, self.action, self.entity_type, self.entity_id
            ),
            _ => write!(f, "{:?} {}", self.event, self.first_name),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerPresence
// ---------------------------------------------------------------------------

/// Party id the server uses for "not in any party".
pub const NO_PARTY: u16 = 0xFFFF;

/// Announces a player who was already in the game when we arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPresence {
    pub player_id: PlayerId,
    pub class: u8,
    pub name: String,
    pub level: u16,
    pub party_id: u16,
}

impl PlayerPresence {
    /// Returns `true` if the player already belongs to a party.
    pub fn is_in_party(&self) -> bool {
        self.party_id != NO_PARTY
    }
}

// ---------------------------------------------------------------------------
// WorldItemAction
// ---------------------------------------------------------------------------

/// Header of an item event.
///
/// Item bodies are bit-packed and only matter for inventory tracking,
/// which this client does not do yet, so everything past the item id is
/// kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldItemAction {
    pub action: u8,
    pub category: u8,
    pub item_id: u32,
    pub body: Vec<u8>,
}

// ---------------------------------------------------------------------------
// InboundMessage
// ---------------------------------------------------------------------------

/// One decoded packet from the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    GameMessage(ChatMessage),
    InformationMessage(InformationMessage),
    WorldItemAction(WorldItemAction),
    PlayerPresence(PlayerPresence),
    /// A packet kind this client doesn't handle. Carries the tag byte.
    Ignored(u8),
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Auxiliary byte sent with every ping. Any value works; this one is close
/// to what the stock client sends.
pub const PING_AUX: u8 = 0x35;

/// What a party request asks the server to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyAction {
    Invite,
    Accept,
}

impl PartyAction {
    pub fn code(self) -> u8 {
        match self {
            Self::Invite => 0x06,
            Self::Accept => 0x08,
        }
    }
}

/// An invite or accept aimed at one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyRequest {
    pub action: PartyAction,
    pub target: PlayerId,
}

/// A message this client sends to the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Chat to everyone, or a whisper when `target` is set.
    Chat {
        text: String,
        target: Option<String>,
    },
    /// Text shown above the character's head.
    Overhead { text: String },
    PartyRequest(PartyRequest),
    ExitGame,
    Ping { timestamp: u32, aux: u8 },
}

impl OutboundMessage {
    pub fn say(text: impl Into<String>) -> Self {
        Self::Chat {
            text: text.into(),
            target: None,
        }
    }

    pub fn whisper(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Chat {
            text: text.into(),
            target: Some(target.into()),
        }
    }

    pub fn overhead(text: impl Into<String>) -> Self {
        Self::Overhead { text: text.into() }
    }

    pub fn invite(target: PlayerId) -> Self {
        Self::PartyRequest(PartyRequest {
            action: PartyAction::Invite,
            target,
        })
    }

    pub fn accept(target: PlayerId) -> Self {
        Self::PartyRequest(PartyRequest {
            action: PartyAction::Accept,
            target,
        })
    }

    /// A ping carrying the given local timestamp and [`PING_AUX`].
    pub fn ping(timestamp: u32) -> Self {
        Self::Ping {
            timestamp,
            aux: PING_AUX,
        }
    }
}
