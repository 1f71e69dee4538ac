//! The game session: phase, roster and packet dispatch.
//!
//! [`GameSession`] is the single owner of per-session state. It is a plain
//! struct with `&mut self` methods and no locks: packets must be fed to it
//! one at a time, in arrival order, and each call runs to completion before
//! the next. The `idlebot` crate's client task guarantees that by draining
//! a single-consumer channel.

use std::fmt;

use idlebot_protocol::{
    Codec, GameCodec, InboundMessage, InformationEvent, InformationMessage,
    OutboundMessage, PingClock, WorldItemAction,
};

use crate::{Effect, PlayerCount, Roster, SessionConfig, SessionEvent};

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Coarse lifecycle of a session.
///
/// Transitions only move forward:
///
/// ```text
///   NotInGame ──(enter_game)──→ InGame ──(leave_game / #exit)──→ Exiting
/// ```
///
/// `Exiting` is terminal here; the actual disconnect belongs to the
/// transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotInGame,
    InGame,
    Exiting,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInGame => write!(f, "NotInGame"),
            Self::InGame => write!(f, "InGame"),
            Self::Exiting => write!(f, "Exiting"),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster changes
// ---------------------------------------------------------------------------

/// Why a player left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    Timeout,
    Dropped,
    Quit,
}

/// A roster-affecting information event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    Joined,
    Left(LeaveReason),
}

impl RosterChange {
    /// Maps an information sub-event to a roster change, if it is one.
    pub fn from_event(event: InformationEvent) -> Option<Self> {
        match event {
            InformationEvent::PlayerJoined => Some(Self::Joined),
            InformationEvent::PlayerTimeout => Some(Self::Left(LeaveReason::Timeout)),
            InformationEvent::PlayerDropped => Some(Self::Left(LeaveReason::Dropped)),
            InformationEvent::PlayerQuit => Some(Self::Left(LeaveReason::Quit)),
            InformationEvent::PlayerRelation | InformationEvent::Other(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// Per-session state plus the handlers that mutate it.
///
/// Generic over the [`Codec`] so tests and replay tools can swap the wire
/// format; everything else uses the default [`GameCodec`].
#[derive(Debug)]
pub struct GameSession<C: Codec = GameCodec> {
    pub(crate) config: SessionConfig,
    pub(crate) roster: Roster,
    pub(crate) phase: SessionPhase,
    codec: C,
    clock: PingClock,
    dropped_packets: u64,
}

impl GameSession {
    /// Creates a session speaking the standard game protocol.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_codec(config, GameCodec)
    }
}

impl<C: Codec> GameSession<C> {
    pub fn with_codec(config: SessionConfig, codec: C) -> Self {
        Self {
            config,
            roster: Roster::new(),
            phase: SessionPhase::NotInGame,
            codec,
            clock: PingClock::new(),
            dropped_packets: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of packets dropped because they failed to decode.
    pub fn dropped_packets(&self) -> u64 {
        self.dropped_packets
    }

    // -- Phase transitions --------------------------------------------------

    /// Marks the session as in-game. Only valid from `NotInGame`.
    ///
    /// Returns `true` if the phase changed.
    pub fn enter_game(&mut self) -> bool {
        if self.phase != SessionPhase::NotInGame {
            tracing::debug!(phase = %self.phase, "enter_game ignored");
            return false;
        }
        self.phase = SessionPhase::InGame;
        tracing::info!(character = %self.config.character_name, "entered game");
        true
    }

    /// Starts leaving the game.
    ///
    /// Outside `InGame` this does nothing, which makes it idempotent: the
    /// first call moves to `Exiting` and queues an exit packet, later calls
    /// return no effects.
    pub fn leave_game(&mut self) -> Vec<Effect> {
        if self.phase != SessionPhase::InGame {
            tracing::debug!(phase = %self.phase, "leave_game ignored");
            return Vec::new();
        }
        self.phase = SessionPhase::Exiting;
        tracing::info!("leaving game");
        vec![Effect::Send(OutboundMessage::ExitGame)]
    }

    // -- Inbound ------------------------------------------------------------

    /// Decodes one raw packet and dispatches it.
    ///
    /// A packet that fails to decode is logged with its hex dump and
    /// dropped; the session carries on with the next one.
    pub fn on_packet(&mut self, data: &[u8]) -> Vec<Effect> {
        match self.codec.decode(data) {
            Ok(msg) => self.dispatch(msg),
            Err(e) => {
                self.dropped_packets += 1;
                tracing::error!(error = %e, "dropping malformed packet");
                Vec::new()
            }
        }
    }

    /// Routes one decoded message to exactly one handler.
    pub fn dispatch(&mut self, msg: InboundMessage) -> Vec<Effect> {
        match msg {
            InboundMessage::GameMessage(chat) => self.on_chat(&chat),
            InboundMessage::InformationMessage(info) => self.on_information(&info),
            InboundMessage::WorldItemAction(item) => {
                self.on_world_item(&item);
                Vec::new()
            }
            InboundMessage::PlayerPresence(presence) => self.on_presence(&presence),
            InboundMessage::Ignored(tag) => {
                tracing::trace!(tag, "ignoring packet");
                Vec::new()
            }
        }
    }

    fn on_information(&mut self, info: &InformationMessage) -> Vec<Effect> {
        tracing::info!("{info}");

        if let Some(change) = RosterChange::from_event(info.event) {
            return self.on_roster_event(change, &info.first_name);
        }
        match info.event {
            InformationEvent::PlayerRelation => {
                self.on_relation_event(info.action, info.entity_type, info.entity_id)
            }
            _ => Vec::new(),
        }
    }

    /// Applies a join or leave and reports the new player count.
    ///
    /// Leaves are idempotent: removing a player who isn't on the roster
    /// changes nothing, but the event is still reported.
    pub fn on_roster_event(&mut self, change: RosterChange, name: &str) -> Vec<Effect> {
        let is_bot = self.config.is_bot(name);
        let joined = match change {
            RosterChange::Joined => {
                self.roster.insert(name, is_bot);
                true
            }
            RosterChange::Left(reason) => {
                if self.roster.remove(name).is_none() {
                    tracing::debug!(player = %name, ?reason, "player was not on the roster");
                }
                false
            }
        };

        let count = self.roster.len();
        let max = self.config.max_players;
        if joined {
            tracing::info!("{count}/{max} players total");
        } else {
            tracing::info!("{count}/{max} players remaining");
        }

        vec![Effect::Notify(SessionEvent::PlayerCountChanged(PlayerCount {
            count,
            max,
            player_name: name.to_string(),
            joined,
            is_bot,
        }))]
    }

    /// Item-tracking hook. Items are observed but not tracked yet.
    fn on_world_item(&mut self, item: &WorldItemAction) {
        tracing::debug!(
            item_id = item.item_id,
            action = item.action,
            category = item.category,
            "world item action"
        );
    }

    // -- Outbound helpers ---------------------------------------------------

    /// Builds a ping stamped with the next local timestamp.
    pub fn ping(&mut self) -> OutboundMessage {
        OutboundMessage::ping(self.clock.next_timestamp())
    }

    /// Encodes an outbound message with this session's codec.
    pub fn encode(&self, msg: &OutboundMessage) -> Vec<u8> {
        self.codec.encode(msg)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Dispatcher, roster and phase tests. Party and chat handlers have
    //! their own modules.

    use idlebot_protocol::{
        ChatKind, ChatMessage, InboundMessage, PlayerId, PlayerPresence,
    };

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn session() -> GameSession {
        GameSession::new(
            SessionConfig::new("Master", "IdleBot")
                .with_bot_names(["bob", "Bot1"])
                .with_max_players(8),
        )
    }

    fn info(event: u8, name: &str) -> InboundMessage {
        InboundMessage::InformationMessage(InformationMessage {
            event: InformationEvent::from_code(event),
            action: 0,
            entity_id: 0,
            entity_type: 0,
            first_name: name.into(),
            second_name: String::new(),
        })
    }

    const JOINED: u8 = 0x02;
    const QUIT: u8 = 0x03;
    const TIMEOUT: u8 = 0x00;
    const DROPPED: u8 = 0x01;

    fn count_event(
        count: usize,
        name: &str,
        joined: bool,
        is_bot: bool,
    ) -> Effect {
        Effect::Notify(SessionEvent::PlayerCountChanged(PlayerCount {
            count,
            max: 8,
            player_name: name.into(),
            joined,
            is_bot,
        }))
    }

    // =====================================================================
    // Roster events
    // =====================================================================

    #[test]
    fn test_roster_scenario_join_join_leave() {
        let mut s = session();

        let e1 = s.dispatch(info(JOINED, "Alice"));
        let e2 = s.dispatch(info(JOINED, "bob"));

        assert_eq!(e1, vec![count_event(1, "Alice", true, false)]);
        assert_eq!(e2, vec![count_event(2, "bob", true, true)]);
        assert_eq!(s.roster().sorted_names(), vec!["Alice", "bob"]);

        let e3 = s.dispatch(info(QUIT, "Alice"));

        assert_eq!(e3, vec![count_event(1, "Alice", false, false)]);
        assert_eq!(s.roster().sorted_names(), vec!["bob"]);
    }

    #[test]
    fn test_roster_event_bot_match_ignores_case() {
        let mut s = session();

        let effects = s.on_roster_event(RosterChange::Joined, "bot1");

        assert_eq!(effects, vec![count_event(1, "bot1", true, true)]);
    }

    #[test]
    fn test_roster_event_every_leave_reason_removes() {
        let mut s = session();
        for name in ["A", "B", "C"] {
            s.dispatch(info(JOINED, name));
        }

        s.dispatch(info(TIMEOUT, "A"));
        s.dispatch(info(DROPPED, "b"));
        s.dispatch(info(QUIT, "C"));

        assert!(s.roster().is_empty());
    }

    #[test]
    fn test_roster_event_redundant_leave_never_goes_negative() {
        let mut s = session();
        s.dispatch(info(JOINED, "Alice"));

        s.dispatch(info(QUIT, "Alice"));
        let effects = s.dispatch(info(QUIT, "Alice"));

        assert_eq!(s.roster().len(), 0);
        assert_eq!(effects, vec![count_event(0, "Alice", false, false)]);
    }

    #[test]
    fn test_roster_size_matches_joins_minus_present_leaves() {
        // Mixed sequence with duplicates and leaves for absent names.
        let mut s = session();
        let ops: [(u8, &str); 10] = [
            (JOINED, "a"),
            (JOINED, "b"),
            (QUIT, "z"),
            (JOINED, "c"),
            (TIMEOUT, "a"),
            (DROPPED, "a"),
            (JOINED, "d"),
            (QUIT, "B"),
            (QUIT, "q"),
            (JOINED, "e"),
        ];
        let mut present = std::collections::HashSet::new();
        for (event, name) in ops {
            if event == JOINED {
                present.insert(name.to_ascii_lowercase());
            } else {
                present.remove(&name.to_ascii_lowercase());
            }
            s.dispatch(info(event, name));
            assert_eq!(s.roster().len(), present.len());
        }
        assert_eq!(s.roster().len(), 3);
    }

    #[test]
    fn test_information_other_event_is_noop() {
        let mut s = session();
        let effects = s.dispatch(info(0x11, "Alice"));
        assert!(effects.is_empty());
        assert!(s.roster().is_empty());
    }

    // =====================================================================
    // Phase
    // =====================================================================

    #[test]
    fn test_new_session_starts_not_in_game() {
        assert_eq!(session().phase(), SessionPhase::NotInGame);
    }

    #[test]
    fn test_enter_game_only_from_not_in_game() {
        let mut s = session();
        assert!(s.enter_game());
        assert_eq!(s.phase(), SessionPhase::InGame);
        assert!(!s.enter_game());

        s.leave_game();
        assert!(!s.enter_game(), "phase never moves backwards");
        assert_eq!(s.phase(), SessionPhase::Exiting);
    }

    #[test]
    fn test_leave_game_not_in_game_is_noop() {
        let mut s = session();
        assert!(s.leave_game().is_empty());
        assert_eq!(s.phase(), SessionPhase::NotInGame);
    }

    #[test]
    fn test_leave_game_twice_sends_exit_once() {
        let mut s = session();
        s.enter_game();

        let first = s.leave_game();
        let second = s.leave_game();

        assert_eq!(first, vec![Effect::Send(OutboundMessage::ExitGame)]);
        assert!(second.is_empty());
        assert_eq!(s.phase(), SessionPhase::Exiting);
    }

    // =====================================================================
    // on_packet()
    // =====================================================================

    #[test]
    fn test_on_packet_malformed_item_does_not_block_roster_update() {
        let mut s = session();
        let joined = GameCodec.encode_inbound(&info(JOINED, "Alice"));

        let bad = s.on_packet(&[0x9c, 0x04, 0x30, 0x01]);
        let good = s.on_packet(&joined);

        assert!(bad.is_empty());
        assert_eq!(s.dropped_packets(), 1);
        assert_eq!(good, vec![count_event(1, "Alice", true, false)]);
        assert!(s.roster().contains("alice"));
    }

    #[test]
    fn test_on_packet_empty_is_dropped() {
        let mut s = session();
        assert!(s.on_packet(&[]).is_empty());
        assert_eq!(s.dropped_packets(), 1);
    }

    #[test]
    fn test_on_packet_unknown_kind_is_not_an_error() {
        let mut s = session();
        assert!(s.on_packet(&[0x8f, 0x01, 0x02]).is_empty());
        assert_eq!(s.dropped_packets(), 0);
    }

    #[test]
    fn test_on_packet_well_formed_item_changes_nothing() {
        let mut s = session();
        let item = [0x9c, 0x00, 0x08, 0x02, 0x01, 0x00, 0x00, 0x00];

        assert!(s.on_packet(&item).is_empty());
        assert_eq!(s.dropped_packets(), 0);
        assert!(s.roster().is_empty());
    }

    #[test]
    fn test_on_packet_routes_presence_and_chat() {
        let mut s = session();
        let presence = GameCodec.encode_inbound(&InboundMessage::PlayerPresence(
            PlayerPresence {
                player_id: PlayerId(5),
                class: 0,
                name: "Alice".into(),
                level: 1,
                party_id: idlebot_protocol::NO_PARTY,
            },
        ));
        let chat = GameCodec.encode_inbound(&InboundMessage::GameMessage(ChatMessage {
            kind: ChatKind::DirectChat,
            unit_id: 1,
            sender: "Alice".into(),
            text: "hello".into(),
        }));

        assert_eq!(
            s.on_packet(&presence),
            vec![Effect::Send(OutboundMessage::invite(PlayerId(5)))]
        );
        assert!(s.on_packet(&chat).is_empty());
    }

    // =====================================================================
    // Outbound helpers
    // =====================================================================

    #[test]
    fn test_ping_timestamps_increase() {
        let mut s = session();
        let OutboundMessage::Ping { timestamp: a, .. } = s.ping() else {
            panic!("expected ping");
        };
        let OutboundMessage::Ping { timestamp: b, aux } = s.ping() else {
            panic!("expected ping");
        };
        assert!(b > a);
        assert_eq!(aux, idlebot_protocol::PING_AUX);
    }

    #[test]
    fn test_encode_uses_session_codec() {
        let s = session();
        assert_eq!(s.encode(&OutboundMessage::ExitGame), vec![0x69]);
    }
}
