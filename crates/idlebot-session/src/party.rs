//! Party handling: invite everyone we see, accept every invite we get.

use idlebot_protocol::{Codec, OutboundMessage, PlayerId, PlayerPresence};

use crate::{Effect, GameSession};

/// Relation action code for "wants to party with you".
pub const RELATION_ACTION_INVITE: u8 = 0x02;

/// Entity type code for a party.
pub const RELATION_ENTITY_PARTY: u8 = 0x05;

impl<C: Codec> GameSession<C> {
    /// Invites a player announced by a presence packet.
    ///
    /// Skips players already in a party and our own character. If the
    /// player is on the roster, their id is recorded on the way.
    pub fn on_presence(&mut self, presence: &PlayerPresence) -> Vec<Effect> {
        self.roster.set_id(&presence.name, presence.player_id);

        if presence.is_in_party() || self.config.is_self(&presence.name) {
            return Vec::new();
        }

        tracing::info!("Inviting player: {}", presence.name);
        vec![Effect::Send(OutboundMessage::invite(presence.player_id))]
    }

    /// Accepts any party request aimed at us.
    ///
    /// There is no allow list and no phase check: every relation event with
    /// the invite action on a party entity is accepted.
    pub fn on_relation_event(
        &self,
        action: u8,
        entity_type: u8,
        entity_id: u32,
    ) -> Vec<Effect> {
        if action != RELATION_ACTION_INVITE || entity_type != RELATION_ENTITY_PARTY {
            return Vec::new();
        }

        let target = PlayerId(entity_id);
        tracing::info!(%target, "accepting party request");
        vec![Effect::Send(OutboundMessage::accept(target))]
    }
}
