//! Chat commands from the master.
//!
//! Only direct chat is inspected, and only lines from the configured
//! master count. The one command is `#exit`.

use idlebot_protocol::{ChatKind, ChatMessage, Codec, OutboundMessage};

use crate::{Effect, GameSession, SessionEvent, SessionPhase};

/// Command text that makes the bot say goodbye and leave.
pub const EXIT_COMMAND: &str = "#exit";

/// What the bot says before leaving.
pub const FAREWELL: &str = "Bye";

impl<C: Codec> GameSession<C> {
    /// Logs a chat line and runs it as a command if it is one.
    pub fn on_chat(&mut self, chat: &ChatMessage) -> Vec<Effect> {
        tracing::info!("{chat}");

        if chat.kind != ChatKind::DirectChat || !self.config.is_master(&chat.sender) {
            return Vec::new();
        }

        match chat.text.as_str() {
            EXIT_COMMAND => self.exit_command(),
            _ => Vec::new(),
        }
    }

    /// Farewell, shutdown event, then the leave sequence, in that order.
    fn exit_command(&mut self) -> Vec<Effect> {
        if self.phase == SessionPhase::Exiting {
            tracing::debug!("already exiting, ignoring {EXIT_COMMAND}");
            return Vec::new();
        }

        tracing::info!(master = %self.config.master_name, "exit requested");
        let mut effects = vec![
            Effect::Send(OutboundMessage::say(FAREWELL)),
            Effect::Notify(SessionEvent::ShutdownRequested),
        ];
        effects.extend(self.leave_game());
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionConfig;

    fn in_game() -> GameSession {
        let mut s = GameSession::new(SessionConfig::new("Master", "IdleBot"));
        s.enter_game();
        s
    }

    fn chat(kind: ChatKind, sender: &str, text: &str) -> ChatMessage {
        ChatMessage {
            kind,
            unit_id: 1,
            sender: sender.into(),
            text: text.into(),
        }
    }

    fn exit_effects() -> Vec<Effect> {
        vec![
            Effect::Send(OutboundMessage::say("Bye")),
            Effect::Notify(SessionEvent::ShutdownRequested),
            Effect::Send(OutboundMessage::ExitGame),
        ]
    }

    #[test]
    fn test_on_chat_exit_from_master_runs_full_sequence() {
        let mut s = in_game();

        let effects = s.on_chat(&chat(ChatKind::DirectChat, "Master", "#exit"));

        assert_eq!(effects, exit_effects());
        assert_eq!(s.phase(), SessionPhase::Exiting);
    }

    #[test]
    fn test_on_chat_master_match_ignores_case() {
        let mut s = in_game();

        let effects = s.on_chat(&chat(ChatKind::DirectChat, "mASTER", "#exit"));

        assert_eq!(effects, exit_effects());
    }

    #[test]
    fn test_on_chat_exit_twice_acts_once() {
        let mut s = in_game();
        let msg = chat(ChatKind::DirectChat, "Master", "#exit");

        let first = s.on_chat(&msg);
        let second = s.on_chat(&msg);

        assert_eq!(first, exit_effects());
        assert!(second.is_empty(), "second #exit must be a no-op");
        assert_eq!(s.phase(), SessionPhase::Exiting);
    }

    #[test]
    fn test_on_chat_exit_from_stranger_does_nothing() {
        let mut s = in_game();

        let effects = s.on_chat(&chat(ChatKind::DirectChat, "Mallory", "#exit"));

        assert!(effects.is_empty());
        assert_eq!(s.phase(), SessionPhase::InGame);
    }

    #[test]
    fn test_on_chat_exit_on_other_channel_does_nothing() {
        let mut s = in_game();

        for kind in [ChatKind::WhisperReceived, ChatKind::Overhead, ChatKind::Other(9)] {
            assert!(s.on_chat(&chat(kind, "Master", "#exit")).is_empty());
        }
        assert_eq!(s.phase(), SessionPhase::InGame);
    }

    #[test]
    fn test_on_chat_other_text_from_master_does_nothing() {
        let mut s = in_game();

        for text in ["hello", "#EXIT", "#exit ", " #exit"] {
            assert!(s.on_chat(&chat(ChatKind::DirectChat, "Master", text)).is_empty());
        }
        assert_eq!(s.phase(), SessionPhase::InGame);
    }

    #[test]
    fn test_on_chat_exit_before_game_skips_exit_packet() {
        // Not in game yet: farewell and shutdown still fire, the leave
        // sequence is a no-op.
        let mut s = GameSession::new(SessionConfig::new("Master", "IdleBot"));

        let effects = s.on_chat(&chat(ChatKind::DirectChat, "Master", "#exit"));

        assert_eq!(
            effects,
            vec![
                Effect::Send(OutboundMessage::say("Bye")),
                Effect::Notify(SessionEvent::ShutdownRequested),
            ]
        );
        assert_eq!(s.phase(), SessionPhase::NotInGame);
    }
}
