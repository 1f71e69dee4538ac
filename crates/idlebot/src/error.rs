//! Unified error type for idlebot.

use idlebot_protocol::ProtocolError;
use idlebot_session::SessionError;
use idlebot_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum IdlebotError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A packet could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The client task has exited; its handle is no longer usable.
    #[error("client task stopped")]
    ClientStopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: IdlebotError = TransportError::Closed.into();
        assert!(matches!(err, IdlebotError::Transport(_)));
        assert_eq!(err.to_string(), "sink closed");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: IdlebotError = ProtocolError::EmptyPacket.into();
        assert!(matches!(err, IdlebotError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: IdlebotError = SessionError::InvalidConfig("no master".into()).into();
        assert!(matches!(err, IdlebotError::Session(_)));
        assert!(err.to_string().contains("no master"));
    }

    #[test]
    fn test_client_stopped_display() {
        assert_eq!(IdlebotError::ClientStopped.to_string(), "client task stopped");
    }
}
