//! Error types for the protocol layer.
//!
//! Only decoding can fail. Encoding an [`OutboundMessage`](crate::OutboundMessage)
//! is infallible: every field has a fixed wire representation and text
//! length limits are left to the transport.

use crate::InboundKind;

/// What exactly was wrong with a payload.
///
/// Produced by the packet reader and wrapped into a [`DecodeError`]
/// together with the packet kind and a dump of the bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFault {
    /// A field ran past the end of the payload.
    #[error(
        "payload truncated: needed {needed} byte(s) at offset {offset}, \
         {available} available"
    )]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A NUL-terminated string never hit its terminator.
    #[error("string at offset {0} is not NUL-terminated")]
    UnterminatedString(usize),

    /// The length field inside the packet disagrees with the payload size.
    #[error("declared length {declared} does not match payload length {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

/// A recognized packet kind whose payload could not be parsed.
///
/// Carries a hex dump of the whole payload so a dropped packet can be
/// reproduced from the logs alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode {kind} packet: {fault} (dump: {dump})")]
pub struct DecodeError {
    /// Which kind the tag byte announced.
    pub kind: InboundKind,
    /// The underlying parse failure.
    pub fault: DecodeFault,
    /// Lowercase hex of the full payload, tag byte included.
    pub dump: String,
}

impl DecodeError {
    /// Builds a decode error, dumping `data` as hex.
    pub fn new(kind: InboundKind, fault: DecodeFault, data: &[u8]) -> Self {
        Self {
            kind,
            fault,
            dump: hex::encode(data),
        }
    }
}

/// Errors that can occur in the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The transport handed us a zero-length packet (no tag byte).
    #[error("empty packet")]
    EmptyPacket,

    /// A recognized packet kind failed to parse.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_new_dumps_payload_as_hex() {
        let err = DecodeError::new(
            InboundKind::WorldItemAction,
            DecodeFault::LengthMismatch {
                declared: 9,
                actual: 3,
            },
            &[0x9c, 0x00, 0x09],
        );
        assert_eq!(err.dump, "9c0009");
    }

    #[test]
    fn test_decode_error_display_names_kind_and_dump() {
        let err = DecodeError::new(
            InboundKind::GameMessage,
            DecodeFault::UnterminatedString(10),
            &[0x26, 0xff],
        );
        let text = err.to_string();
        assert!(text.contains("GameMessage"), "got: {text}");
        assert!(text.contains("26ff"), "got: {text}");
        assert!(text.contains("offset 10"), "got: {text}");
    }

    #[test]
    fn test_protocol_error_from_decode_error() {
        let err = DecodeError::new(
            InboundKind::PlayerPresence,
            DecodeFault::Truncated {
                offset: 1,
                needed: 2,
                available: 0,
            },
            &[0x5b],
        );
        let protocol_err: ProtocolError = err.into();
        assert!(matches!(protocol_err, ProtocolError::Decode(_)));
    }
}
