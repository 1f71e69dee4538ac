//! Outbound transport seam for idlebot.
//!
//! The session core never owns a socket. It hands finished payloads to a
//! [`PacketSink`], and whatever sits behind the sink (a game connection, a
//! capture file, a test channel) does the rest.
//!
//! Sends are fire-and-forget from the caller's point of view: a failed send
//! is reported once and never retried.

mod error;

pub use error::TransportError;

use std::fmt;
use std::io::Write;

use tokio::sync::mpsc;

/// Accepts encoded outbound packets, one at a time, in order.
pub trait PacketSink: Send + 'static {
    /// Hands one complete payload to the transport.
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}

// ---------------------------------------------------------------------------
// ChannelSink
// ---------------------------------------------------------------------------

/// A [`PacketSink`] that forwards payloads over an unbounded Tokio channel.
///
/// The receiving half usually belongs to a connection writer task.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelSink {
    /// Creates a sink plus the receiver that will see every payload.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Wraps an existing sender.
    pub fn from_sender(tx: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self { tx }
    }

    /// Whether the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for ChannelSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl PacketSink for ChannelSink {
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.tx
            .send(payload.to_vec())
            .map_err(|_| TransportError::Closed)
    }
}

// ---------------------------------------------------------------------------
// WriterSink
// ---------------------------------------------------------------------------

/// A [`PacketSink`] that writes raw payloads to any [`Write`]r.
///
/// No framing is added; each payload is written and flushed as-is. Handy for
/// packet captures.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    sent: u64,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, sent: 0 }
    }

    /// Number of payloads written so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + 'static> PacketSink for WriterSink<W> {
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.writer
            .write_all(payload)
            .and_then(|()| self.writer.flush())
            .map_err(TransportError::SendFailed)?;
        self.sent += 1;
        tracing::trace!(len = payload.len(), total = self.sent, "payload written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_channel_sink_send_delivers_in_order() {
        let (mut sink, mut rx) = ChannelSink::new();

        sink.send(&[0x69]).unwrap();
        sink.send(&[0x5e, 0x06, 1, 0, 0, 0]).unwrap();

        assert_eq!(rx.try_recv().unwrap(), vec![0x69]);
        assert_eq!(rx.try_recv().unwrap(), vec![0x5e, 0x06, 1, 0, 0, 0]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_send_after_receiver_dropped_is_closed() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);

        assert!(sink.is_closed());
        assert!(matches!(sink.send(&[0x69]), Err(TransportError::Closed)));
    }

    #[test]
    fn test_channel_sink_clones_share_receiver() {
        let (sink, mut rx) = ChannelSink::new();
        let mut a = sink.clone();
        let mut b = ChannelSink::from_sender(sink.tx.clone());

        a.send(b"a").unwrap();
        b.send(b"b").unwrap();

        assert_eq!(rx.try_recv().unwrap(), b"a");
        assert_eq!(rx.try_recv().unwrap(), b"b");
    }

    #[test]
    fn test_writer_sink_send_appends_raw_bytes() {
        let mut sink = WriterSink::new(Vec::new());

        sink.send(&[0x69]).unwrap();
        sink.send(&[0x14, 0x00, 0x00]).unwrap();

        assert_eq!(sink.sent(), 2);
        assert_eq!(sink.into_inner(), vec![0x69, 0x14, 0x00, 0x00]);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_send_io_failure_is_send_failed() {
        let mut sink = WriterSink::new(Broken);

        let err = sink.send(&[0x69]).unwrap_err();

        assert!(matches!(err, TransportError::SendFailed(_)));
        assert_eq!(sink.sent(), 0);
        assert_eq!(err.to_string(), "send failed: gone");
    }
}
