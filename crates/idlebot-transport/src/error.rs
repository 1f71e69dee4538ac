/// Errors that can occur when handing a packet to the transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The receiving side of the sink is gone.
    #[error("sink closed")]
    Closed,

    /// Writing the payload failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),
}
