/// Failure modes surfaced by [`Transport`](crate::Transport) and
/// [`Connection`](crate::Connection) implementations.
///
/// I/O-backed variants keep the underlying [`std::io::Error`] as their
/// source so callers can log the root cause.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer closed the connection, with the close reason if one
    /// was supplied.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Writing a frame to the peer failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading the next frame from the peer failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or accepting an incoming connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The transport is no longer accepting connections.
    #[error("transport shut down")]
    Shutdown,
}
