//! Network transport layer for Flipmatch.
//!
//! The session engine never talks to sockets directly. It works against the
//! [`Transport`] trait (an acceptor producing connections) and the
//! [`Connection`] trait (a bidirectional byte-frame channel), keyed by a
//! [`ConnectionId`] that serves as a client's volatile identity. Game
//! identity across reconnects is handled a layer up, by session tokens.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Identifies one accepted connection for its lifetime.
///
/// Ids are never reused within a process. When a client reconnects it gets a
/// fresh id, and the room layer rebinds the player slot to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw counter value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Unwraps back to the raw value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// An acceptor for incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// Connection type produced by [`accept`](Transport::accept).
    type Connection: Connection;
    /// Error type for acceptor operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops accepting new connections.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// A bidirectional channel of byte frames to one remote peer.
///
/// Implementations must allow `send` and `recv` to be in flight
/// concurrently from different tasks, since the server drives a writer
/// pump alongside each connection's read loop.
pub trait Connection: Send + Sync + 'static {
    /// Error type for channel operations.
    type Error: std::error::Error + Send + Sync;

    /// Delivers one frame to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Awaits the next frame from the peer.
    ///
    /// Resolves to `Ok(None)` on a clean close.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the channel.
    async fn close(&self) -> Result<(), Self::Error>;

    /// The id assigned to this connection at accept time.
    fn id(&self) -> ConnectionId;
}
