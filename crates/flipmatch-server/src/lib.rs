//! # Flipmatch server
//!
//! Authoritative session engine for the Flipmatch memory-matching card
//! game: WebSocket gateway, JSON protocol, and room actors.
//!
//! Clients connect over WebSocket, send [`ClientMessage`] frames, and
//! receive [`ServerMessage`] broadcasts. All game state lives server
//! side; the client is a renderer.
//!
//! [`ClientMessage`]: flipmatch_protocol::ClientMessage
//! [`ServerMessage`]: flipmatch_protocol::ServerMessage

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{FlipmatchServer, FlipmatchServerBuilder};
