//! Wire protocol for Flipmatch.
//!
//! This crate defines the "language" that clients and the session engine
//! speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`RoomId`], etc.) —
//!   the closed, tagged message schema that travels on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The schema is closed: every message is a known variant of the two
//! enums, and an unknown `type` tag fails decoding instead of flowing
//! through as loose data.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, Phase, PlayerInfo, Role, RoomId, ServerMessage, Winner,
};
