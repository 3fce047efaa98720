//! Unified error type for the server crate.

use flipmatch_protocol::ProtocolError;
use flipmatch_room::RoomError;
use flipmatch_transport::TransportError;

/// Top-level error that wraps the lower layers' errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (duplicate, not found, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}
