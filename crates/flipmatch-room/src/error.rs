//! Error types for the room layer.

use flipmatch_protocol::RoomId;
use flipmatch_transport::ConnectionId;

/// Errors that can occur during registry and room operations.
///
/// These are the actionable errors a client can do something about.
/// Out-of-turn flips and other stale-client noise are not errors at all;
/// the room actor drops them silently.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with this ID already exists.
    #[error("room {0} already exists")]
    Duplicate(RoomId),

    /// The connection is already bound to a room.
    #[error("connection {0} already in room {1}")]
    AlreadyInRoom(ConnectionId, RoomId),

    /// The room's command channel is closed (actor stopped).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
