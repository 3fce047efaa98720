//! Core wire types for the Flipmatch session protocol.
//!
//! Every structure here is serialized to JSON, sent over the transport,
//! and deserialized on the other side. Payload fields reuse the board
//! types from `flipmatch-game` so a snapshot on the wire is exactly the
//! engine's own representation.

use std::fmt;

use flipmatch_game::Board;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A caller-visible room identifier.
///
/// Room ids are opaque strings chosen by the client that creates the
/// room (e.g. a short code typed into a friend's browser). Uniqueness
/// among live rooms is enforced by the registry, not by this type.
///
/// `#[serde(transparent)]` makes `RoomId("ABC")` serialize as just
/// `"ABC"`, not `{ "0": "ABC" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Session state on the wire
// ---------------------------------------------------------------------------

/// Lifecycle phase of a room.
///
/// ```text
/// Waiting → Playing → Finished
///              ↑          │
///              └─rematch──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Accepting players; no board yet.
    Waiting,
    /// A game is in progress.
    Playing,
    /// The board is fully matched; only rematch leaves this phase.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// What a joining connection became.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Holds a slot and takes turns.
    Player,
    /// Watches; no slot, no score.
    Spectator,
}

/// One player slot as shown in rosters and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub score: u32,
    pub connected: bool,
}

/// The result of a finished game.
///
/// Ties are never broken: two or more slots at the maximum score are
/// reported as a draw among all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Winner {
    /// A single slot had the strictly highest score.
    Single { slot: usize, name: String },
    /// Two or more slots tied at the maximum score.
    Draw { names: Vec<String> },
}

// ---------------------------------------------------------------------------
// ClientMessage — inbound
// ---------------------------------------------------------------------------

/// Messages a client sends to the session engine.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "FlipCard", "room_id": "ABC", "position": 3 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Create a new empty room with the given id.
    CreateRoom { room_id: RoomId },

    /// Join (or reconnect to) a room. `token` is an opaque value the
    /// client keeps stable across reconnects of the same tab; a match
    /// against an existing slot rebinds that slot instead of seating a
    /// new player.
    JoinRoom { room_id: RoomId, token: String },

    /// Start the game. Only the host (slot 0) may trigger this.
    StartGame { room_id: RoomId },

    /// Flip the card at `position`.
    FlipCard { room_id: RoomId, position: usize },

    /// Restart with a fresh board. Any member may trigger this.
    Rematch { room_id: RoomId },

    /// Leave the room explicitly.
    LeaveRoom { room_id: RoomId },
}

// ---------------------------------------------------------------------------
// ServerMessage — outbound
// ---------------------------------------------------------------------------

/// Messages the session engine sends to clients.
///
/// Broadcasts go to every connection in the room (players and
/// spectators); `RoomCreated`, `Error`, and `RoomJoined` are unicast to
/// the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The room was created and is waiting for players.
    RoomCreated { room_id: RoomId },

    /// An actionable error: duplicate room id, unknown room on join,
    /// not enough players to start. Never fatal.
    Error { message: String },

    /// Full snapshot for the connection that just joined. `slot` is
    /// `None` for spectators; `is_host` is true only for slot 0's
    /// current connection.
    RoomJoined {
        room_id: RoomId,
        role: Role,
        slot: Option<usize>,
        phase: Phase,
        board: Board,
        players: Vec<PlayerInfo>,
        turn: usize,
        is_host: bool,
    },

    /// Membership, score, or connectivity changed.
    RosterUpdate { players: Vec<PlayerInfo> },

    /// A new game began.
    GameStart {
        board: Board,
        turn: usize,
        players: Vec<PlayerInfo>,
    },

    /// A card was turned face up.
    CardRevealed { position: usize, value: char },

    /// A second flip matched. The turn cursor does not move: the same
    /// player continues.
    MatchResult {
        success: bool,
        matched: [usize; 2],
        scores: Vec<u32>,
        turn: usize,
    },

    /// A mismatched pair was re-hidden after the reveal delay and the
    /// turn moved on.
    TurnChange { turn: usize, reset: [usize; 2] },

    /// A player's connection dropped mid-game. The slot stays.
    PlayerDisconnected { slot: usize },

    /// A player rebound their slot with a matching token.
    PlayerReconnected { slot: usize },

    /// Every card is matched.
    GameOver { winner: Winner, scores: Vec<u32> },

    /// A rematch regenerated the board. Same shape as `GameStart`.
    GameReset {
        board: Board,
        turn: usize,
        players: Vec<PlayerInfo>,
    },
}

// =========================================================================
// Tests
// =========================================================================
