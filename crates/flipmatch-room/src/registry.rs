//! Room registry: creates, tracks, and routes connections to rooms.
//!
//! The registry is plain data behind whatever lock the caller provides
//! (the server holds it in a `Mutex`). Room actors themselves run
//! independently; the registry only owns their handles and the
//! connection-to-room index.

use std::collections::HashMap;
use std::time::Duration;

use flipmatch_protocol::RoomId;
use flipmatch_transport::ConnectionId;

use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks all live rooms and which connection is in which room.
///
/// This is the entry point for room operations from the server's
/// connection handlers.
pub struct RoomRegistry {
    /// Configuration applied to every room this registry spawns.
    config: RoomConfig,

    /// Live rooms, keyed by room ID.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each connection to the room it is currently in.
    /// A connection can be in at most ONE room at a time.
    conn_rooms: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            conn_rooms: HashMap::new(),
        }
    }

    /// Creates a room with the given ID and returns its handle.
    ///
    /// # Errors
    /// Returns `RoomError::Duplicate` if a live room already uses the ID.
    pub fn create_room(
        &mut self,
        room_id: RoomId,
    ) -> Result<RoomHandle, RoomError> {
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::Duplicate(room_id));
        }
        let handle = spawn_room(
            room_id.clone(),
            self.config.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id.clone(), handle.clone());
        tracing::info!(%room_id, rooms = self.rooms.len(), "room created");
        Ok(handle)
    }

    /// Looks up a live room.
    ///
    /// # Errors
    /// Returns `RoomError::NotFound` if no room uses the ID.
    pub fn get(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Records that `conn` now belongs to `room_id`.
    ///
    /// # Errors
    /// Returns `RoomError::AlreadyInRoom` if the connection is bound to
    /// any room; a connection is in at most one room at a time.
    pub fn bind(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.conn_rooms.get(&conn) {
            return Err(RoomError::AlreadyInRoom(conn, current.clone()));
        }
        self.conn_rooms.insert(conn, room_id);
        Ok(())
    }

    /// Drops the connection's room binding, returning the room it was in.
    pub fn unbind(&mut self, conn: ConnectionId) -> Option<RoomId> {
        self.conn_rooms.remove(&conn)
    }

    /// Returns the room a connection is currently bound to, if any.
    pub fn room_for(&self, conn: ConnectionId) -> Option<&RoomId> {
        self.conn_rooms.get(&conn)
    }

    /// Shuts down a room and drops all bindings into it.
    ///
    /// # Errors
    /// Returns `RoomError::NotFound` if no room uses the ID.
    pub async fn destroy_room(
        &mut self,
        room_id: &RoomId,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let _ = handle.shutdown().await;
        self.conn_rooms.retain(|_, rid| rid != room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Reclaims rooms with no live connections that have been idle for
    /// at least `ttl`. Returns the IDs of the rooms that were removed.
    ///
    /// Rooms are never torn down implicitly on disconnect — a reconnect
    /// token must be able to find its room again. Callers run this on a
    /// periodic sweep instead.
    pub async fn reap_idle(&mut self, ttl: Duration) -> Vec<RoomId> {
        let mut reaped = Vec::new();
        for handle in self.rooms.values() {
            if let Ok(info) = handle.snapshot().await {
                if info.connected == 0 && info.idle >= ttl {
                    reaped.push(info.room_id);
                }
            }
        }
        for room_id in &reaped {
            if let Some(handle) = self.rooms.remove(room_id) {
                let _ = handle.shutdown().await;
            }
            self.conn_rooms.retain(|_, rid| rid != room_id);
            tracing::info!(%room_id, "idle room reaped");
        }
        reaped
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all live room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
