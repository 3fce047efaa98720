//! Per-connection handler: read loop, writer pump, and dispatch.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Open an unbounded outbound channel; its sender is what room
//!      actors broadcast into, a writer pump drains it onto the socket.
//!   2. Loop: receive frames → decode → dispatch to the registry/room.
//!   3. On any exit, a drop guard removes the connection from its room.

use std::sync::Arc;

use flipmatch_protocol::{ClientMessage, Codec, ServerMessage};
use flipmatch_room::{ClientSender, RoomHandle};
use flipmatch_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ServerError;
use crate::server::ServerState;

/// Drop guard that pulls the connection out of its room when the
/// handler exits, whatever the reason.
///
/// This covers abrupt socket drops and handler panics alike. Since
/// `Drop` is synchronous, the async cleanup runs in a spawned task.
struct DisconnectGuard<C: Codec> {
    conn_id: ConnectionId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let handle = {
                let mut rooms = state.rooms.lock().await;
                rooms
                    .unbind(conn_id)
                    .and_then(|room_id| rooms.get(&room_id).ok())
            };
            if let Some(handle) = handle {
                let _ = handle.leave(conn_id).await;
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    tracing::info!(%conn_id, "connection opened");

    let conn = Arc::new(conn);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Writer pump: everything a room actor (or the dispatcher) sends
    // into the channel goes out the socket in order. It ends when the
    // last sender clone drops, which happens after the guard's leave.
    let writer = tokio::spawn(writer_pump(
        Arc::clone(&conn),
        Arc::clone(&state),
        out_rx,
    ));

    let _guard = DisconnectGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        // Malformed frames never kill the connection; the client just
        // gets no reply and reconciles on its next snapshot.
        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "undecodable frame dropped");
                continue;
            }
        };

        dispatch(&state, conn_id, &out_tx, msg).await;
    }

    // Drop our sender so the pump can finish once the room lets go too.
    drop(out_tx);
    drop(_guard);
    writer.abort();
    let _ = conn.close().await;

    Ok(())
}

/// Drains the outbound channel onto the socket.
async fn writer_pump<C: Codec>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<C>>,
    mut out_rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(msg) = out_rx.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(conn_id = %conn.id(), error = %e, "encode failed");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed");
            break;
        }
    }
}

/// Routes one decoded client message.
///
/// The registry lock is held only for map lookups; room commands are
/// awaited after it is released.
async fn dispatch<C: Codec>(
    state: &Arc<ServerState<C>>,
    conn_id: ConnectionId,
    out_tx: &ClientSender,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::CreateRoom { room_id } => {
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms.create_room(room_id.clone())
            };
            let reply = match result {
                Ok(_) => ServerMessage::RoomCreated { room_id },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            };
            let _ = out_tx.send(reply);
        }

        ClientMessage::JoinRoom { room_id, token } => {
            let handle = {
                let mut rooms = state.rooms.lock().await;
                match rooms.get(&room_id) {
                    Ok(handle) => match rooms.bind(conn_id, room_id) {
                        Ok(()) => Some(handle),
                        Err(e) => {
                            let _ = out_tx.send(ServerMessage::Error {
                                message: e.to_string(),
                            });
                            None
                        }
                    },
                    Err(e) => {
                        let _ = out_tx.send(ServerMessage::Error {
                            message: e.to_string(),
                        });
                        None
                    }
                }
            };

            if let Some(handle) = handle {
                if handle
                    .join(conn_id, token, out_tx.clone())
                    .await
                    .is_err()
                {
                    // Room actor died between lookup and join.
                    let mut rooms = state.rooms.lock().await;
                    rooms.unbind(conn_id);
                    let _ = out_tx.send(ServerMessage::Error {
                        message: format!("room {} is unavailable", handle.room_id()),
                    });
                }
            }
        }

        ClientMessage::StartGame { room_id } => {
            if let Some(handle) = lookup(state, &room_id, conn_id).await {
                let _ = handle.start(conn_id).await;
            }
        }

        ClientMessage::FlipCard { room_id, position } => {
            if let Some(handle) = lookup(state, &room_id, conn_id).await {
                let _ = handle.flip(conn_id, position).await;
            }
        }

        ClientMessage::Rematch { room_id } => {
            if let Some(handle) = lookup(state, &room_id, conn_id).await {
                let _ = handle.rematch(conn_id).await;
            }
        }

        ClientMessage::LeaveRoom { room_id } => {
            let handle = {
                let mut rooms = state.rooms.lock().await;
                if rooms.room_for(conn_id) == Some(&room_id) {
                    rooms.unbind(conn_id);
                }
                rooms.get(&room_id).ok()
            };
            if let Some(handle) = handle {
                let _ = handle.leave(conn_id).await;
            }
        }
    }
}

/// Looks up a room for a gameplay message. An unknown room here means a
/// stale client, not a user mistake, so there is no error reply.
async fn lookup<C: Codec>(
    state: &Arc<ServerState<C>>,
    room_id: &flipmatch_protocol::RoomId,
    conn_id: ConnectionId,
) -> Option<RoomHandle> {
    let rooms = state.rooms.lock().await;
    match rooms.get(room_id) {
        Ok(handle) => Some(handle),
        Err(_) => {
            tracing::debug!(%conn_id, %room_id, "message for unknown room dropped");
            None
        }
    }
}
