//! `FlipmatchServer` builder and accept loop.
//!
//! This is the entry point for running a Flipmatch server. It ties the
//! layers together: transport → protocol → room.

use std::sync::Arc;
use std::time::Duration;

use flipmatch_protocol::{Codec, JsonCodec};
use flipmatch_room::{RoomConfig, RoomRegistry};
use flipmatch_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ServerError;
use crate::handler::handle_connection;

/// How often the server sweeps for idle rooms.
const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry sits behind a `Mutex`; handlers hold the lock only for
/// index operations, never across room calls or network I/O.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Flipmatch server.
///
/// # Example
///
/// ```rust,ignore
/// let server = FlipmatchServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct FlipmatchServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    idle_room_ttl: Duration,
}

impl FlipmatchServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            room_config: RoomConfig::default(),
            idle_room_ttl: Duration::from_secs(300),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration applied to every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets how long an empty room survives before being reclaimed.
    pub fn idle_room_ttl(mut self, ttl: Duration) -> Self {
        self.idle_room_ttl = ttl;
        self
    }

    /// Binds the transport and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, the stack browser
    /// clients speak.
    pub async fn build(self) -> Result<FlipmatchServer<JsonCodec>, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new(self.room_config)),
            codec: JsonCodec,
        });

        Ok(FlipmatchServer {
            transport,
            state,
            idle_room_ttl: self.idle_room_ttl,
        })
    }
}

impl Default for FlipmatchServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Flipmatch server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FlipmatchServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
    idle_room_ttl: Duration,
}

impl<C: Codec> FlipmatchServer<C> {
    /// Creates a new builder.
    pub fn builder() -> FlipmatchServerBuilder {
        FlipmatchServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted connection gets its own handler task. A periodic
    /// sweep reclaims rooms that have sat empty past the configured TTL.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("flipmatch server running");

        let mut reap_timer = tokio::time::interval(REAP_INTERVAL);
        reap_timer.tick().await; // first tick fires immediately

        loop {
            tokio::select! {
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(
                                    error = %e,
                                    "connection ended with error"
                                );
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
                _ = reap_timer.tick() => {
                    let mut rooms = self.state.rooms.lock().await;
                    let reaped = rooms.reap_idle(self.idle_room_ttl).await;
                    if !reaped.is_empty() {
                        tracing::info!(count = reaped.len(), "reaped idle rooms");
                    }
                }
            }
        }
    }
}
