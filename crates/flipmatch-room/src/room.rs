//! Room actor: an isolated Tokio task that owns one game session.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. All mutations to a room's state flow through
//! that channel, so membership changes, flips, and the mismatch-reveal
//! timer are serialized without any locking.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use flipmatch_game::{Board, Resolution, TurnEngine, pair_count, winners};
use flipmatch_protocol::{Phase, PlayerInfo, Role, RoomId, ServerMessage, Winner};
use flipmatch_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError};

/// Channel sender for delivering outbound messages to one connection.
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel — the
/// caller sends a command and waits for the response on that channel.
/// Gameplay commands are fire-and-forget: invalid ones are dropped
/// silently and the client reconciles on its next snapshot.
pub(crate) enum RoomCommand {
    /// Add a connection as a player or spectator, or rebind a
    /// reconnecting player's slot.
    Join {
        conn: ConnectionId,
        token: String,
        sender: ClientSender,
        reply: oneshot::Sender<Role>,
    },

    /// Start the game. Only honored for the host connection.
    Start { conn: ConnectionId },

    /// Flip the card at `position` for whoever owns `conn`.
    Flip { conn: ConnectionId, position: usize },

    /// Regenerate the board and restart play.
    Rematch { conn: ConnectionId },

    /// Remove a connection (explicit leave or transport disconnect).
    Leave { conn: ConnectionId },

    /// A reveal-hide timer fired. Stale generations are ignored.
    RevealTimeout { generation: u64 },

    /// Request current room metadata.
    Snapshot { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the room.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's unique ID.
    pub room_id: RoomId,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Number of player slots (connected or not).
    pub player_count: usize,
    /// Number of spectators.
    pub spectator_count: usize,
    /// Number of live connections in the room, players and spectators.
    pub connected: usize,
    /// Maximum player slots.
    pub max_players: usize,
    /// Time since the room last processed a command.
    pub idle: Duration,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. The
/// `RoomRegistry` holds one of these per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's unique ID.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Adds a connection to the room and returns the role it was given.
    ///
    /// A join never fails at the room level: a matching reconnect token
    /// rebinds the old slot, a waiting room with a free slot seats the
    /// connection as a player, and anything else becomes a spectator.
    pub async fn join(
        &self,
        conn: ConnectionId,
        token: String,
        sender: ClientSender,
    ) -> Result<Role, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                conn,
                token,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Requests a game start (fire-and-forget).
    pub async fn start(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Start { conn }).await
    }

    /// Requests a card flip (fire-and-forget).
    pub async fn flip(
        &self,
        conn: ConnectionId,
        position: usize,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Flip { conn, position }).await
    }

    /// Requests a rematch (fire-and-forget).
    pub async fn rematch(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Rematch { conn }).await
    }

    /// Removes a connection from the room (fire-and-forget).
    pub async fn leave(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave { conn }).await
    }

    /// Requests current room metadata.
    pub async fn snapshot(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// One seat at the table.
///
/// The slot index is the seat's stable identity once a game starts; the
/// connection is volatile and rebound on reconnect. The token is the
/// client-supplied reconnection identity.
struct PlayerSlot {
    token: String,
    name: String,
    conn: Option<ConnectionId>,
    score: u32,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    phase: Phase,
    config: RoomConfig,
    players: Vec<PlayerSlot>,
    spectators: HashSet<ConnectionId>,
    /// Outbound channels for every live connection in the room.
    senders: HashMap<ConnectionId, ClientSender>,
    engine: Option<TurnEngine>,
    /// Bumped on every start/rematch so an in-flight reveal timer from
    /// the previous board cannot touch the new one.
    generation: u64,
    last_active: Instant,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Clone of the command sender, used by spawned reveal timers.
    self_tx: mpsc::Sender<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    conn,
                    token,
                    sender,
                    reply,
                } => {
                    self.last_active = Instant::now();
                    let role = self.handle_join(conn, token, sender);
                    let _ = reply.send(role);
                }
                RoomCommand::Start { conn } => {
                    self.last_active = Instant::now();
                    self.handle_start(conn);
                }
                RoomCommand::Flip { conn, position } => {
                    self.last_active = Instant::now();
                    self.handle_flip(conn, position);
                }
                RoomCommand::Rematch { conn } => {
                    self.last_active = Instant::now();
                    self.handle_rematch(conn);
                }
                RoomCommand::Leave { conn } => {
                    self.last_active = Instant::now();
                    self.handle_leave(conn);
                }
                RoomCommand::RevealTimeout { generation } => {
                    self.handle_reveal_timeout(generation);
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        conn: ConnectionId,
        token: String,
        sender: ClientSender,
    ) -> Role {
        self.senders.insert(conn, sender);

        let (role, slot) = if let Some(idx) =
            self.players.iter().position(|p| p.token == token)
        {
            // Reconnect: rebind the slot to the new connection. Score
            // and seat index survive; only the transport identity moves.
            if let Some(old) = self.players[idx].conn.replace(conn) {
                if old != conn {
                    self.senders.remove(&old);
                }
            }
            tracing::info!(
                room_id = %self.room_id,
                %conn,
                slot = idx,
                "player reconnected"
            );
            self.broadcast_except(
                conn,
                ServerMessage::PlayerReconnected { slot: idx },
            );
            (Role::Player, Some(idx))
        } else if self.phase == Phase::Waiting
            && self.players.len() < self.config.max_players
        {
            let idx = self.players.len();
            self.players.push(PlayerSlot {
                token,
                name: format!("Player {}", idx + 1),
                conn: Some(conn),
                score: 0,
            });
            tracing::info!(
                room_id = %self.room_id,
                %conn,
                slot = idx,
                "player joined"
            );
            (Role::Player, Some(idx))
        } else {
            // Room full or already playing.
            self.spectators.insert(conn);
            tracing::info!(room_id = %self.room_id, %conn, "spectator joined");
            (Role::Spectator, None)
        };

        self.unicast(
            conn,
            ServerMessage::RoomJoined {
                room_id: self.room_id.clone(),
                role,
                slot,
                phase: self.phase,
                board: self.board_snapshot(),
                players: self.roster(),
                turn: self.turn(),
                is_host: slot == Some(0),
            },
        );
        self.broadcast(ServerMessage::RosterUpdate {
            players: self.roster(),
        });

        role
    }

    fn handle_start(&mut self, conn: ConnectionId) {
        if self.phase != Phase::Waiting {
            tracing::debug!(room_id = %self.room_id, %conn, "start ignored: not waiting");
            return;
        }
        if self.players.first().and_then(|p| p.conn) != Some(conn) {
            tracing::debug!(room_id = %self.room_id, %conn, "start ignored: not host");
            return;
        }
        if self.players.len() < self.config.min_players {
            self.unicast(
                conn,
                ServerMessage::Error {
                    message: format!(
                        "need at least {} players to start",
                        self.config.min_players
                    ),
                },
            );
            return;
        }

        let (board, players) = self.begin_game();
        tracing::info!(
            room_id = %self.room_id,
            players = players.len(),
            cards = board.len(),
            "game started"
        );
        self.broadcast(ServerMessage::GameStart {
            board,
            turn: 0,
            players,
        });
    }

    fn handle_flip(&mut self, conn: ConnectionId, position: usize) {
        if self.phase != Phase::Playing {
            tracing::debug!(room_id = %self.room_id, %conn, "flip ignored: not playing");
            return;
        }
        let Some(slot) =
            self.players.iter().position(|p| p.conn == Some(conn))
        else {
            tracing::debug!(room_id = %self.room_id, %conn, "flip ignored: no slot");
            return;
        };

        // The engine rejects out-of-turn flips, already-revealed cards,
        // and flips while the pending buffer is full. All of those are
        // stale-client noise, dropped without touching any state.
        let Some(result) = self
            .engine
            .as_mut()
            .and_then(|engine| engine.flip(slot, position))
        else {
            tracing::debug!(
                room_id = %self.room_id,
                %conn,
                position,
                "flip ignored: rejected by engine"
            );
            return;
        };

        self.broadcast(ServerMessage::CardRevealed {
            position: result.position,
            value: result.value,
        });

        match result.resolution {
            None => {}
            Some(Resolution::Matched {
                positions,
                complete,
            }) => {
                self.players[slot].score += 1;
                let scores = self.scores();
                self.broadcast(ServerMessage::MatchResult {
                    success: true,
                    matched: positions,
                    scores: scores.clone(),
                    turn: self.turn(),
                });
                if complete {
                    self.phase = Phase::Finished;
                    let winner = self.compute_winner(&scores);
                    tracing::info!(
                        room_id = %self.room_id,
                        ?winner,
                        "game over"
                    );
                    self.broadcast(ServerMessage::GameOver { winner, scores });
                }
            }
            Some(Resolution::Mismatched { positions }) => {
                self.broadcast(ServerMessage::MatchResult {
                    success: false,
                    matched: positions,
                    scores: self.scores(),
                    turn: self.turn(),
                });
                self.arm_reveal_timer();
            }
        }
    }

    fn handle_rematch(&mut self, conn: ConnectionId) {
        if self.phase == Phase::Waiting {
            tracing::debug!(room_id = %self.room_id, %conn, "rematch ignored: still waiting");
            return;
        }
        if !self.senders.contains_key(&conn) {
            tracing::debug!(room_id = %self.room_id, %conn, "rematch ignored: unknown connection");
            return;
        }

        let (board, players) = self.begin_game();
        tracing::info!(
            room_id = %self.room_id,
            players = players.len(),
            "rematch started"
        );
        self.broadcast(ServerMessage::GameReset {
            board,
            turn: 0,
            players,
        });
    }

    fn handle_leave(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);

        if self.spectators.remove(&conn) {
            tracing::info!(room_id = %self.room_id, %conn, "spectator left");
            return;
        }

        let Some(idx) =
            self.players.iter().position(|p| p.conn == Some(conn))
        else {
            return;
        };

        match self.phase {
            Phase::Waiting => {
                // Seats compact while waiting; names follow the index.
                self.players.remove(idx);
                for (i, slot) in self.players.iter_mut().enumerate() {
                    slot.name = format!("Player {}", i + 1);
                }
                tracing::info!(
                    room_id = %self.room_id,
                    %conn,
                    slot = idx,
                    remaining = self.players.len(),
                    "player left while waiting"
                );
            }
            Phase::Playing | Phase::Finished => {
                // Slots are stable once a game starts; the seat stays
                // so a reconnect can reclaim it.
                self.players[idx].conn = None;
                tracing::info!(
                    room_id = %self.room_id,
                    %conn,
                    slot = idx,
                    "player disconnected"
                );
                self.broadcast(ServerMessage::PlayerDisconnected {
                    slot: idx,
                });
            }
        }

        self.broadcast(ServerMessage::RosterUpdate {
            players: self.roster(),
        });
    }

    fn handle_reveal_timeout(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::debug!(
                room_id = %self.room_id,
                generation,
                current = self.generation,
                "stale reveal timer dropped"
            );
            return;
        }
        // The engine only resolves when a full mismatched pair is
        // pending, so a timer racing a rematch within the same
        // generation is also a no-op.
        let Some(advance) = self
            .engine
            .as_mut()
            .and_then(|engine| engine.resolve_mismatch())
        else {
            return;
        };

        self.broadcast(ServerMessage::TurnChange {
            turn: advance.turn,
            reset: advance.reset,
        });
    }

    /// Resets scores, regenerates the board, and re-enters `playing`.
    /// Returns the fresh board and roster for the caller's broadcast.
    fn begin_game(&mut self) -> (Board, Vec<PlayerInfo>) {
        self.generation += 1;
        for slot in &mut self.players {
            slot.score = 0;
        }
        let board = Board::generate(pair_count(self.players.len()));
        self.engine = Some(TurnEngine::new(board.clone(), self.players.len()));
        self.phase = Phase::Playing;
        (board, self.roster())
    }

    /// Schedules the delayed hide of a mismatched pair. The generation
    /// stamp lets a rematch invalidate the timer without tracking the
    /// task handle.
    fn arm_reveal_timer(&self) {
        let tx = self.self_tx.clone();
        let generation = self.generation;
        let delay = self.config.reveal_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomCommand::RevealTimeout { generation }).await;
        });
    }

    fn compute_winner(&self, scores: &[u32]) -> Winner {
        let leaders = winners(scores);
        if let [slot] = leaders[..] {
            Winner::Single {
                slot,
                name: self.players[slot].name.clone(),
            }
        } else {
            Winner::Draw {
                names: leaders
                    .iter()
                    .map(|&slot| self.players[slot].name.clone())
                    .collect(),
            }
        }
    }

    fn roster(&self) -> Vec<PlayerInfo> {
        self.players
            .iter()
            .map(|slot| PlayerInfo {
                name: slot.name.clone(),
                score: slot.score,
                connected: slot.conn.is_some(),
            })
            .collect()
    }

    fn scores(&self) -> Vec<u32> {
        self.players.iter().map(|slot| slot.score).collect()
    }

    fn board_snapshot(&self) -> Board {
        self.engine
            .as_ref()
            .map(|engine| engine.board().clone())
            .unwrap_or_default()
    }

    fn turn(&self) -> usize {
        self.engine.as_ref().map(TurnEngine::turn).unwrap_or(0)
    }

    /// Sends to every live connection, players and spectators alike.
    /// Dead receivers are dropped silently.
    fn broadcast(&self, msg: ServerMessage) {
        for sender in self.senders.values() {
            let _ = sender.send(msg.clone());
        }
    }

    fn broadcast_except(&self, excluded: ConnectionId, msg: ServerMessage) {
        for (conn, sender) in &self.senders {
            if *conn != excluded {
                let _ = sender.send(msg.clone());
            }
        }
    }

    fn unicast(&self, conn: ConnectionId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            phase: self.phase,
            player_count: self.players.len(),
            spectator_count: self.spectators.len(),
            connected: self.senders.len(),
            max_players: self.config.max_players,
            idle: self.last_active.elapsed(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate
/// with it.
///
/// `channel_size` controls backpressure on the command channel.
pub(crate) fn spawn_room(
    room_id: RoomId,
    config: RoomConfig,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room_id: room_id.clone(),
        phase: Phase::Waiting,
        config,
        players: Vec::new(),
        spectators: HashSet::new(),
        senders: HashMap::new(),
        engine: None,
        generation: 0,
        last_active: Instant::now(),
        receiver: rx,
        self_tx: tx.clone(),
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
