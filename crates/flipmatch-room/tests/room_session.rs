//! Integration tests for the room registry and room actors.
//!
//! Tests drive room handles directly with unbounded channels standing in
//! for client connections, reading the broadcasts the actor emits.

use std::collections::HashMap;
use std::time::Duration;

use flipmatch_game::Board;
use flipmatch_protocol::{Phase, Role, RoomId, ServerMessage, Winner};
use flipmatch_room::{ClientSender, RoomConfig, RoomRegistry};
use flipmatch_transport::ConnectionId;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn cid(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn rid(id: &str) -> RoomId {
    RoomId::from(id)
}

/// Registry with a short reveal delay to keep timer tests fast.
fn fast_registry() -> RoomRegistry {
    RoomRegistry::new(RoomConfig {
        reveal_delay: Duration::from_millis(20),
        ..RoomConfig::default()
    })
}

fn client() -> (ClientSender, mpsc::UnboundedReceiver<ServerMessage>) {
    mpsc::unbounded_channel()
}

/// A sender whose receiver is dropped immediately.
fn dummy_sender() -> ClientSender {
    mpsc::unbounded_channel().0
}

/// Gives the room actor a moment to process queued commands.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut msgs = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        msgs.push(msg);
    }
    msgs
}

/// Positions of one matching pair on the board.
fn find_pair(board: &Board) -> [usize; 2] {
    let mut seen: HashMap<char, usize> = HashMap::new();
    for card in board.cards() {
        if let Some(&first) = seen.get(&card.value) {
            return [first, card.position];
        }
        seen.insert(card.value, card.position);
    }
    panic!("board has no pair");
}

/// Positions of two cards with different values.
fn find_mismatch(board: &Board) -> [usize; 2] {
    let first = board.card(0).expect("non-empty board");
    for card in board.cards() {
        if card.value != first.value {
            return [0, card.position];
        }
    }
    panic!("board has only one value");
}

/// All positions grouped by token value.
fn pairs_by_value(board: &Board) -> Vec<[usize; 2]> {
    let mut groups: HashMap<char, Vec<usize>> = HashMap::new();
    for card in board.cards() {
        groups.entry(card.value).or_default().push(card.position);
    }
    groups
        .into_values()
        .map(|positions| [positions[0], positions[1]])
        .collect()
}

/// Extracts the board from the first `GameStart` in a message batch.
fn game_start_board(msgs: &[ServerMessage]) -> Board {
    msgs.iter()
        .find_map(|msg| match msg {
            ServerMessage::GameStart { board, .. } => Some(board.clone()),
            _ => None,
        })
        .expect("expected a game_start broadcast")
}

// =========================================================================
// Registry tests
// =========================================================================

#[tokio::test]
async fn test_create_room_rejects_duplicate_id() {
    let mut registry = fast_registry();
    registry.create_room(rid("ABC")).unwrap();
    let result = registry.create_room(rid("ABC"));
    assert!(result.is_err(), "duplicate room id should be rejected");
    assert_eq!(registry.room_count(), 1);
}

#[tokio::test]
async fn test_get_unknown_room_fails() {
    let registry = fast_registry();
    assert!(registry.get(&rid("nope")).is_err());
}

#[tokio::test]
async fn test_bind_one_room_at_a_time() {
    let mut registry = fast_registry();
    registry.create_room(rid("A")).unwrap();
    registry.create_room(rid("B")).unwrap();

    registry.bind(cid(1), rid("A")).unwrap();
    assert!(registry.bind(cid(1), rid("B")).is_err());
    assert_eq!(registry.room_for(cid(1)), Some(&rid("A")));
}

#[tokio::test]
async fn test_unbind_returns_previous_room() {
    let mut registry = fast_registry();
    registry.create_room(rid("A")).unwrap();
    registry.bind(cid(1), rid("A")).unwrap();

    assert_eq!(registry.unbind(cid(1)), Some(rid("A")));
    assert_eq!(registry.unbind(cid(1)), None);
    assert_eq!(registry.room_for(cid(1)), None);
}

#[tokio::test]
async fn test_destroy_room_clears_bindings() {
    let mut registry = fast_registry();
    registry.create_room(rid("A")).unwrap();
    registry.bind(cid(1), rid("A")).unwrap();

    registry.destroy_room(&rid("A")).await.unwrap();

    assert_eq!(registry.room_count(), 0);
    assert_eq!(registry.room_for(cid(1)), None);
}

#[tokio::test]
async fn test_reap_idle_removes_only_empty_rooms() {
    let mut registry = fast_registry();
    let empty = registry.create_room(rid("empty")).unwrap();
    let occupied = registry.create_room(rid("occupied")).unwrap();

    let (tx, _rx) = client();
    occupied.join(cid(1), "tok".into(), tx).await.unwrap();
    // Join and leave the empty room so only the occupied one has a
    // live connection.
    empty.join(cid(2), "tok2".into(), dummy_sender()).await.unwrap();
    empty.leave(cid(2)).await.unwrap();
    settle().await;

    let reaped = registry.reap_idle(Duration::ZERO).await;

    assert_eq!(reaped, vec![rid("empty")]);
    assert_eq!(registry.room_ids(), vec![rid("occupied")]);
}

// =========================================================================
// Join / roster tests
// =========================================================================

#[tokio::test]
async fn test_first_join_is_host_with_empty_board() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();

    let (tx, mut rx) = client();
    let role = room.join(cid(1), "tok-1".into(), tx).await.unwrap();
    assert_eq!(role, Role::Player);
    settle().await;

    let msgs = drain(&mut rx);
    match &msgs[0] {
        ServerMessage::RoomJoined {
            room_id,
            role,
            slot,
            phase,
            board,
            players,
            turn,
            is_host,
        } => {
            assert_eq!(room_id, &rid("ABC"));
            assert_eq!(*role, Role::Player);
            assert_eq!(*slot, Some(0));
            assert_eq!(*phase, Phase::Waiting);
            assert!(board.is_empty(), "no board before start");
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].name, "Player 1");
            assert_eq!(*turn, 0);
            assert!(is_host);
        }
        other => panic!("expected room_joined first, got {other:?}"),
    }
    assert!(matches!(msgs[1], ServerMessage::RosterUpdate { .. }));
}

#[tokio::test]
async fn test_second_join_broadcasts_roster_to_everyone() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();

    let (tx1, mut rx1) = client();
    let (tx2, mut rx2) = client();
    room.join(cid(1), "tok-1".into(), tx1).await.unwrap();
    settle().await;
    drain(&mut rx1);

    room.join(cid(2), "tok-2".into(), tx2).await.unwrap();
    settle().await;

    let host_msgs = drain(&mut rx1);
    match &host_msgs[0] {
        ServerMessage::RosterUpdate { players } => {
            assert_eq!(players.len(), 2);
            assert_eq!(players[1].name, "Player 2");
        }
        other => panic!("expected roster_update, got {other:?}"),
    }

    let joiner_msgs = drain(&mut rx2);
    match &joiner_msgs[0] {
        ServerMessage::RoomJoined { slot, is_host, .. } => {
            assert_eq!(*slot, Some(1));
            assert!(!is_host);
        }
        other => panic!("expected room_joined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sixth_join_becomes_spectator() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("full")).unwrap();

    for i in 1..=5 {
        let role = room
            .join(cid(i), format!("tok-{i}"), dummy_sender())
            .await
            .unwrap();
        assert_eq!(role, Role::Player);
    }

    let (tx, mut rx) = client();
    let role = room.join(cid(6), "tok-6".into(), tx).await.unwrap();
    assert_eq!(role, Role::Spectator);
    settle().await;

    let msgs = drain(&mut rx);
    match &msgs[0] {
        ServerMessage::RoomJoined { role, slot, players, .. } => {
            assert_eq!(*role, Role::Spectator);
            assert_eq!(*slot, None);
            assert_eq!(players.len(), 5, "spectators never take a slot");
        }
        other => panic!("expected room_joined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_leave_while_waiting_renumbers_slots() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();

    let (tx1, _rx1) = client();
    let (tx2, mut rx2) = client();
    let (tx3, _rx3) = client();
    room.join(cid(1), "tok-1".into(), tx1).await.unwrap();
    room.join(cid(2), "tok-2".into(), tx2).await.unwrap();
    room.join(cid(3), "tok-3".into(), tx3).await.unwrap();
    settle().await;
    drain(&mut rx2);

    room.leave(cid(1)).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx2);
    match &msgs[0] {
        ServerMessage::RosterUpdate { players } => {
            assert_eq!(players.len(), 2);
            assert_eq!(players[0].name, "Player 1");
            assert_eq!(players[1].name, "Player 2");
        }
        other => panic!("expected roster_update, got {other:?}"),
    }

    // The old slot 1 is now slot 0 and may start the game.
    room.start(cid(2)).await.unwrap();
    settle().await;
    let msgs = drain(&mut rx2);
    assert!(
        msgs.iter().any(|m| matches!(m, ServerMessage::GameStart { .. })),
        "promoted host should be able to start"
    );
}

// =========================================================================
// Start tests
// =========================================================================

#[tokio::test]
async fn test_host_start_deals_sixteen_cards_for_two_players() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();

    let (tx1, mut rx1) = client();
    let (tx2, mut rx2) = client();
    room.join(cid(1), "tok-1".into(), tx1).await.unwrap();
    room.join(cid(2), "tok-2".into(), tx2).await.unwrap();
    settle().await;
    drain(&mut rx1);
    drain(&mut rx2);

    room.start(cid(1)).await.unwrap();
    settle().await;

    for rx in [&mut rx1, &mut rx2] {
        let msgs = drain(rx);
        match &msgs[0] {
            ServerMessage::GameStart { board, turn, players } => {
                assert_eq!(board.len(), 16, "2 players deal 8 pairs");
                assert_eq!(*turn, 0);
                assert!(players.iter().all(|p| p.score == 0));
            }
            other => panic!("expected game_start, got {other:?}"),
        }
    }

    let info = room.snapshot().await.unwrap();
    assert_eq!(info.phase, Phase::Playing);
}

#[tokio::test]
async fn test_start_from_non_host_is_ignored() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();

    let (tx2, mut rx2) = client();
    room.join(cid(1), "tok-1".into(), dummy_sender()).await.unwrap();
    room.join(cid(2), "tok-2".into(), tx2).await.unwrap();
    settle().await;
    drain(&mut rx2);

    room.start(cid(2)).await.unwrap();
    settle().await;

    assert!(drain(&mut rx2).is_empty(), "non-host start must be silent");
    let info = room.snapshot().await.unwrap();
    assert_eq!(info.phase, Phase::Waiting);
}

#[tokio::test]
async fn test_start_alone_reports_actionable_error() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();

    let (tx, mut rx) = client();
    room.join(cid(1), "tok-1".into(), tx).await.unwrap();
    settle().await;
    drain(&mut rx);

    room.start(cid(1)).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx);
    match &msgs[0] {
        ServerMessage::Error { message } => {
            assert!(message.contains("at least 2"), "got: {message}");
        }
        other => panic!("expected error, got {other:?}"),
    }
    let info = room.snapshot().await.unwrap();
    assert_eq!(info.phase, Phase::Waiting);
}

#[tokio::test]
async fn test_join_after_start_is_spectator_with_live_board() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();
    room.join(cid(1), "tok-1".into(), dummy_sender()).await.unwrap();
    room.join(cid(2), "tok-2".into(), dummy_sender()).await.unwrap();
    room.start(cid(1)).await.unwrap();
    settle().await;

    let (tx, mut rx) = client();
    let role = room.join(cid(3), "tok-3".into(), tx).await.unwrap();
    assert_eq!(role, Role::Spectator);
    settle().await;

    let msgs = drain(&mut rx);
    match &msgs[0] {
        ServerMessage::RoomJoined { role, phase, board, .. } => {
            assert_eq!(*role, Role::Spectator);
            assert_eq!(*phase, Phase::Playing);
            assert_eq!(board.len(), 16, "snapshot carries the live board");
        }
        other => panic!("expected room_joined, got {other:?}"),
    }
}

// =========================================================================
// Flip / match / turn tests
// =========================================================================

/// Creates a room with two players and a started game. Returns the
/// room handle, both receivers (drained), and the dealt board.
async fn started_game(
    registry: &mut RoomRegistry,
) -> (
    flipmatch_room::RoomHandle,
    mpsc::UnboundedReceiver<ServerMessage>,
    mpsc::UnboundedReceiver<ServerMessage>,
    Board,
) {
    let room = registry.create_room(rid("game")).unwrap();
    let (tx1, mut rx1) = client();
    let (tx2, mut rx2) = client();
    room.join(cid(1), "tok-1".into(), tx1).await.unwrap();
    room.join(cid(2), "tok-2".into(), tx2).await.unwrap();
    room.start(cid(1)).await.unwrap();
    settle().await;

    drain(&mut rx2);
    let board = game_start_board(&drain(&mut rx1));
    (room, rx1, rx2, board)
}

#[tokio::test]
async fn test_match_scores_and_keeps_turn() {
    let mut registry = fast_registry();
    let (room, mut rx1, mut rx2, board) = started_game(&mut registry).await;
    let [a, b] = find_pair(&board);

    room.flip(cid(1), a).await.unwrap();
    room.flip(cid(1), b).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx1);
    assert!(matches!(
        msgs[0],
        ServerMessage::CardRevealed { position, .. } if position == a
    ));
    assert!(matches!(
        msgs[1],
        ServerMessage::CardRevealed { position, .. } if position == b
    ));
    match &msgs[2] {
        ServerMessage::MatchResult { success, matched, scores, turn } => {
            assert!(success);
            assert_eq!(*matched, [a, b]);
            assert_eq!(scores, &[1, 0]);
            assert_eq!(*turn, 0, "a match keeps the turn");
        }
        other => panic!("expected match_result, got {other:?}"),
    }

    // Spectator-free room: the other player sees the same broadcasts.
    assert_eq!(drain(&mut rx2).len(), 3);
}

#[tokio::test]
async fn test_mismatch_hides_cards_and_advances_turn_after_delay() {
    let mut registry = fast_registry();
    let (room, mut rx1, _rx2, board) = started_game(&mut registry).await;
    let [a, b] = find_mismatch(&board);

    room.flip(cid(1), a).await.unwrap();
    room.flip(cid(1), b).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx1);
    match &msgs[2] {
        ServerMessage::MatchResult { success, scores, turn, .. } => {
            assert!(!success);
            assert_eq!(scores, &[0, 0]);
            assert_eq!(*turn, 0, "turn passes only after the reveal delay");
        }
        other => panic!("expected match_result, got {other:?}"),
    }

    // A third flip while the pair is face-up must be dropped.
    let [c, _] = find_pair(&board);
    let extra = if c == a || c == b { board.len() - 1 } else { c };
    room.flip(cid(1), extra).await.unwrap();
    settle().await;
    assert!(drain(&mut rx1).is_empty(), "buffer-full flip must be silent");

    // Wait out the 20ms reveal delay.
    tokio::time::sleep(Duration::from_millis(40)).await;
    let msgs = drain(&mut rx1);
    match &msgs[0] {
        ServerMessage::TurnChange { turn, reset } => {
            assert_eq!(*turn, 1);
            assert_eq!(*reset, [a, b]);
        }
        other => panic!("expected turn_change, got {other:?}"),
    }
}

#[tokio::test]
async fn test_out_of_turn_flip_is_silent() {
    let mut registry = fast_registry();
    let (room, mut rx1, mut rx2, _board) = started_game(&mut registry).await;

    room.flip(cid(2), 0).await.unwrap();
    settle().await;

    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
}

#[tokio::test]
async fn test_spectator_flip_is_silent() {
    let mut registry = fast_registry();
    let (room, mut rx1, _rx2, _board) = started_game(&mut registry).await;
    room.join(cid(3), "tok-3".into(), dummy_sender()).await.unwrap();
    settle().await;
    drain(&mut rx1);

    room.flip(cid(3), 0).await.unwrap();
    settle().await;

    assert!(drain(&mut rx1).is_empty());
}

#[tokio::test]
async fn test_clearing_the_board_ends_the_game() {
    let mut registry = fast_registry();
    let (room, mut rx1, _rx2, board) = started_game(&mut registry).await;

    // Player 1 matches every pair; each match keeps the turn.
    for [a, b] in pairs_by_value(&board) {
        room.flip(cid(1), a).await.unwrap();
        room.flip(cid(1), b).await.unwrap();
    }
    settle().await;

    let msgs = drain(&mut rx1);
    match msgs.last() {
        Some(ServerMessage::GameOver { winner, scores }) => {
            assert_eq!(scores, &[8, 0]);
            match winner {
                Winner::Single { slot, name } => {
                    assert_eq!(*slot, 0);
                    assert_eq!(name, "Player 1");
                }
                other => panic!("expected a single winner, got {other:?}"),
            }
        }
        other => panic!("expected game_over last, got {other:?}"),
    }

    let info = room.snapshot().await.unwrap();
    assert_eq!(info.phase, Phase::Finished);
}

// =========================================================================
// Rematch tests
// =========================================================================

#[tokio::test]
async fn test_rematch_resets_scores_and_deals_fresh_board() {
    let mut registry = fast_registry();
    let (room, mut rx1, _rx2, board) = started_game(&mut registry).await;
    for [a, b] in pairs_by_value(&board) {
        room.flip(cid(1), a).await.unwrap();
        room.flip(cid(1), b).await.unwrap();
    }
    settle().await;
    drain(&mut rx1);

    // Any player may request the rematch, not just the host.
    room.rematch(cid(2)).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx1);
    match &msgs[0] {
        ServerMessage::GameReset { board, turn, players } => {
            assert_eq!(board.len(), 16);
            assert_eq!(*turn, 0);
            assert!(players.iter().all(|p| p.score == 0));
        }
        other => panic!("expected game_reset, got {other:?}"),
    }
    let info = room.snapshot().await.unwrap();
    assert_eq!(info.phase, Phase::Playing);
}

#[tokio::test]
async fn test_rematch_cancels_pending_reveal_timer() {
    let mut registry = RoomRegistry::new(RoomConfig {
        reveal_delay: Duration::from_millis(50),
        ..RoomConfig::default()
    });
    let room = registry.create_room(rid("game")).unwrap();
    let (tx1, mut rx1) = client();
    room.join(cid(1), "tok-1".into(), tx1).await.unwrap();
    room.join(cid(2), "tok-2".into(), dummy_sender()).await.unwrap();
    room.start(cid(1)).await.unwrap();
    settle().await;
    let board = game_start_board(&drain(&mut rx1));

    // Arm the reveal timer with a mismatch, then rematch before it fires.
    let [a, b] = find_mismatch(&board);
    room.flip(cid(1), a).await.unwrap();
    room.flip(cid(1), b).await.unwrap();
    settle().await;
    room.rematch(cid(1)).await.unwrap();
    settle().await;
    drain(&mut rx1);

    tokio::time::sleep(Duration::from_millis(80)).await;
    let msgs = drain(&mut rx1);
    assert!(
        !msgs.iter().any(|m| matches!(m, ServerMessage::TurnChange { .. })),
        "stale reveal timer must not touch the new game"
    );
}

#[tokio::test]
async fn test_rematch_while_waiting_is_ignored() {
    let mut registry = fast_registry();
    let room = registry.create_room(rid("ABC")).unwrap();
    let (tx, mut rx) = client();
    room.join(cid(1), "tok-1".into(), tx).await.unwrap();
    settle().await;
    drain(&mut rx);

    room.rematch(cid(1)).await.unwrap();
    settle().await;

    assert!(drain(&mut rx).is_empty());
    let info = room.snapshot().await.unwrap();
    assert_eq!(info.phase, Phase::Waiting);
}

// =========================================================================
// Disconnect / reconnect tests
// =========================================================================

#[tokio::test]
async fn test_disconnect_during_game_keeps_slot() {
    let mut registry = fast_registry();
    let (room, mut rx1, _rx2, _board) = started_game(&mut registry).await;

    room.leave(cid(2)).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx1);
    assert!(matches!(
        msgs[0],
        ServerMessage::PlayerDisconnected { slot: 1 }
    ));
    match &msgs[1] {
        ServerMessage::RosterUpdate { players } => {
            assert_eq!(players.len(), 2, "slot survives the disconnect");
            assert!(!players[1].connected);
        }
        other => panic!("expected roster_update, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reconnect_rebinds_slot_and_keeps_score() {
    let mut registry = fast_registry();
    let (room, mut rx1, _rx2, board) = started_game(&mut registry).await;

    // Score a pair, then drop the connection mid-game.
    let [a, b] = find_pair(&board);
    room.flip(cid(1), a).await.unwrap();
    room.flip(cid(1), b).await.unwrap();
    room.leave(cid(1)).await.unwrap();
    settle().await;
    drain(&mut rx1);

    // Same token, fresh connection.
    let (tx, mut rx) = client();
    let role = room.join(cid(9), "tok-1".into(), tx).await.unwrap();
    assert_eq!(role, Role::Player);
    settle().await;

    let msgs = drain(&mut rx);
    match &msgs[0] {
        ServerMessage::RoomJoined { slot, phase, board, players, is_host, .. } => {
            assert_eq!(*slot, Some(0), "token reclaims the original seat");
            assert_eq!(*phase, Phase::Playing);
            assert_eq!(board.len(), 16);
            assert_eq!(players[0].score, 1, "score survives the reconnect");
            assert!(players[0].connected);
            assert!(is_host);
        }
        other => panic!("expected room_joined, got {other:?}"),
    }

    // The rebound connection can keep playing its turn.
    let remaining: Vec<[usize; 2]> = pairs_by_value(&board)
        .into_iter()
        .filter(|pair| *pair != [a, b] && *pair != [b, a])
        .collect();
    let [c, d] = remaining[0];
    room.flip(cid(9), c).await.unwrap();
    room.flip(cid(9), d).await.unwrap();
    settle().await;
    let msgs = drain(&mut rx);
    assert!(
        msgs.iter().any(|m| matches!(
            m,
            ServerMessage::MatchResult { success: true, .. }
        )),
        "rebound connection should flip on its turn"
    );
}

#[tokio::test]
async fn test_reconnect_notice_goes_to_the_rest_of_the_room() {
    let mut registry = fast_registry();
    let (room, mut rx1, mut rx2, _board) = started_game(&mut registry).await;

    room.leave(cid(2)).await.unwrap();
    settle().await;
    drain(&mut rx1);

    let (tx, mut rx_new) = client();
    room.join(cid(9), "tok-2".into(), tx).await.unwrap();
    settle().await;

    let msgs = drain(&mut rx1);
    assert!(matches!(
        msgs[0],
        ServerMessage::PlayerReconnected { slot: 1 }
    ));

    // The reconnecting client gets its snapshot, not the notice.
    let own = drain(&mut rx_new);
    assert!(matches!(own[0], ServerMessage::RoomJoined { .. }));
    assert!(
        !own.iter().any(|m| matches!(m, ServerMessage::PlayerReconnected { .. }))
    );

    // The stale receiver saw nothing new after its connection left.
    assert!(drain(&mut rx2)
        .iter()
        .all(|m| !matches!(m, ServerMessage::PlayerReconnected { .. })));
}
