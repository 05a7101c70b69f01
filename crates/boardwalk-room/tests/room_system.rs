//! Integration tests for the room system: registry, actors, and fan-out
//! working together.

use std::sync::Arc;

use boardwalk_protocol::{RoomId, RoomSnapshot, RoomStatus, ServerMessage};
use boardwalk_room::{Broadcaster, LoadedDice, RoomConfig, RoomHandle, RoomRegistry};
use boardwalk_transport::ConnectionId;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id)
}

fn room(id: &str) -> RoomId {
    RoomId::new(id)
}

fn registry_with_dice(rolls: Vec<[u8; 2]>) -> RoomRegistry {
    RoomRegistry::new(
        RoomConfig::default(),
        Arc::new(Broadcaster::new()),
        Arc::new(LoadedDice::new(rolls)),
    )
}

/// Rolls for `conn` and waits until the actor has processed the roll.
async fn roll_and_settle(handle: &RoomHandle, id: &str) -> RoomSnapshot {
    handle.roll(conn(id)).await.unwrap();
    handle.snapshot().await.unwrap()
}

fn listed_ids(summaries: &[boardwalk_protocol::RoomSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.id.as_str()).collect()
}

// =========================================================================
// Registry lifecycle
// =========================================================================

#[tokio::test]
async fn test_fresh_room_is_empty_and_waiting() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let handle = registry.get_or_create(&room("r1")).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.players.is_empty());
    assert_eq!(snapshot.status, RoomStatus::Waiting);
    assert_eq!(snapshot.mode, "casual");
    assert_eq!(snapshot.board.len(), 40);
    assert!(snapshot.created_at > 0);
}

#[tokio::test]
async fn test_last_leave_removes_room_from_list() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let handle = registry.get_or_create(&room("r1")).await;
    handle.join(conn("c1"), None).await.unwrap();
    assert_eq!(listed_ids(&registry.list().await), vec!["lobby", "r1"]);

    let outcome = handle.leave(conn("c1")).await.unwrap();
    assert!(outcome.closed);
    registry.evict(&handle).await;

    assert_eq!(listed_ids(&registry.list().await), vec!["lobby"]);
}

#[tokio::test]
async fn test_closed_room_is_skipped_before_eviction() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let handle = registry.get_or_create(&room("r1")).await;
    handle.join(conn("c1"), None).await.unwrap();
    handle.leave(conn("c1")).await.unwrap();

    assert_eq!(listed_ids(&registry.list().await), vec!["lobby"]);
}

#[tokio::test]
async fn test_lobby_survives_last_leave() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let lobby = registry.get_or_create(&room("lobby")).await;
    lobby.join(conn("c1"), Some("Ann".into())).await.unwrap();

    let outcome = lobby.leave(conn("c1")).await.unwrap();

    assert!(!outcome.closed);
    let summaries = registry.list().await;
    assert_eq!(listed_ids(&summaries), vec!["lobby"]);
    assert_eq!(summaries[0].players, 0);
    assert_eq!(summaries[0].status, RoomStatus::Waiting);
}

#[tokio::test]
async fn test_get_or_create_after_close_spawns_fresh_room() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let first = registry.get_or_create(&room("r1")).await;
    first.join(conn("c1"), None).await.unwrap();
    first.leave(conn("c1")).await.unwrap();

    let second = registry.get_or_create(&room("r1")).await;

    assert_ne!(first.instance(), second.instance());
    let outcome = second.join(conn("c2"), None).await.unwrap();
    assert_eq!(outcome.players, 1);
}

// =========================================================================
// Joining
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_all_seated() {
    let registry = Arc::new(registry_with_dice(vec![[1, 1]]));
    let mut tasks = Vec::new();
    for i in 0..8 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            let handle = registry.get_or_create(&room("busy")).await;
            handle.join(conn(&format!("c{i}")), None).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let snapshot = registry
        .get(&room("busy"))
        .await
        .unwrap()
        .snapshot()
        .await
        .unwrap();
    assert_eq!(snapshot.players.len(), 8);
    assert_eq!(snapshot.current_player_index, 0);
}

#[tokio::test]
async fn test_join_update_reaches_every_member() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let broadcaster = Arc::clone(registry.broadcaster());
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    broadcaster.register(conn("c1"), tx1).await;
    broadcaster.register(conn("c2"), tx2).await;

    let handle = registry.get_or_create(&room("r1")).await;
    handle.join(conn("c1"), Some("Ann".into())).await.unwrap();
    handle.join(conn("c2"), Some("Bob".into())).await.unwrap();

    // c1 saw both joins, c2 only its own.
    let mut c1_updates = 0;
    while let Ok(ServerMessage::RoomUpdate { .. }) = rx1.try_recv() {
        c1_updates += 1;
    }
    assert_eq!(c1_updates, 2);
    match rx2.try_recv() {
        Ok(ServerMessage::RoomUpdate { room }) => assert_eq!(room.players.len(), 2),
        other => panic!("expected RoomUpdate, got {other:?}"),
    }
}

// =========================================================================
// Turns
// =========================================================================

#[tokio::test]
async fn test_ann_and_bob_first_turn() {
    let registry = registry_with_dice(vec![[3, 4]]);
    let handle = registry.get_or_create(&room("r1")).await;
    handle.join(conn("c1"), Some("Ann".into())).await.unwrap();
    handle.join(conn("c2"), Some("Bob".into())).await.unwrap();
    let before = handle.snapshot().await.unwrap();

    let after_first = roll_and_settle(&handle, "c1").await;

    assert_eq!(after_first.current_player_index, 1);
    assert_eq!(after_first.players[0].position, 7);
    assert_eq!(after_first.players[0].last_roll, [3, 4]);
    assert_eq!(after_first.players[1], before.players[1]);

    // Not Ann's turn any more.
    let after_second = roll_and_settle(&handle, "c1").await;
    assert_eq!(after_second, after_first);
}

#[tokio::test]
async fn test_turn_order_cycles_through_players() {
    let registry = registry_with_dice(vec![[1, 1]]);
    let handle = registry.get_or_create(&room("r1")).await;
    let ids = ["c1", "c2", "c3"];
    for id in ids {
        handle.join(conn(id), None).await.unwrap();
    }

    for (turn, id) in ids.iter().enumerate() {
        let snapshot = roll_and_settle(&handle, id).await;
        assert_eq!(snapshot.current_player_index, (turn + 1) % ids.len());
    }
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current_player_index, 0);
}

#[tokio::test]
async fn test_rent_is_deducted_and_not_credited() {
    // Both land on tile 3 (price 160, rent 25): c1 buys, c2 pays.
    let registry = registry_with_dice(vec![[1, 2]]);
    let handle = registry.get_or_create(&room("r1")).await;
    handle.join(conn("c1"), None).await.unwrap();
    handle.join(conn("c2"), None).await.unwrap();

    roll_and_settle(&handle, "c1").await;
    let snapshot = roll_and_settle(&handle, "c2").await;

    assert_eq!(snapshot.players[0].properties, vec![3]);
    assert_eq!(snapshot.players[0].cash, 1500 - 160);
    assert!(snapshot.players[1].properties.is_empty());
    assert_eq!(snapshot.players[1].cash, 1500 - 25);
}

#[tokio::test]
async fn test_roll_in_missing_room_creates_nothing() {
    let registry = registry_with_dice(vec![[1, 1]]);
    assert!(registry.get(&room("ghost")).await.is_err());
    assert_eq!(registry.room_count().await, 1);
}
