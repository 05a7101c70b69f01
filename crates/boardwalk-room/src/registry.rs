//! Room registry: creates, finds, lists, and deletes rooms.

use std::collections::HashMap;
use std::sync::Arc;

use boardwalk_protocol::{RoomId, RoomSummary};
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{Broadcaster, Dice, Room, RoomConfig, RoomError, RoomHandle};

const GENERATED_ID_PREFIX: &str = "room_";
const GENERATED_ID_LEN: usize = 6;

struct Rooms {
    handles: HashMap<RoomId, RoomHandle>,
    /// Handed to each spawned actor; orders rooms by creation.
    next_instance: u64,
}

/// Process-wide map of room id to running room actor.
///
/// The lobby room is spawned by [`new`](Self::new) and never deleted.
/// Every other room is created on first use and removed when its last
/// player leaves.
///
/// # Concurrency
///
/// One async mutex guards the map. It is held only for the map operation
/// itself, never while waiting on a room actor.
pub struct RoomRegistry {
    rooms: Mutex<Rooms>,
    config: RoomConfig,
    broadcaster: Arc<Broadcaster>,
    dice: Arc<dyn Dice>,
}

impl RoomRegistry {
    /// Creates a registry holding only the lobby.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: RoomConfig, broadcaster: Arc<Broadcaster>, dice: Arc<dyn Dice>) -> Self {
        let mut registry = Self {
            rooms: Mutex::new(Rooms {
                handles: HashMap::new(),
                next_instance: 0,
            }),
            config,
            broadcaster,
            dice,
        };
        let lobby_id = registry.config.lobby_room_id();
        let mode = registry.config.default_mode.clone();
        let lobby = registry.spawn(lobby_id.clone(), mode, 0);

        let rooms = registry.rooms.get_mut();
        rooms.handles.insert(lobby_id, lobby);
        rooms.next_instance = 1;
        registry
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// Whether `room_id` names the persistent lobby.
    pub fn is_lobby(&self, room_id: &RoomId) -> bool {
        room_id.as_str() == self.config.lobby_id
    }

    /// Returns the running room with this id, creating an empty one
    /// (default mode) if none exists. Never fails.
    pub async fn get_or_create(&self, room_id: &RoomId) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.handles.get(room_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }
        let mode = self.config.default_mode.clone();
        self.insert_new(&mut rooms, room_id.clone(), mode)
    }

    /// Looks up a room without creating it.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no running room has this id.
    pub async fn get(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .lock()
            .await
            .handles
            .get(room_id)
            .filter(|h| !h.is_closed())
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Creates an empty room under a fresh generated id.
    ///
    /// An absent or empty `mode` falls back to the configured default.
    pub async fn create(&self, mode: Option<&str>) -> RoomId {
        let mode = match mode {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => self.config.default_mode.clone(),
        };
        let mut rooms = self.rooms.lock().await;
        let room_id = loop {
            let candidate = generate_room_id();
            if !rooms.handles.contains_key(&candidate) {
                break candidate;
            }
        };
        self.insert_new(&mut rooms, room_id.clone(), mode);
        room_id
    }

    /// Removes a room and stops its actor. Returns `false` for the lobby
    /// or an unknown id.
    pub async fn delete(&self, room_id: &RoomId) -> bool {
        if self.is_lobby(room_id) {
            tracing::debug!(%room_id, "refusing to delete the lobby");
            return false;
        }
        // Held until the actor has dropped its subscribers, so a room
        // recreated under this id never loses its own.
        let mut rooms = self.rooms.lock().await;
        let Some(handle) = rooms.handles.remove(room_id) else {
            return false;
        };
        if let Err(e) = handle.shutdown().await {
            tracing::debug!(%room_id, error = %e, "room already stopped");
            self.broadcaster.drop_room(room_id).await;
        }
        drop(rooms);
        tracing::info!(%room_id, "room deleted");
        true
    }

    /// Removes `handle`'s room if the map still points at that exact
    /// actor. A newer room under the same id is left alone.
    pub async fn evict(&self, handle: &RoomHandle) {
        let mut rooms = self.rooms.lock().await;
        let current = rooms
            .handles
            .get(handle.room_id())
            .map(RoomHandle::instance);
        if current == Some(handle.instance()) {
            rooms.handles.remove(handle.room_id());
            tracing::info!(
                room_id = %handle.room_id(),
                instance = handle.instance(),
                "room removed from registry"
            );
        }
    }

    /// Summaries of every running room, in creation order.
    pub async fn list(&self) -> Vec<RoomSummary> {
        let handles = {
            let rooms = self.rooms.lock().await;
            let mut handles: Vec<RoomHandle> = rooms.handles.values().cloned().collect();
            handles.sort_by_key(RoomHandle::instance);
            handles
        };

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.summary().await {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::debug!(error = %e, "skipping closed room in list"),
            }
        }
        summaries
    }

    /// Number of rooms in the map, the lobby included.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.handles.len()
    }

    fn insert_new(&self, rooms: &mut Rooms, room_id: RoomId, mode: String) -> RoomHandle {
        let instance = rooms.next_instance;
        rooms.next_instance += 1;
        let handle = self.spawn(room_id.clone(), mode, instance);
        rooms.handles.insert(room_id, handle.clone());
        handle
    }

    fn spawn(&self, room_id: RoomId, mode: String, instance: u64) -> RoomHandle {
        let persistent = self.is_lobby(&room_id);
        tracing::info!(%room_id, %mode, instance, "room created");
        let room = Room::new(room_id, mode, self.config.rules.clone());
        spawn_room(
            room,
            persistent,
            instance,
            self.config.channel_size,
            Arc::clone(&self.broadcaster),
            Arc::clone(&self.dice),
        )
    }
}

fn generate_room_id() -> RoomId {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    RoomId::new(format!("{GENERATED_ID_PREFIX}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandomDice;
    use boardwalk_transport::ConnectionId;

    fn registry() -> RoomRegistry {
        RoomRegistry::new(
            RoomConfig::default(),
            Arc::new(Broadcaster::new()),
            Arc::new(RandomDice),
        )
    }

    #[test]
    fn test_generate_room_id_shape() {
        let id = generate_room_id();
        let suffix = id.as_str().strip_prefix("room_").unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[tokio::test]
    async fn test_new_registry_holds_lobby() {
        let registry = registry();
        assert_eq!(registry.room_count().await, 1);
        assert!(registry.get(&RoomId::new("lobby")).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing_room() {
        let registry = registry();
        let a = registry.get_or_create(&RoomId::new("r1")).await;
        let b = registry.get_or_create(&RoomId::new("r1")).await;
        assert_eq!(a.instance(), b.instance());
        assert_eq!(registry.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_get_missing_room_is_not_found() {
        let registry = registry();
        let result = registry.get(&RoomId::new("nope")).await;
        assert!(matches!(result, Err(RoomError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_uses_mode_or_default() {
        let registry = registry();
        let ranked = registry.create(Some("ranked")).await;
        let blank = registry.create(Some("")).await;

        let ranked = registry.get(&ranked).await.unwrap().summary().await.unwrap();
        let blank = registry.get(&blank).await.unwrap().summary().await.unwrap();
        assert_eq!(ranked.mode, "ranked");
        assert_eq!(blank.mode, "casual");
    }

    #[tokio::test]
    async fn test_delete_lobby_is_noop() {
        let registry = registry();
        assert!(!registry.delete(&RoomId::new("lobby")).await);
        assert!(registry.get(&RoomId::new("lobby")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_room() {
        let registry = registry();
        let handle = registry.get_or_create(&RoomId::new("r1")).await;

        assert!(registry.delete(&RoomId::new("r1")).await);
        assert!(registry.get(&RoomId::new("r1")).await.is_err());
        assert!(handle.summary().await.is_err());
        assert!(!registry.delete(&RoomId::new("r1")).await);
    }

    #[tokio::test]
    async fn test_delete_drops_subscribers_before_returning() {
        let registry = registry();
        let handle = registry.get_or_create(&RoomId::new("r1")).await;
        handle.join(ConnectionId::new("c1"), None).await.unwrap();

        assert!(registry.delete(&RoomId::new("r1")).await);

        assert!(registry.broadcaster().members(&RoomId::new("r1")).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_room_recreated_during_delete_keeps_subscribers() {
        for _ in 0..50 {
            let registry = Arc::new(registry());
            let old = registry.get_or_create(&RoomId::new("r1")).await;
            old.join(ConnectionId::new("c1"), None).await.unwrap();

            let deleter = {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.delete(&RoomId::new("r1")).await })
            };
            let joiner = {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    loop {
                        let handle = registry.get_or_create(&RoomId::new("r1")).await;
                        if handle.instance() != old.instance() {
                            handle.join(ConnectionId::new("c2"), None).await.unwrap();
                            break;
                        }
                        tokio::task::yield_now().await;
                    }
                })
            };
            assert!(deleter.await.unwrap());
            joiner.await.unwrap();

            assert_eq!(
                registry.broadcaster().members(&RoomId::new("r1")).await,
                vec![ConnectionId::new("c2")]
            );
        }
    }

    #[tokio::test]
    async fn test_evict_ignores_newer_instance() {
        let registry = registry();
        let old = registry.get_or_create(&RoomId::new("r1")).await;
        registry.delete(&RoomId::new("r1")).await;
        let new = registry.get_or_create(&RoomId::new("r1")).await;

        registry.evict(&old).await;

        let current = registry.get(&RoomId::new("r1")).await.unwrap();
        assert_eq!(current.instance(), new.instance());
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let registry = registry();
        registry.get_or_create(&RoomId::new("zeta")).await;
        registry.get_or_create(&RoomId::new("alpha")).await;

        let ids: Vec<String> = registry
            .list()
            .await
            .into_iter()
            .map(|s| s.id.0)
            .collect();
        assert_eq!(ids, vec!["lobby", "zeta", "alpha"]);
    }
}
