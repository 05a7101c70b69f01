//! The game service: join, leave, roll, and disconnect across rooms.
//!
//! `GameService` is the one mutation surface above the room actors. It
//! ties three pieces together:
//!
//! ```text
//!   BindingTable (who sits where) ─┐
//!   RoomRegistry (room actors)  ───┼──→ GameService
//!   Broadcaster  (fan-out)      ───┘
//! ```
//!
//! Every operation here is silent on failure: a missing room, a missing
//! player, or a room that closed mid-request is logged at debug level and
//! otherwise ignored.

use std::sync::Arc;

use boardwalk_protocol::{RoomId, RoomSnapshot, RoomSummary};
use boardwalk_room::{
    Broadcaster, ClientSender, Dice, JoinOutcome, RoomConfig, RoomError, RoomHandle, RoomRegistry,
};
use boardwalk_session::BindingTable;
use boardwalk_transport::ConnectionId;
use tokio::sync::Mutex;

/// How many times a join chases a room that closed under it.
const MAX_JOIN_ATTEMPTS: usize = 3;

pub struct GameService {
    registry: RoomRegistry,
    bindings: Mutex<BindingTable>,
}

impl GameService {
    /// Creates a service whose registry holds only the lobby.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: RoomConfig, dice: Arc<dyn Dice>) -> Self {
        let broadcaster = Arc::new(Broadcaster::new());
        Self {
            registry: RoomRegistry::new(config, broadcaster, dice),
            bindings: Mutex::new(BindingTable::new()),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    fn broadcaster(&self) -> &Broadcaster {
        self.registry.broadcaster()
    }

    /// Starts delivering broadcasts to a newly accepted connection.
    pub async fn connect(&self, conn: ConnectionId, sender: ClientSender) {
        self.broadcaster().register(conn, sender).await;
    }

    /// Seats the connection in `room_id`, creating the room if needed.
    ///
    /// The room's members get the new snapshot and every connection gets
    /// the updated room list. Joining a room the connection already sits
    /// in changes nothing.
    ///
    /// # Errors
    /// [`RoomError::Unavailable`] if the room kept closing under the join.
    pub async fn join(
        &self,
        conn: &ConnectionId,
        room_id: &RoomId,
        nickname: Option<String>,
    ) -> Result<JoinOutcome, RoomError> {
        for _ in 0..MAX_JOIN_ATTEMPTS {
            let handle = self.registry.get_or_create(room_id).await;
            match handle.join(conn.clone(), nickname.clone()).await {
                Ok(outcome) => {
                    if outcome.seated {
                        self.bindings.lock().await.bind(
                            conn,
                            room_id.clone(),
                            outcome.player_id.clone(),
                        );
                        self.publish_room_list().await;
                    }
                    return Ok(outcome);
                }
                Err(RoomError::Unavailable(_)) => {
                    tracing::debug!(%room_id, conn_id = %conn, "room closed during join, retrying");
                    self.registry.evict(&handle).await;
                }
                Err(e) => return Err(e),
            }
        }
        Err(RoomError::Unavailable(room_id.clone()))
    }

    /// Removes the connection's player from `room_id`.
    ///
    /// A room other than the lobby is deleted when its last player leaves;
    /// otherwise its members get the new snapshot. Either way every
    /// connection gets the updated room list.
    pub async fn leave(&self, conn: &ConnectionId, room_id: &RoomId) {
        let unbound = self.bindings.lock().await.unbind(conn, room_id);
        if let Err(e) = unbound {
            tracing::debug!(%room_id, conn_id = %conn, error = %e, "leave ignored");
            return;
        }
        if self.leave_room(conn, room_id).await {
            self.publish_room_list().await;
        }
    }

    /// Asks `room_id` to take a turn for the connection's player.
    ///
    /// Rolls into a missing room, or out of turn, change nothing.
    pub async fn roll(&self, conn: &ConnectionId, room_id: &RoomId) {
        let result = match self.registry.get(room_id).await {
            Ok(handle) => handle.roll(conn.clone()).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::debug!(%room_id, conn_id = %conn, error = %e, "roll ignored");
        }
    }

    /// Leaves every room the connection sits in and forgets it.
    ///
    /// Idempotent.
    pub async fn disconnect(&self, conn: &ConnectionId) {
        let seats = self.bindings.lock().await.release(conn);
        self.broadcaster().unregister(conn).await;

        let mut changed = false;
        for (room_id, _) in &seats {
            changed |= self.leave_room(conn, room_id).await;
        }
        if changed {
            self.publish_room_list().await;
        }
        tracing::debug!(conn_id = %conn, rooms = seats.len(), "connection released");
    }

    /// Creates an empty room under a generated id and announces it.
    pub async fn create_room(&self, mode: Option<&str>) -> RoomId {
        let room_id = self.registry.create(mode).await;
        self.publish_room_list().await;
        room_id
    }

    /// Deletes a room out from under its players. The lobby is never
    /// deleted.
    pub async fn delete_room(&self, room_id: &RoomId) -> bool {
        if !self.registry.delete(room_id).await {
            return false;
        }
        self.bindings.lock().await.forget_room(room_id);
        self.publish_room_list().await;
        true
    }

    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        self.registry.list().await
    }

    /// Current state of one room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room does not exist.
    pub async fn snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomError> {
        self.registry.get(room_id).await?.snapshot().await
    }

    /// The rooms `conn` is seated in.
    pub async fn rooms_of(&self, conn: &ConnectionId) -> Vec<RoomId> {
        self.bindings.lock().await.rooms_of(conn)
    }

    async fn publish_room_list(&self) {
        let rooms = self.registry.list().await;
        self.broadcaster().publish_room_list(&rooms).await;
    }

    /// Removes the player from the room's actor. Returns whether the room
    /// changed.
    async fn leave_room(&self, conn: &ConnectionId, room_id: &RoomId) -> bool {
        let handle = match self.registry.get(room_id).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!(%room_id, conn_id = %conn, error = %e, "leave ignored");
                return false;
            }
        };
        match handle.leave(conn.clone()).await {
            Ok(outcome) => {
                if outcome.closed {
                    self.registry.evict(&handle).await;
                }
                outcome.removed
            }
            Err(e) => {
                tracing::debug!(%room_id, conn_id = %conn, error = %e, "leave ignored");
                self.evict_if_closed(&handle).await;
                false
            }
        }
    }

    async fn evict_if_closed(&self, handle: &RoomHandle) {
        if handle.is_closed() {
            self.registry.evict(handle).await;
        }
    }
}
