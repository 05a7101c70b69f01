//! Broadcast fan-out: who hears about which room.
//!
//! The broadcaster keeps two pieces of explicit state:
//! - every connected client's outbound channel, for the global room list;
//! - per room id, the set of connections seated there, for snapshots.
//!
//! Room actors update the per-room sets while they process joins and
//! leaves, so a snapshot always goes to exactly the members that produced
//! it. Sends are fire-and-forget: a closed channel means the connection is
//! going away and the message is dropped.

use std::collections::{HashMap, HashSet};

use boardwalk_protocol::{RoomId, RoomSnapshot, RoomSummary, ServerMessage};
use boardwalk_transport::ConnectionId;
use tokio::sync::{Mutex, mpsc};

/// Channel sender for delivering outbound messages to one connection.
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

#[derive(Default)]
struct Subscribers {
    clients: HashMap<ConnectionId, ClientSender>,
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl Subscribers {
    fn send_to(&self, conn: &ConnectionId, msg: ServerMessage) {
        if let Some(sender) = self.clients.get(conn) {
            let _ = sender.send(msg);
        }
    }
}

/// Delivers room snapshots to room members and room lists to everyone.
#[derive(Default)]
pub struct Broadcaster {
    inner: Mutex<Subscribers>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts delivering messages for `conn` through `sender`.
    pub async fn register(&self, conn: ConnectionId, sender: ClientSender) {
        self.inner.lock().await.clients.insert(conn, sender);
    }

    /// Stops delivering to `conn` and removes it from every room.
    pub async fn unregister(&self, conn: &ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.clients.remove(conn);
        for members in inner.rooms.values_mut() {
            members.remove(conn);
        }
        inner.rooms.retain(|_, members| !members.is_empty());
    }

    /// Adds `conn` to the members of `room_id`.
    pub async fn subscribe(&self, room_id: &RoomId, conn: &ConnectionId) {
        self.inner
            .lock()
            .await
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(conn.clone());
    }

    /// Removes `conn` from the members of `room_id`.
    pub async fn unsubscribe(&self, room_id: &RoomId, conn: &ConnectionId) {
        let mut inner = self.inner.lock().await;
        if let Some(members) = inner.rooms.get_mut(room_id) {
            members.remove(conn);
            if members.is_empty() {
                inner.rooms.remove(room_id);
            }
        }
    }

    /// Forgets every member of a deleted room.
    pub async fn drop_room(&self, room_id: &RoomId) {
        self.inner.lock().await.rooms.remove(room_id);
    }

    /// Returns the connections currently joined to `room_id`.
    pub async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        let mut members: Vec<ConnectionId> = inner
            .rooms
            .get(room_id)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Number of registered connections.
    pub async fn client_count(&self) -> usize {
        self.inner.lock().await.clients.len()
    }

    /// Sends the full snapshot to every connection joined to its room.
    pub async fn publish_room(&self, snapshot: &RoomSnapshot) {
        let inner = self.inner.lock().await;
        let Some(members) = inner.rooms.get(&snapshot.id) else {
            return;
        };
        for conn in members {
            inner.send_to(
                conn,
                ServerMessage::RoomUpdate {
                    room: snapshot.clone(),
                },
            );
        }
    }

    /// Sends the room list to every registered connection.
    pub async fn publish_room_list(&self, rooms: &[RoomSummary]) {
        let inner = self.inner.lock().await;
        for sender in inner.clients.values() {
            let _ = sender.send(ServerMessage::RoomList {
                rooms: rooms.to_vec(),
            });
        }
    }
}
