//! The binding table: every live connection's seats.
//!
//! # Concurrency note
//!
//! `BindingTable` is a plain `HashMap` and is not thread-safe by itself.
//! The server wraps it in a mutex and holds that lock only for the map
//! operation, never across a call into a room.

use std::collections::HashMap;

use boardwalk_protocol::{PlayerId, RoomId};
use boardwalk_transport::ConnectionId;

use crate::{Binding, BindingError};

/// Maps connections to the rooms (and players) they own.
///
/// ```text
/// bind() ──→ [seated] ──→ unbind() ──→ [connected, no seats]
///                │                           │
///                └────────→ release() ←──────┘
///                              │
///                              ▼
///                          [forgotten]
/// ```
#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: HashMap<ConnectionId, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `conn` controls `player_id` in `room_id`.
    ///
    /// Re-binding the same room replaces the previous player id.
    pub fn bind(&mut self, conn: &ConnectionId, room_id: RoomId, player_id: PlayerId) {
        let binding = self
            .bindings
            .entry(conn.clone())
            .or_insert_with(|| Binding::new(conn.clone()));
        binding.seats.insert(room_id, player_id);
        tracing::debug!(
            conn_id = %conn,
            seats = binding.seats.len(),
            "connection bound"
        );
    }

    /// Drops the seat `conn` holds in `room_id`, returning its player id.
    ///
    /// The connection's binding itself survives (possibly empty) until
    /// [`release`](Self::release).
    ///
    /// # Errors
    /// - [`BindingError::UnknownConnection`] — `conn` was never bound
    /// - [`BindingError::NotInRoom`] — `conn` has no seat in `room_id`
    pub fn unbind(
        &mut self,
        conn: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<PlayerId, BindingError> {
        let binding = self
            .bindings
            .get_mut(conn)
            .ok_or_else(|| BindingError::UnknownConnection(conn.clone()))?;
        binding
            .seats
            .remove(room_id)
            .ok_or_else(|| BindingError::NotInRoom(conn.clone(), room_id.clone()))
    }

    /// Forgets `conn` entirely and returns every seat it held.
    ///
    /// Idempotent: a second call returns an empty list.
    pub fn release(&mut self, conn: &ConnectionId) -> Vec<(RoomId, PlayerId)> {
        match self.bindings.remove(conn) {
            Some(binding) => {
                tracing::debug!(
                    conn_id = %conn,
                    seats = binding.seats.len(),
                    "connection binding released"
                );
                binding.seats.into_iter().collect()
            }
            None => Vec::new(),
        }
    }

    pub fn get(&self, conn: &ConnectionId) -> Option<&Binding> {
        self.bindings.get(conn)
    }

    /// Returns the player `conn` controls in `room_id`, if any.
    pub fn player_in(&self, conn: &ConnectionId, room_id: &RoomId) -> Option<&PlayerId> {
        self.bindings.get(conn)?.player_in(room_id)
    }

    /// Returns the rooms `conn` is seated in.
    pub fn rooms_of(&self, conn: &ConnectionId) -> Vec<RoomId> {
        self.bindings
            .get(conn)
            .map(|b| b.seats.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops every seat in `room_id`, across all connections.
    ///
    /// Used when a room is deleted out from under its bindings.
    pub fn forget_room(&mut self, room_id: &RoomId) {
        for binding in self.bindings.values_mut() {
            binding.seats.remove(room_id);
        }
    }

    /// Number of connections with a binding (seated or not).
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
