//! The per-connection binding record.

use std::collections::BTreeMap;

use boardwalk_protocol::{PlayerId, RoomId};
use boardwalk_transport::ConnectionId;

/// The rooms one connection is seated in.
///
/// Normal clients sit in one room at a time, but nothing stops a client
/// from joining several; every seat is tracked so disconnect cleanup is
/// complete.
#[derive(Debug, Clone)]
pub struct Binding {
    pub connection_id: ConnectionId,
    /// Room → the player this connection controls there.
    pub(crate) seats: BTreeMap<RoomId, PlayerId>,
}

impl Binding {
    pub(crate) fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            seats: BTreeMap::new(),
        }
    }

    /// Returns the player this connection controls in `room_id`.
    pub fn player_in(&self, room_id: &RoomId) -> Option<&PlayerId> {
        self.seats.get(room_id)
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}
