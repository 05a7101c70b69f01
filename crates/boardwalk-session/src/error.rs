//! Error types for the binding layer.

use boardwalk_protocol::RoomId;
use boardwalk_transport::ConnectionId;

/// Errors returned by [`BindingTable`](crate::BindingTable) lookups.
///
/// None of these reach a client; callers treat them as "nothing to clean
/// up" and move on.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// The connection has no binding at all.
    #[error("connection {0} is not bound to any room")]
    UnknownConnection(ConnectionId),

    /// The connection is bound, but not to this room.
    #[error("connection {0} is not bound to room {1}")]
    NotInRoom(ConnectionId, RoomId),
}
