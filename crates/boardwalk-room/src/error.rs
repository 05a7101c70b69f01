//! Error types for the room layer.

use boardwalk_protocol::RoomId;

/// Errors that can occur during room operations.
///
/// These never reach clients: a missing or closed room is the silent
/// no-op the game rules call for, and callers log and move on.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room's actor has stopped (the room emptied or was deleted)
    /// or its command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
