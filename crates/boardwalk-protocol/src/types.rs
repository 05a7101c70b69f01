//! Core protocol types for Boardwalk's wire format.
//!
//! Everything in this module travels on the wire: the inbound actions a
//! client sends, the outbound events the server pushes, and the room data
//! (board, players, summaries) those events carry.
//!
//! Field names are camelCase on the wire because the browser client reads
//! them directly (`currentPlayerIndex`, `inJail`, `lastRoll`).

use std::fmt;

use boardwalk_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player inside a room.
///
/// A player is bound 1:1 to the connection that joined, so the id is the
/// connection id's string. `#[serde(transparent)]` keeps it a plain JSON
/// string rather than `{"0": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ConnectionId> for PlayerId {
    fn from(conn: &ConnectionId) -> Self {
        Self(conn.as_str().to_owned())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unique identifier for a room (one game session).
///
/// Room ids are chosen by clients (any string) or generated by the server
/// for rooms created through [`ClientMessage::CreateRoom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Board tiles
// ---------------------------------------------------------------------------

/// The four named corner squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    Start,
    Jail,
    FreeParking,
    GoToJail,
}

impl Corner {
    /// The display name shown on the board.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Jail => "Jail",
            Self::FreeParking => "Free Parking",
            Self::GoToJail => "Go-To-Jail",
        }
    }
}

/// What kind of square a tile is, plus the data only that kind carries.
///
/// Internally tagged, and flattened into [`Tile`], so a tile serializes as
/// `{"id": 1, "name": "...", "type": "property", "price": 120, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TileKind {
    Corner { corner: Corner },
    Chance,
    Tax,
    Rail,
    Property { color: String, price: i64, rent: i64 },
}

/// One square of the board. Immutable once the board is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Board index, 0–39.
    pub id: usize,
    pub name: String,
    #[serde(flatten)]
    pub kind: TileKind,
}

impl Tile {
    /// Returns `(price, rent)` if this tile is a property.
    pub fn property_terms(&self) -> Option<(i64, i64)> {
        match self.kind {
            TileKind::Property { price, rent, .. } => Some((price, rent)),
            _ => None,
        }
    }

    pub fn is_corner(&self, corner: Corner) -> bool {
        matches!(self.kind, TileKind::Corner { corner: c } if c == corner)
    }
}

// ---------------------------------------------------------------------------
// Players and rooms
// ---------------------------------------------------------------------------

/// One participant inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    /// Board index, 0–39.
    pub position: usize,
    /// May go negative; there is no bankruptcy rule.
    pub cash: i64,
    /// Board indices of owned properties, in purchase order.
    pub properties: Vec<usize>,
    pub in_jail: bool,
    /// The last dice pair rolled, `[0, 0]` before the first roll.
    pub last_roll: [u8; 2],
}

/// Room lifecycle label.
///
/// `Waiting` while nobody is seated; `Active` once at least one player is
/// in the room and holds the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Active,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// The full state of one room, as pushed to its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub mode: String,
    pub board: Vec<Tile>,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub status: RoomStatus,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// A lightweight room description for the lobby list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub mode: String,
    /// Number of players currently seated.
    pub players: usize,
    pub status: RoomStatus,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Actions a client can send.
///
/// Internally tagged: `{"type": "join", "roomId": "r1", "nickname": "Ann"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Take a seat in a room, creating the room if it does not exist.
    Join {
        room_id: RoomId,
        #[serde(default)]
        nickname: Option<String>,
    },

    /// Give up the seat in a room.
    Leave { room_id: RoomId },

    /// Roll the dice, if it is this connection's turn.
    Roll { room_id: RoomId },

    /// Create an empty room with a server-generated id.
    CreateRoom {
        #[serde(default)]
        mode: Option<String>,
    },

    /// Ask for the current room list.
    ListRooms,

    /// Keep-alive. `client_time` is echoed back for RTT measurement.
    Heartbeat { client_time: u64 },

    /// The client is going away.
    Disconnect { reason: String },
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First frame on every connection.
    Welcome {
        connection_id: String,
        protocol_version: u32,
    },

    /// Full snapshot of a room the connection is seated in.
    RoomUpdate { room: RoomSnapshot },

    /// Summary of every room on the server.
    RoomList { rooms: Vec<RoomSummary> },

    /// Reply to [`ClientMessage::CreateRoom`].
    RoomCreated { room_id: RoomId },

    HeartbeatAck { client_time: u64, server_time: u64 },

    /// The inbound frame could not be understood. Game actions never
    /// produce this; out-of-turn or stale actions are silently ignored.
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level frame. Every message on the wire is an `Envelope`.
///
/// ```text
/// ┌──────────────────────────────┐
/// │ seq: 42                      │  ← per-sender ordering
/// │ timestamp: 15000             │  ← ms since the sender started
/// │ ┌──────────────────────────┐ │
/// │ │ payload: {"type": ...}   │ │
/// │ └──────────────────────────┘ │
/// └──────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<P> {
    /// Auto-incrementing sequence number, one counter per sender.
    pub seq: u64,

    /// Milliseconds since the sender started.
    #[serde(default)]
    pub timestamp: u64,

    pub payload: P,
}

impl<P> Envelope<P> {
    pub fn new(seq: u64, timestamp: u64, payload: P) -> Self {
        Self {
            seq,
            timestamp,
            payload,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
