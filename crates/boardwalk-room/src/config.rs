//! Room configuration.

use boardwalk_protocol::RoomId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameRules
// ---------------------------------------------------------------------------

/// The handful of numbers the turn engine plays by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Cash every player starts with.
    pub starting_cash: i64,

    /// Flat charge for landing on a tax tile.
    pub tax_amount: i64,

    /// Where the Go-To-Jail corner sends a player.
    pub jail_position: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_cash: 1500,
            tax_amount: 100,
            jail_position: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room the registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// The room that exists from startup and is never deleted.
    pub lobby_id: String,

    /// Mode label given to rooms created without one.
    pub default_mode: String,

    /// Capacity of each room actor's command channel. Senders wait when
    /// it is full.
    pub channel_size: usize,

    pub rules: GameRules,
}

impl RoomConfig {
    pub fn lobby_room_id(&self) -> RoomId {
        RoomId::new(self.lobby_id.clone())
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            lobby_id: "lobby".to_string(),
            default_mode: "casual".to_string(),
            channel_size: 64,
            rules: GameRules::default(),
        }
    }
}
