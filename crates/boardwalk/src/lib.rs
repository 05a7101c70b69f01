//! # Boardwalk
//!
//! Authoritative game rooms for a real-time multiplayer board game.
//!
//! Players connect over WebSockets, join rooms by id, and take turns
//! rolling two dice around a 40-tile board. The server owns every room's
//! state; clients only send intents (`join`, `leave`, `roll`) and render
//! the snapshots pushed back to them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boardwalk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BoardwalkError> {
//!     boardwalk::logging::init_tracing("my-server", "info");
//!
//!     let server = BoardwalkServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod config;
mod error;
mod handler;
pub mod logging;
mod server;
mod service;

pub use config::ServerConfig;
pub use error::BoardwalkError;
pub use server::{BoardwalkServer, BoardwalkServerBuilder, PROTOCOL_VERSION};
pub use service::GameService;

/// Re-exports everything needed to run or talk to a Boardwalk server.
pub mod prelude {
    pub use crate::{
        BoardwalkError, BoardwalkServer, BoardwalkServerBuilder, GameService, PROTOCOL_VERSION,
        ServerConfig,
    };

    pub use boardwalk_protocol::{
        ClientMessage, Codec, Envelope, JsonCodec, Player, PlayerId, RoomId, RoomSnapshot,
        RoomStatus, RoomSummary, ServerMessage, Tile, TileKind,
    };
    pub use boardwalk_room::{Dice, GameRules, LoadedDice, RandomDice, RoomConfig};
    pub use boardwalk_transport::ConnectionId;
}
