//! Room lifecycle management for Boardwalk.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! board, players, and turn pointer. Every mutation of a room is a
//! command on that task's mailbox, so a roll resolves atomically with
//! respect to joins and leaves on the same room while different rooms
//! run in parallel.
//!
//! # Key types
//!
//! - [`Board`] — the 40-tile track, generated per room
//! - [`Room`] — one room's state and the turn engine that mutates it
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomRegistry`] — creates, finds, lists, and deletes rooms
//! - [`Broadcaster`] — per-room subscriber sets and global fan-out
//! - [`Dice`] — where rolls come from
//! - [`RoomConfig`] / [`GameRules`] — room settings

mod board;
mod broadcast;
mod config;
mod dice;
mod engine;
mod error;
mod registry;
mod room;

pub use board::{BOARD_SIZE, Board};
pub use broadcast::{Broadcaster, ClientSender};
pub use config::{GameRules, RoomConfig};
pub use dice::{Dice, LoadedDice, RandomDice};
pub use engine::{Room, RollOutcome, TileEffect};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{JoinOutcome, LeaveOutcome, RoomHandle};
