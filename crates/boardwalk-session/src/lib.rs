//! Connection bindings for Boardwalk.
//!
//! A binding records which rooms a live connection has taken a seat in,
//! and which player it controls there. The server consults it when a
//! connection leaves a room or goes away, so cleanup reaches every room
//! the connection touched.
//!
//! ```text
//! Room layer (above)      ← owns rooms and players
//!     ↕
//! Binding layer (this)    ← connection → {(room, player)}
//!     ↕
//! Transport (below)       ← provides ConnectionId
//! ```
//!
//! Bindings only hold ids, never the rooms or players themselves.

mod binding;
mod error;
mod table;

pub use binding::Binding;
pub use error::BindingError;
pub use table::BindingTable;
