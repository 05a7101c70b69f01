//! Server configuration.

use std::time::Duration;

use boardwalk_room::RoomConfig;
use serde::{Deserialize, Serialize};

/// Everything the server needs to start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Seconds a connection may stay silent before it is dropped.
    /// Clients keep it alive with heartbeats. `0` disables the timeout.
    pub idle_timeout_secs: u64,

    pub room: RoomConfig,
}

impl ServerConfig {
    /// `None` when the idle timeout is disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            idle_timeout_secs: 60,
            room: RoomConfig::default(),
        }
    }
}
