//! `BoardwalkServer` builder and server loop.
//!
//! This is the entry point for running a Boardwalk server. It ties
//! together all the layers: transport → protocol → service → rooms.

use std::sync::Arc;
use std::time::Duration;

use boardwalk_protocol::{Codec, JsonCodec};
use boardwalk_room::{Dice, RandomDice};
use boardwalk_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{BoardwalkError, GameService, ServerConfig};

/// The current protocol version, announced in every `Welcome`.
pub const PROTOCOL_VERSION: u32 = 1;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) service: Arc<GameService>,
    pub(crate) codec: C,
    /// `None` waits on a silent connection forever.
    pub(crate) idle_timeout: Option<Duration>,
}

/// Builder for configuring and starting a Boardwalk server.
///
/// # Example
///
/// ```rust,no_run
/// use boardwalk::prelude::*;
///
/// # async fn run() -> Result<(), BoardwalkError> {
/// let server = BoardwalkServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct BoardwalkServerBuilder {
    config: ServerConfig,
    bind_addr: Option<String>,
    dice: Arc<dyn Dice>,
}

impl BoardwalkServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            bind_addr: None,
            dice: Arc::new(RandomDice),
        }
    }

    /// Sets the address to bind the server to. Overrides the address in
    /// [`config`](Self::config).
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = Some(addr.to_string());
        self
    }

    /// Replaces the whole server configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where rolls come from. Defaults to [`RandomDice`].
    pub fn dice(mut self, dice: impl Dice) -> Self {
        self.dice = Arc::new(dice);
        self
    }

    /// Binds the listener and spawns the lobby.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<BoardwalkServer<JsonCodec>, BoardwalkError> {
        let idle_timeout = self.config.idle_timeout();
        let addr = self.bind_addr.unwrap_or(self.config.bind_addr);
        let transport = WebSocketTransport::bind(&addr).await?;

        let state = Arc::new(ServerState {
            service: Arc::new(GameService::new(self.config.room, self.dice)),
            codec: JsonCodec,
            idle_timeout,
        });

        Ok(BoardwalkServer { transport, state })
    }
}

impl Default for BoardwalkServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Boardwalk server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BoardwalkServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl BoardwalkServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> BoardwalkServerBuilder {
        BoardwalkServerBuilder::new()
    }
}

impl<C: Codec + Clone> BoardwalkServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The service behind every connection, for embedding and tests.
    pub fn service(&self) -> Arc<GameService> {
        Arc::clone(&self.state.service)
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), BoardwalkError> {
        tracing::info!(addr = ?self.local_addr().ok(), "Boardwalk server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
