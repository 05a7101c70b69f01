//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are processed one at a time, so a
//! roll resolves atomically with respect to joins and leaves on the same
//! room.
//!
//! A non-persistent room stops itself the moment its last player leaves.
//! Commands still queued behind that leave, or sent afterwards, fail with
//! [`RoomError::Unavailable`].

use std::sync::Arc;

use boardwalk_protocol::{PlayerId, RoomId, RoomSnapshot, RoomSummary};
use boardwalk_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{Broadcaster, Dice, Room, RoomError};

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the response on that channel.
pub(crate) enum RoomCommand {
    /// Seat the connection's player.
    Join {
        conn: ConnectionId,
        nickname: Option<String>,
        reply: oneshot::Sender<JoinOutcome>,
    },

    /// Remove the connection's player.
    Leave {
        conn: ConnectionId,
        reply: oneshot::Sender<LeaveOutcome>,
    },

    /// Take a turn for the connection's player (fire-and-forget).
    Roll { conn: ConnectionId },

    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },

    Summary {
        reply: oneshot::Sender<RoomSummary>,
    },

    /// Stop the actor without touching its players. Replies once the
    /// room's subscribers are gone.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Result of a join command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub player_id: PlayerId,
    /// `false` if the player was already seated; nothing changed.
    pub seated: bool,
    pub players: usize,
}

/// Result of a leave command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// `false` if the connection had no player in the room.
    pub removed: bool,
    pub remaining: usize,
    /// The room emptied and its actor has stopped.
    pub closed: bool,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone. The [`RoomRegistry`](crate::RoomRegistry) holds one
/// per room; `instance` tells apart two rooms that shared an id at
/// different times.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    instance: u64,
    sender: mpsc::Sender<RoomCommand>,
}

impl std::fmt::Debug for RoomHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomHandle")
            .field("room_id", &self.room_id)
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Seats the connection's player.
    pub async fn join(
        &self,
        conn: ConnectionId,
        nickname: Option<String>,
    ) -> Result<JoinOutcome, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            conn,
            nickname,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Removes the connection's player.
    pub async fn leave(&self, conn: ConnectionId) -> Result<LeaveOutcome, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Leave {
            conn,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Asks the room to take a turn for the connection's player.
    ///
    /// Rolls out of turn are dropped by the actor without a reply.
    pub async fn roll(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Roll { conn }).await
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    pub async fn summary(&self) -> Result<RoomSummary, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Summary { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the room to shut down and waits until it has dropped its
    /// subscribers.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Shutdown { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    /// Survives emptying (the lobby).
    persistent: bool,
    broadcaster: Arc<Broadcaster>,
    dice: Arc<dyn Dice>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown or the
    /// room empties.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    conn,
                    nickname,
                    reply,
                } => {
                    let outcome = self.handle_join(conn, nickname).await;
                    let _ = reply.send(outcome);
                }
                RoomCommand::Leave { conn, reply } => {
                    let outcome = self.handle_leave(conn).await;
                    let _ = reply.send(outcome);
                    if outcome.closed {
                        break;
                    }
                }
                RoomCommand::Roll { conn } => {
                    self.handle_roll(conn).await;
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.room.snapshot());
                }
                RoomCommand::Summary { reply } => {
                    let _ = reply.send(self.room.summary());
                }
                RoomCommand::Shutdown { reply } => {
                    tracing::info!(room_id = %self.room.id(), "room shutting down");
                    self.broadcaster.drop_room(self.room.id()).await;
                    let _ = reply.send(());
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room.id(), "room actor stopped");
    }

    async fn handle_join(&mut self, conn: ConnectionId, nickname: Option<String>) -> JoinOutcome {
        let player_id = PlayerId::from(&conn);
        let seated = self.room.add_player(player_id.clone(), nickname.as_deref());

        if seated {
            tracing::info!(
                room_id = %self.room.id(),
                conn_id = %conn,
                players = self.room.player_count(),
                "player joined"
            );
            self.broadcaster.subscribe(self.room.id(), &conn).await;
            self.broadcaster.publish_room(&self.room.snapshot()).await;
        } else {
            tracing::debug!(
                room_id = %self.room.id(),
                conn_id = %conn,
                "already seated, ignoring join"
            );
        }

        JoinOutcome {
            player_id,
            seated,
            players: self.room.player_count(),
        }
    }

    async fn handle_leave(&mut self, conn: ConnectionId) -> LeaveOutcome {
        let removed = self.room.remove_player(&PlayerId::from(&conn));
        let remaining = self.room.player_count();
        if !removed {
            tracing::debug!(
                room_id = %self.room.id(),
                conn_id = %conn,
                "leave from non-member, ignoring"
            );
            return LeaveOutcome {
                removed,
                remaining,
                closed: false,
            };
        }

        tracing::info!(
            room_id = %self.room.id(),
            conn_id = %conn,
            players = remaining,
            "player left"
        );
        self.broadcaster.unsubscribe(self.room.id(), &conn).await;

        let closed = self.room.is_empty() && !self.persistent;
        if closed {
            self.broadcaster.drop_room(self.room.id()).await;
            tracing::info!(room_id = %self.room.id(), "room emptied, closing");
        } else {
            self.broadcaster.publish_room(&self.room.snapshot()).await;
        }

        LeaveOutcome {
            removed,
            remaining,
            closed,
        }
    }

    async fn handle_roll(&mut self, conn: ConnectionId) {
        let Some(outcome) = self.room.roll(&PlayerId::from(&conn), self.dice.as_ref()) else {
            tracing::debug!(
                room_id = %self.room.id(),
                conn_id = %conn,
                "roll out of turn, ignoring"
            );
            return;
        };

        tracing::debug!(
            room_id = %self.room.id(),
            conn_id = %conn,
            dice = ?outcome.dice,
            position = outcome.position,
            effect = ?outcome.effect,
            "turn resolved"
        );
        self.broadcaster.publish_room(&self.room.snapshot()).await;
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `channel_size` controls backpressure: if the channel fills up, senders
/// wait (bounded channel).
pub(crate) fn spawn_room(
    room: Room,
    persistent: bool,
    instance: u64,
    channel_size: usize,
    broadcaster: Arc<Broadcaster>,
    dice: Arc<dyn Dice>,
) -> RoomHandle {
    let (sender, receiver) = mpsc::channel(channel_size.max(1));
    let room_id = room.id().clone();

    let actor = RoomActor {
        room,
        persistent,
        broadcaster,
        dice,
        receiver,
    };
    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        instance,
        sender,
    }
}
