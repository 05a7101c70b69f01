//! Per-connection handler: greeting, message routing, and cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Queue `Welcome` → register for broadcasts → queue the room list
//!   2. Spawn the writer task that numbers and sends outbound frames
//!   3. Loop: receive envelopes → dispatch client messages
//!   4. On close, error, idle timeout, or `Disconnect` → leave every room

use std::sync::Arc;
use std::time::Instant;

use boardwalk_protocol::{ClientMessage, Codec, Envelope, ServerMessage};
use boardwalk_room::ClientSender;
use boardwalk_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::BoardwalkError;
use crate::server::{PROTOCOL_VERSION, ServerState};

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), BoardwalkError>
where
    C: Codec + Clone,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id().clone();
    let start = Instant::now();
    tracing::info!(%conn_id, "connection accepted");

    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_loop(
        Arc::clone(&conn),
        rx,
        state.codec.clone(),
        start,
    ));
    greet(&conn_id, &*state, &tx).await;

    let result = read_loop(&conn, &conn_id, &state, &tx, &start).await;

    // Unregistering drops the broadcaster's sender; dropping ours lets
    // the writer drain what is queued and exit.
    state.service.disconnect(&conn_id).await;
    drop(tx);
    let _ = writer.await;
    let _ = conn.close().await;
    tracing::info!(%conn_id, "connection closed");

    result
}

/// Queues `Welcome`, then registers the connection for broadcasts and
/// queues the room list. Nothing published by other connections can
/// land ahead of `Welcome`.
async fn greet<C: Codec>(conn_id: &ConnectionId, state: &ServerState<C>, tx: &ClientSender) {
    let _ = tx.send(ServerMessage::Welcome {
        connection_id: conn_id.to_string(),
        protocol_version: PROTOCOL_VERSION,
    });
    state.service.connect(conn_id.clone(), tx.clone()).await;
    let _ = tx.send(ServerMessage::RoomList {
        rooms: state.service.list_rooms().await,
    });
}

/// Receives and dispatches client messages until the connection ends.
async fn read_loop<C: Codec>(
    conn: &WebSocketConnection,
    conn_id: &ConnectionId,
    state: &Arc<ServerState<C>>,
    tx: &ClientSender,
    start: &Instant,
) -> Result<(), BoardwalkError> {
    loop {
        let received = match state.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, conn.recv()).await,
            None => Ok(conn.recv().await),
        };
        let data = match received {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                return Ok(());
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Err(e.into());
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection timed out");
                return Ok(());
            }
        };

        let envelope: Envelope<ClientMessage> = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode envelope");
                let _ = tx.send(ServerMessage::Error {
                    code: 400,
                    message: e.to_string(),
                });
                continue;
            }
        };

        if !dispatch(conn_id, state, tx, envelope.payload, start).await {
            return Ok(());
        }
    }
}

/// Handles one client message. Returns `false` if the connection should
/// close.
async fn dispatch<C: Codec>(
    conn_id: &ConnectionId,
    state: &Arc<ServerState<C>>,
    tx: &ClientSender,
    msg: ClientMessage,
    start: &Instant,
) -> bool {
    let service = &state.service;
    match msg {
        ClientMessage::Join { room_id, nickname } => {
            if let Err(e) = service.join(conn_id, &room_id, nickname).await {
                tracing::debug!(%conn_id, %room_id, error = %e, "join failed");
            }
        }
        ClientMessage::Leave { room_id } => {
            service.leave(conn_id, &room_id).await;
        }
        ClientMessage::Roll { room_id } => {
            service.roll(conn_id, &room_id).await;
        }
        ClientMessage::CreateRoom { mode } => {
            let room_id = service.create_room(mode.as_deref()).await;
            let _ = tx.send(ServerMessage::RoomCreated { room_id });
        }
        ClientMessage::ListRooms => {
            let _ = tx.send(ServerMessage::RoomList {
                rooms: service.list_rooms().await,
            });
        }
        ClientMessage::Heartbeat { client_time } => {
            let _ = tx.send(ServerMessage::HeartbeatAck {
                client_time,
                server_time: elapsed_ms(start),
            });
        }
        ClientMessage::Disconnect { reason } => {
            tracing::info!(%conn_id, %reason, "client disconnected");
            return false;
        }
    }
    true
}

/// Drains the connection's outbound channel into the socket, wrapping
/// each message in a numbered envelope.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    codec: C,
    start: Instant,
) {
    let mut seq: u64 = 1;
    while let Some(msg) = rx.recv().await {
        let envelope = Envelope::new(next_seq(&mut seq), elapsed_ms(&start), msg);
        let bytes = match codec.encode(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(conn_id = %conn.id(), error = %e, "failed to encode envelope");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, stopping writer");
            break;
        }
    }
}

/// Increments and returns the next sequence number.
fn next_seq(seq: &mut u64) -> u64 {
    let current = *seq;
    *seq += 1;
    current
}

fn elapsed_ms(start: &Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
