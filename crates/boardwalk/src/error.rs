//! Unified error type for Boardwalk.

use boardwalk_protocol::ProtocolError;
use boardwalk_room::RoomError;
use boardwalk_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BoardwalkError {
    /// A transport-level error (bind, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room was missing or had already closed.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardwalk_protocol::{ClientMessage, Codec, Envelope, JsonCodec, RoomId};
    use boardwalk_transport::WebSocketTransport;

    #[tokio::test]
    async fn test_from_transport_error() {
        let taken = WebSocketTransport::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let Err(err) = WebSocketTransport::bind(&addr).await else {
            panic!("second bind on {addr} should fail");
        };
        let err: BoardwalkError = err.into();

        assert!(matches!(
            err,
            BoardwalkError::Transport(TransportError::AcceptFailed(_))
        ));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = JsonCodec
            .decode::<Envelope<ClientMessage>>(b"not json")
            .unwrap_err();
        let err: BoardwalkError = err.into();
        assert!(matches!(err, BoardwalkError::Protocol(ProtocolError::Decode(_))));
        assert!(err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomId::new("r1"));
        let err: BoardwalkError = err.into();
        assert!(matches!(err, BoardwalkError::Room(_)));
        assert!(err.to_string().contains("r1"));
    }
}
