//! Gateway error types

use thiserror::Error;

use crate::protocol::CloseCode;

/// Failure establishing or keeping a gateway session
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("rest client unavailable: {0}")]
    Rest(#[from] guildlink_core::RemoteError),

    #[error("invalid gateway payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("gateway closed the connection: {0}")]
    Closed(CloseCode),

    #[error("gateway closed the connection with code {0}")]
    ClosedUnknown(u16),

    #[error("connection ended during handshake")]
    HandshakeEnded,

    #[error("session invalidated during handshake")]
    InvalidSession,

    #[error("unexpected {0} during handshake")]
    UnexpectedOp(crate::protocol::OpCode),

    #[error("session was not ready within {0} seconds")]
    ReadyTimeout(u64),
}

impl GatewayError {
    /// Whether retrying the connection could help
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Closed(code) => code.should_reconnect(),
            Self::Decode(_) | Self::UnexpectedOp(_) | Self::Rest(_) => false,
            _ => true,
        }
    }
}
