//! Errors raised by infrastructure behind the core's ports

use thiserror::Error;

/// Failure of the persistence blob behind the link store
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob backend failed: {0}")]
    Backend(String),
}

/// Failure talking to the remote chat platform
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote client is not connected")]
    NotReady,

    #[error("no guild configured")]
    NoGuild,

    #[error("remote returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected payload: {0}")]
    Decode(String),
}

impl RemoteError {
    /// 404 from the remote platform (unknown member, message or channel)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Result type for remote platform operations
pub type RemoteResult<T> = Result<T, RemoteError>;
