//! Domain errors - error types for the domain layer
//!
//! Policy rejections during verification are not errors; they are reported
//! as outcomes by the link service. These variants cover the cases that
//! callers outside the core need to surface.

use thiserror::Error;

use super::port_error::{BlobError, RemoteError};
use crate::value_objects::{PlayerId, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No link found for player {0}")]
    LinkNotFound(PlayerId),

    #[error("No pending code: {0}")]
    PendingNotFound(String),

    #[error("Member not found in guild: {0}")]
    MemberNotFound(Snowflake),

    #[error("Bug report not found: {0}")]
    BugReportNotFound(u64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed code: {0}")]
    MalformedCode(String),

    #[error("Code has expired")]
    CodeExpired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Remote account {0} is already linked to another player")]
    RemoteAlreadyLinked(Snowflake),

    #[error("Player {0} is already linked")]
    AlreadyLinked(PlayerId),

    // =========================================================================
    // Availability Errors
    // =========================================================================
    #[error("Remote platform is not connected")]
    RemoteUnavailable,

    #[error("Guild is not configured or unreachable")]
    GuildUnavailable,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Remote error: {0}")]
    RemoteError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::LinkNotFound(_) => "UNKNOWN_LINK",
            Self::PendingNotFound(_) => "UNKNOWN_CODE",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::BugReportNotFound(_) => "UNKNOWN_BUG_REPORT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MalformedCode(_) => "MALFORMED_CODE",
            Self::CodeExpired => "CODE_EXPIRED",

            // Conflict
            Self::RemoteAlreadyLinked(_) => "REMOTE_ALREADY_LINKED",
            Self::AlreadyLinked(_) => "ALREADY_LINKED",

            // Availability
            Self::RemoteUnavailable => "REMOTE_UNAVAILABLE",
            Self::GuildUnavailable => "GUILD_UNAVAILABLE",

            // Infrastructure
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::RemoteError(_) => "REMOTE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LinkNotFound(_)
                | Self::PendingNotFound(_)
                | Self::MemberNotFound(_)
                | Self::BugReportNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::MalformedCode(_) | Self::CodeExpired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RemoteAlreadyLinked(_) | Self::AlreadyLinked(_))
    }

    /// Check if the remote side is unavailable (connection or guild)
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable | Self::GuildUnavailable)
    }
}

impl From<BlobError> for DomainError {
    fn from(err: BlobError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<RemoteError> for DomainError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotReady => Self::RemoteUnavailable,
            other => Self::RemoteError(other.to_string()),
        }
    }
}
