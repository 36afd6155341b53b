//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use guildlink_common::AppError;
use guildlink_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or port failure
    Domain(DomainError),

    /// Application error (auth, validation, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Feature switched off in configuration
    Disabled(&'static str),

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Disabled(feature) => write!(f, "{feature} is disabled"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Disabled(feature) => AppError::Unavailable(format!("{feature} is disabled")),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Internal(msg) => AppError::internal(std::io::Error::other(msg)),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use guildlink_core::PlayerId;

    #[test]
    fn test_display() {
        let err = ServiceError::not_found("Link", "abc");
        assert_eq!(err.to_string(), "Link not found: abc");
        assert_eq!(ServiceError::Disabled("Bug reports").to_string(), "Bug reports is disabled");
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = ServiceError::Domain(DomainError::LinkNotFound(PlayerId::random())).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = ServiceError::Disabled("Chat relay").into();
        assert_eq!(app.status_code(), 503);

        let app: AppError = ServiceError::validation("empty").into();
        assert_eq!(app.status_code(), 400);
    }
}
