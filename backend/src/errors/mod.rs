//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! backend application and provides mechanisms for consistent error handling
//! and response formatting.

use axum::http::StatusCode;
use thiserror::Error;

/// Fatal configuration problems detected at startup.
///
/// These are raised while constructing the service components and are never
/// surfaced to API clients; the process refuses to serve traffic instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or both JWT signing secrets are missing or empty.
    #[error("JWT secrets are not defined in environment variables")]
    MissingJwtSecrets,
}

/// Generic service error for all expected, user-facing failure conditions.
///
/// Each variant carries a stable message and maps to a fixed HTTP status so
/// the routing layer can translate it directly into a transport response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    Internal { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to at the transport boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ServiceError::conflict("User already exists").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::unauthorized("Invalid credentials").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::validation("bad input").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::internal("hashing failed").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let db_err = ServiceError::from(anyhow::anyhow!("connection reset"));
        assert_eq!(db_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            ServiceError::conflict("User already exists").to_string(),
            "User already exists"
        );
        assert_eq!(
            ConfigError::MissingJwtSecrets.to_string(),
            "JWT secrets are not defined in environment variables"
        );
    }
}
