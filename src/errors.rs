//! Structured error handling for the decision-support service.
//!
//! One error enum covers the Matcher's contract violations, repository
//! failures, and the HTTP surface; `IntoResponse` maps each variant onto
//! the status code the API returns.

use crate::role::Role;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the decision-support service.
#[derive(Error, Debug)]
pub enum DssError {
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Store operation failed: {operation} - {source}")]
    Store {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Insufficient role: required {required:?}, got {actual:?}")]
    InsufficientRole { required: Role, actual: Role },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Mutex lock failed: {resource}")]
    MutexPoisoned { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Shorthand for Result with DssError.
pub type DssResult<T> = Result<T, DssError>;

impl DssError {
    /// Create an invalid input error (Matcher preconditions, vector validation)
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create an insufficient role error
    pub fn insufficient_role(required: Role, actual: Role) -> Self {
        Self::InsufficientRole { required, actual }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for DssError {
    fn into_response(self) -> Response {
        let status = match self {
            DssError::InvalidInput { .. }
            | DssError::Config { .. }
            | DssError::Serialization { .. } => StatusCode::BAD_REQUEST,
            DssError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            DssError::NotFound { .. } => StatusCode::NOT_FOUND,
            DssError::Conflict { .. } => StatusCode::CONFLICT,
            DssError::Store { .. }
            | DssError::Io { .. }
            | DssError::MutexPoisoned { .. }
            | DssError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Helper trait for safe mutex operations that return proper errors
/// instead of panicking on a poisoned lock.
pub trait SafeLock<T: ?Sized> {
    fn safe_lock(&self) -> DssResult<std::sync::MutexGuard<'_, T>>;
}

impl<T: ?Sized> SafeLock<T> for std::sync::Mutex<T> {
    fn safe_lock(&self) -> DssResult<std::sync::MutexGuard<'_, T>> {
        self.lock().map_err(|_| DssError::MutexPoisoned {
            resource: "project_store".to_string(),
        })
    }
}

/// Convert from sled errors
impl From<sled::Error> for DssError {
    fn from(err: sled::Error) -> Self {
        DssError::store("sled_operation", err)
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for DssError {
    fn from(err: serde_json::Error) -> Self {
        DssError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for DssError {
    fn from(err: std::io::Error) -> Self {
        DssError::io("io_operation", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let input_err = DssError::invalid_input("constraints", "expected 9 elements");
        assert!(input_err.to_string().contains("Invalid input"));

        let role_err = DssError::InsufficientRole {
            required: Role::Admin,
            actual: Role::Guest,
        };
        assert!(role_err.to_string().contains("Insufficient role"));
    }

    #[test]
    fn test_error_chaining() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let dss_err = DssError::io("reading projects file", io_err);

        assert!(dss_err.source().is_some());
        assert!(dss_err.to_string().contains("I/O operation failed"));
    }
}
