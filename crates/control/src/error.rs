//! Control store error types

use thiserror::Error;

/// Control store errors
#[derive(Debug, Error)]
pub enum ControlError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] turso::Error),

    /// Filesystem error opening the store
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Invalid data
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    /// JSON serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ControlError {
    /// Create a not found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result type for control store operations
pub type Result<T> = std::result::Result<T, ControlError>;
