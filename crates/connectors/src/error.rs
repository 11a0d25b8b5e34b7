//! Error types for connectors

use thiserror::Error;

/// Errors that can occur during connector operations
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Failed to initialize connector (e.g., HTTP client creation failed)
    #[error("failed to initialize connector: {0}")]
    Init(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API rate limited
    #[error("rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds the vendor asked us to back off
        retry_after_secs: u64,
    },

    /// Resource not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Required credentials missing or incomplete
    #[error("connector not configured: {0}")]
    NotConfigured(String),

    /// Pagination cursor was not in the expected format
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}

/// Result type for connector operations
pub type Result<T> = std::result::Result<T, ConnectorError>;
