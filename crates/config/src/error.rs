//! Configuration error types

use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid TOML syntax or structure
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Structurally valid but semantically wrong
    #[error("config validation failed: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
