//! Warehouse error types

use thiserror::Error;

/// Errors from warehouse operations
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Backend unreachable
    #[error("warehouse connection failed: {0}")]
    Connection(String),

    /// Query or DDL execution failed
    #[error("warehouse execution failed: {0}")]
    Execution(String),

    /// Batch insert failed; the batch was not written
    #[error("insert into {table} failed: {message}")]
    Insert {
        /// Target table
        table: String,
        /// Backend error detail
        message: String,
    },

    /// Table is not part of the fixed schema
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// SQL rejected by the read-only guardrail
    #[error("invalid sql: {0}")]
    InvalidSql(String),

    /// Response could not be parsed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Operation not available on this backend
    #[error("unsupported on {backend} backend: {operation}")]
    Unsupported {
        /// Backend name
        backend: &'static str,
        /// What was attempted
        operation: &'static str,
    },
}
