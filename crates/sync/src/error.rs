//! Sync error types

use thiserror::Error;

/// Errors surfaced by the orchestration layer
///
/// Per-platform fetch errors are caught and folded into `SyncReport`s;
/// only control-store and serialization failures escape a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Control store failure
    #[error("control store: {0}")]
    Control(#[from] tally_control::ControlError),

    /// Warehouse write failure
    #[error("warehouse: {0}")]
    Warehouse(#[from] tally_warehouse::WarehouseError),

    /// Connector fetch failure
    #[error("connector: {0}")]
    Connector(#[from] tally_connectors::ConnectorError),

    /// Report serialization failure
    #[error("serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
