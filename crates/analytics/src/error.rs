//! Analytics error types

use thiserror::Error;

/// Analytics errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Invalid time range
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Warehouse read failed
    #[error("warehouse error: {0}")]
    Warehouse(#[from] tally_warehouse::WarehouseError),

    /// Stored row could not be decoded
    #[error("bad row in {table}: {source}")]
    BadRow {
        /// Table the row came from
        table: &'static str,
        /// Decode failure
        #[source]
        source: tally_model::RowError,
    },
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
