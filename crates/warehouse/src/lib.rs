//! Tally Warehouse - columnar storage for normalized platform records
//!
//! Provides a unified interface over two backends:
//! - **ClickHouse**: production warehouse over the HTTP interface
//! - **Memory**: in-process store for development and tests
//!
//! # Semantics
//!
//! - The table set is fixed: one table per platform entity
//!   (`shopify_orders`, `meta_campaigns`, ...). See [`schema`].
//! - `insert_batch` is one atomic batch per call and **upserts by
//!   external id**: re-syncing identical upstream data never creates
//!   duplicate rows. ClickHouse implements this with
//!   `ReplacingMergeTree(updated_at)`; the read path deduplicates with
//!   `FINAL`.
//! - `query` accepts read-only SQL (`SELECT`/`WITH`) and is a
//!   ClickHouse-only affordance; the memory backend returns
//!   [`WarehouseError::Unsupported`]. The metrics engine uses `scan`,
//!   which both backends implement.
//!
//! # Usage
//!
//! ```ignore
//! use tally_warehouse::{ClickHouseWarehouse, ClickHouseConfig, Warehouse};
//!
//! let wh = ClickHouseWarehouse::new(&ClickHouseConfig::new(
//!     "http://localhost:8123",
//!     "tally",
//! ));
//! wh.create_tables().await?;
//! wh.insert_batch("shopify_orders", &rows).await?;
//! ```

mod clickhouse;
mod error;
mod memory;
mod result;
mod sql;

pub mod schema;


use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use clickhouse::{ClickHouseConfig, ClickHouseWarehouse};
pub use error::WarehouseError;
pub use memory::MemoryWarehouse;
pub use result::{Column, DataType, QueryResult};
pub use sql::validate_sql;

use tally_model::Row;

/// Warehouse backend trait
///
/// Implemented by the ClickHouse and memory backends.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Create the fixed table set if it does not exist
    async fn create_tables(&self) -> Result<(), WarehouseError>;

    /// Insert one atomic batch of rows into a table
    ///
    /// Upserts by `(workspace_id, external_id)`. Returns the number of
    /// rows written. All rows land or none do; there is no cross-batch
    /// or cross-table transaction.
    async fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, WarehouseError>;

    /// Read the deduplicated rows of one table for one tenant within a
    /// time window (inclusive bounds on the record timestamp)
    async fn scan(
        &self,
        table: &str,
        workspace_id: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Row>, WarehouseError>;

    /// Execute a read-only SQL query
    async fn query(&self, sql: &str) -> Result<QueryResult, WarehouseError>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<(), WarehouseError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
