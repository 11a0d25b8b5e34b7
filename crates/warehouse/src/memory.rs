//! In-memory warehouse backend
//!
//! Development and test double with the same upsert semantics as the
//! ClickHouse backend: rows are keyed by `(workspace_id, external_id)`
//! per table, so re-inserting the same external id replaces the row.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::WarehouseError;
use crate::result::QueryResult;
use crate::schema;
use crate::Warehouse;
use tally_model::Row;

type TableStore = HashMap<(u32, String), Row>;

/// In-memory warehouse
#[derive(Debug, Default)]
pub struct MemoryWarehouse {
    tables: RwLock<HashMap<&'static str, TableStore>>,
}

impl MemoryWarehouse {
    /// Create an empty in-memory warehouse with all tables present
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        for table in schema::TABLES {
            tables.insert(*table, TableStore::new());
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Total row count for a table (after upsert dedup)
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.len())
            .unwrap_or(0)
    }
}

fn row_key(row: &Row) -> Result<(u32, String), WarehouseError> {
    let workspace_id = row
        .get("workspace_id")
        .and_then(Value::as_u64)
        .ok_or_else(|| WarehouseError::Serialization("row missing workspace_id".into()))?
        as u32;
    let external_id = row
        .get("external_id")
        .and_then(Value::as_str)
        .ok_or_else(|| WarehouseError::Serialization("row missing external_id".into()))?
        .to_string();
    Ok((workspace_id, external_id))
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    async fn create_tables(&self) -> Result<(), WarehouseError> {
        let mut tables = self.tables.write().await;
        for table in schema::TABLES {
            tables.entry(table).or_default();
        }
        Ok(())
    }

    async fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, WarehouseError> {
        if !schema::is_known_table(table) {
            return Err(WarehouseError::UnknownTable(table.to_string()));
        }

        // Validate the whole batch before touching the store so the
        // insert stays all-rows-or-none.
        let keyed: Vec<((u32, String), Row)> = rows
            .iter()
            .map(|row| Ok((row_key(row)?, row.clone())))
            .collect::<Result<_, WarehouseError>>()?;

        let mut tables = self.tables.write().await;
        let store = tables
            .get_mut(table)
            .ok_or_else(|| WarehouseError::UnknownTable(table.to_string()))?;
        let written = keyed.len();
        for (key, row) in keyed {
            store.insert(key, row);
        }
        Ok(written)
    }

    async fn scan(
        &self,
        table: &str,
        workspace_id: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Row>, WarehouseError> {
        let tables = self.tables.read().await;
        let store = tables
            .get(table)
            .ok_or_else(|| WarehouseError::UnknownTable(table.to_string()))?;

        let start = start.to_rfc3339();
        let end = end.to_rfc3339();

        let mut rows: Vec<Row> = store
            .iter()
            .filter(|((ws, _), _)| *ws == workspace_id)
            .filter_map(|(_, row)| {
                let ts = row.get("timestamp").and_then(Value::as_str)?;
                (ts >= start.as_str() && ts <= end.as_str()).then(|| row.clone())
            })
            .collect();

        // Deterministic order for tests
        rows.sort_by(|a, b| {
            let ka = a.get("external_id").and_then(Value::as_str).unwrap_or("");
            let kb = b.get("external_id").and_then(Value::as_str).unwrap_or("");
            ka.cmp(kb)
        });
        Ok(rows)
    }

    async fn query(&self, _sql: &str) -> Result<QueryResult, WarehouseError> {
        Err(WarehouseError::Unsupported {
            backend: "memory",
            operation: "sql query",
        })
    }

    async fn health_check(&self) -> Result<(), WarehouseError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
