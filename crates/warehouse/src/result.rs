//! Raw SQL result types
//!
//! The shape returned by [`crate::Warehouse::query`]. Rows stay as
//! JSON values; column types are inferred from the first row since the
//! ClickHouse JSONEachRow format carries no type metadata.

use serde::{Deserialize, Serialize};

/// Result of a raw SQL query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column definitions, in select order
    pub columns: Vec<Column>,

    /// Row data as JSON values
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Total row count
    pub row_count: usize,

    /// Query execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Create a new query result
    pub fn new(
        columns: Vec<Column>,
        rows: Vec<Vec<serde_json::Value>>,
        execution_time_ms: u64,
    ) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time_ms,
        }
    }

    /// Check if result is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Data type
    pub data_type: DataType,
}

impl Column {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Data types supported in query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Signed 64-bit integer
    Int64,
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// JSON object
    Json,
    /// Unknown/other type
    Unknown,
}

/// Infer a column type from a JSON value
pub(crate) fn infer_data_type(value: &serde_json::Value) -> DataType {
    match value {
        serde_json::Value::Bool(_) => DataType::Boolean,
        serde_json::Value::Number(n) if n.is_f64() => DataType::Float64,
        serde_json::Value::Number(_) => DataType::Int64,
        serde_json::Value::String(_) => DataType::String,
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => DataType::Json,
        serde_json::Value::Null => DataType::Unknown,
    }
}
