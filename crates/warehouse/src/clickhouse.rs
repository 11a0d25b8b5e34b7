//! ClickHouse warehouse backend
//!
//! Talks to ClickHouse over its HTTP interface: queries as GET with the
//! SQL in the query string, inserts and DDL as POST bodies. Results use
//! `FORMAT JSONEachRow` so parsing stays schema-agnostic.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::WarehouseError;
use crate::result::{infer_data_type, Column, QueryResult};
use crate::schema;
use crate::sql::validate_sql;
use crate::Warehouse;
use tally_model::Row;

/// ClickHouse backend configuration
#[derive(Debug, Clone)]
pub struct ClickHouseConfig {
    /// ClickHouse HTTP URL (e.g., "http://localhost:8123")
    pub url: String,

    /// Database name
    pub database: String,

    /// Username for authentication (optional)
    pub username: Option<String>,

    /// Password for authentication (optional)
    pub password: Option<String>,

    /// Max execution time in seconds
    pub max_execution_time: u64,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".into(),
            database: "tally".into(),
            username: None,
            password: None,
            max_execution_time: 60,
        }
    }
}

impl ClickHouseConfig {
    /// Create a new config with URL and database
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// Set authentication credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// ClickHouse warehouse over the HTTP interface
#[derive(Clone)]
pub struct ClickHouseWarehouse {
    client: reqwest::Client,
    config: ClickHouseConfig,
}

impl std::fmt::Debug for ClickHouseWarehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseWarehouse")
            .field("url", &self.config.url)
            .field("database", &self.config.database)
            .finish()
    }
}

impl ClickHouseWarehouse {
    /// Create a new ClickHouse warehouse from config
    pub fn new(config: &ClickHouseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    /// Build the query URL with parameters
    fn build_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/?database={}&max_execution_time={}",
            self.config.url, self.config.database, self.config.max_execution_time
        );
        url.push_str("&query=");
        url.push_str(&urlencoding::encode(query));
        url
    }

    /// Execute a statement via GET and return the raw response body
    async fn execute_raw(&self, sql: &str) -> Result<String, WarehouseError> {
        let url = self.build_url(sql);

        let mut request = self.client.get(&url);
        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await.map_err(|e| {
            WarehouseError::Connection(format!("ClickHouse connection failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WarehouseError::Execution(format!(
                "ClickHouse error ({}): {}",
                status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| WarehouseError::Execution(format!("failed to read response: {}", e)))
    }

    /// Execute a statement with a POST body (DDL, inserts)
    async fn post(&self, query: &str, body: String) -> Result<(), WarehouseError> {
        let mut url = format!(
            "{}/?database={}&input_format_skip_unknown_fields=1",
            self.config.url, self.config.database
        );
        url.push_str("&query=");
        url.push_str(&urlencoding::encode(query));

        let mut request = self.client.post(&url).body(body);
        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await.map_err(|e| {
            WarehouseError::Connection(format!("ClickHouse connection failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WarehouseError::Execution(format!(
                "ClickHouse error ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Parse a JSONEachRow response body into rows
    fn parse_rows(body: &str) -> Result<Vec<Row>, WarehouseError> {
        body.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str::<Row>(line).map_err(|e| {
                    WarehouseError::Serialization(format!("failed to parse JSON row: {}", e))
                })
            })
            .collect()
    }
}

/// The `labels` map travels as a JSON string inside a String column;
/// flatten on the way in, inflate on the way out.
fn labels_to_string(row: &Row) -> Row {
    let mut out = row.clone();
    if let Some(labels @ Value::Object(_)) = out.get("labels").cloned() {
        out.insert("labels".into(), Value::String(labels.to_string()));
    }
    out
}

fn labels_from_string(row: &mut Row) {
    if let Some(Value::String(s)) = row.get("labels").cloned() {
        if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(&s) {
            row.insert("labels".into(), parsed);
        }
    }
}

#[async_trait]
impl Warehouse for ClickHouseWarehouse {
    async fn create_tables(&self) -> Result<(), WarehouseError> {
        for table in schema::TABLES {
            let ddl = schema::clickhouse_ddl(table);
            self.post(&ddl, String::new()).await?;
            tracing::debug!(table, "ensured warehouse table");
        }
        Ok(())
    }

    async fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, WarehouseError> {
        if !schema::is_known_table(table) {
            return Err(WarehouseError::UnknownTable(table.to_string()));
        }
        if rows.is_empty() {
            return Ok(0);
        }

        let body: String = rows
            .iter()
            .map(|row| Value::Object(labels_to_string(row)).to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let query = format!("INSERT INTO {} FORMAT JSONEachRow", table);
        self.post(&query, body)
            .await
            .map_err(|e| WarehouseError::Insert {
                table: table.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(table, rows = rows.len(), "batch inserted");
        Ok(rows.len())
    }

    async fn scan(
        &self,
        table: &str,
        workspace_id: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Row>, WarehouseError> {
        if !schema::is_known_table(table) {
            return Err(WarehouseError::UnknownTable(table.to_string()));
        }

        // RFC 3339 UTC strings sort lexicographically, so the window is
        // a plain string comparison. FINAL deduplicates upserted rows.
        let sql = format!(
            "SELECT * FROM {table} FINAL \
             WHERE workspace_id = {workspace_id} \
             AND timestamp >= '{}' AND timestamp <= '{}' \
             FORMAT JSONEachRow",
            start.to_rfc3339(),
            end.to_rfc3339(),
        );

        let body = self.execute_raw(&sql).await?;
        let mut rows = Self::parse_rows(&body)?;
        for row in &mut rows {
            labels_from_string(row);
        }
        Ok(rows)
    }

    async fn query(&self, sql: &str) -> Result<QueryResult, WarehouseError> {
        validate_sql(sql)?;

        let start = Instant::now();
        let query_with_format =
            format!("{} FORMAT JSONEachRow", sql.trim().trim_end_matches(';'));
        let response_text = self.execute_raw(&query_with_format).await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        if response_text.trim().is_empty() {
            return Ok(QueryResult::new(Vec::new(), Vec::new(), execution_time_ms));
        }

        let json_rows: Vec<HashMap<String, Value>> = response_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    WarehouseError::Serialization(format!("failed to parse JSON row: {}", e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if json_rows.is_empty() {
            return Ok(QueryResult::new(Vec::new(), Vec::new(), execution_time_ms));
        }

        // Extract columns from the first row's keys
        let first_row = &json_rows[0];
        let column_names: Vec<String> = first_row.keys().cloned().collect();
        let columns: Vec<Column> = column_names
            .iter()
            .map(|name| {
                let value = first_row.get(name).unwrap_or(&Value::Null);
                Column::new(name.clone(), infer_data_type(value))
            })
            .collect();

        let rows: Vec<Vec<Value>> = json_rows
            .iter()
            .map(|row| {
                column_names
                    .iter()
                    .map(|name| row.get(name).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            cols = columns.len(),
            time_ms = execution_time_ms,
            "ClickHouse query executed"
        );

        Ok(QueryResult::new(columns, rows, execution_time_ms))
    }

    async fn health_check(&self) -> Result<(), WarehouseError> {
        self.execute_raw("SELECT 1").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "clickhouse"
    }
}
