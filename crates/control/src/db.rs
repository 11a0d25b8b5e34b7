//! Database connection and schema management
//!
//! Uses Turso (async SQLite-compatible) for the control store: platform
//! credentials, sync checkpoints, and sync run history.

use tracing::info;
use turso::{Builder, Database};

use crate::error::Result;

/// Control store database manager
pub struct ControlStore {
    db: Database,
}

impl ControlStore {
    /// Create a new control store with file-based storage
    ///
    /// # Arguments
    /// * `data_dir` - Directory for the database file (e.g., "data/")
    ///
    /// Creates `{data_dir}/control.db`.
    pub async fn new(data_dir: impl Into<String>) -> Result<Self> {
        let data_dir = data_dir.into();

        std::fs::create_dir_all(&data_dir)?;

        let path = format!("{}/control.db", data_dir);
        info!(path = %path, "Opening control database");

        let db = Builder::new_local(&path).build().await?;

        let store = Self { db };
        store.init_schema().await?;

        Ok(store)
    }

    /// Create a new control store with in-memory storage (for testing)
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;

        let store = Self { db };
        store.init_schema().await?;

        Ok(store)
    }

    /// Get the underlying database
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Initialize the control database schema
    async fn init_schema(&self) -> Result<()> {
        let conn = self.db.connect()?;

        conn.execute(SCHEMA_PLATFORM_CONFIGS, ()).await?;
        conn.execute(SCHEMA_SYNC_LOGS, ()).await?;
        conn.execute(INDEX_SYNC_LOGS_WORKSPACE, ()).await?;

        info!("Control database schema initialized");
        Ok(())
    }
}

// =============================================================================
// Control Database Schema
// =============================================================================

const SCHEMA_PLATFORM_CONFIGS: &str = r#"
CREATE TABLE IF NOT EXISTS platform_configs (
    workspace_id TEXT NOT NULL,
    platform TEXT NOT NULL,
    credentials TEXT NOT NULL DEFAULT '{}',
    enabled INTEGER NOT NULL DEFAULT 1,
    status TEXT NOT NULL DEFAULT 'unconfigured',
    last_sync TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (workspace_id, platform)
)
"#;

const SCHEMA_SYNC_LOGS: &str = r#"
CREATE TABLE IF NOT EXISTS sync_logs (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    platforms TEXT NOT NULL,
    status TEXT NOT NULL,
    success_count INTEGER NOT NULL DEFAULT 0,
    error_count INTEGER NOT NULL DEFAULT 0,
    detail TEXT NOT NULL DEFAULT '[]',
    started_at TEXT NOT NULL,
    completed_at TEXT
)
"#;

const INDEX_SYNC_LOGS_WORKSPACE: &str =
    "CREATE INDEX IF NOT EXISTS idx_sync_logs_workspace ON sync_logs(workspace_id, started_at)";
