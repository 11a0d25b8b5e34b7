//! Sync log repository
//!
//! Append-only history of sync passes, one row per orchestrator run.

use chrono::Utc;
use turso::Database;

use tally_model::Platform;

use crate::error::{ControlError, Result};
use crate::models::{SyncLog, SyncLogStatus};

use super::platform_configs::parse_datetime;

const COLUMNS: &str = "id, workspace_id, platforms, status, success_count, error_count, detail, started_at, completed_at";

/// Sync log repository
pub struct SyncLogRepo<'a> {
    db: &'a Database,
}

impl<'a> SyncLogRepo<'a> {
    /// Create a new sync log repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record the start of a sync pass, returning the new log entry
    pub async fn start(&self, workspace_id: u32, platforms: &[Platform]) -> Result<SyncLog> {
        let conn = self.db.connect()?;

        let started_at = Utc::now();
        let log = SyncLog {
            id: format!("sync-{}", started_at.timestamp_nanos_opt().unwrap_or(0)),
            workspace_id,
            platforms: platforms.to_vec(),
            status: SyncLogStatus::Started,
            success_count: 0,
            error_count: 0,
            detail: serde_json::json!([]),
            started_at,
            completed_at: None,
        };

        let workspace = log.workspace_id.to_string();
        let platforms_csv = log
            .platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let started = log.started_at.to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO sync_logs (id, workspace_id, platforms, status, success_count, error_count, detail, started_at, completed_at)
            VALUES (?1, ?2, ?3, ?4, '0', '0', '[]', ?5, '')
            "#,
            [
                log.id.as_str(),
                workspace.as_str(),
                platforms_csv.as_str(),
                log.status.as_str(),
                started.as_str(),
            ],
        )
        .await?;

        Ok(log)
    }

    /// Record the completion of a sync pass
    pub async fn complete(
        &self,
        id: &str,
        status: SyncLogStatus,
        success_count: u32,
        error_count: u32,
        detail: &serde_json::Value,
    ) -> Result<()> {
        let conn = self.db.connect()?;

        let detail_json = serde_json::to_string(detail)?;
        let success = success_count.to_string();
        let errors = error_count.to_string();
        let completed_at = Utc::now().to_rfc3339();

        let affected = conn
            .execute(
                r#"
                UPDATE sync_logs
                SET status = ?1, success_count = ?2, error_count = ?3, detail = ?4, completed_at = ?5
                WHERE id = ?6
                "#,
                [
                    status.as_str(),
                    success.as_str(),
                    errors.as_str(),
                    detail_json.as_str(),
                    completed_at.as_str(),
                    id,
                ],
            )
            .await?;

        if affected == 0 {
            return Err(ControlError::not_found("sync_log", id));
        }

        Ok(())
    }

    /// Get a sync log by ID
    pub async fn get(&self, id: &str) -> Result<Option<SyncLog>> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM sync_logs WHERE id = ?1", COLUMNS),
                [id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_log(&row)?))
        } else {
            Ok(None)
        }
    }

    /// List the most recent sync passes for a workspace, newest first
    pub async fn recent(&self, workspace_id: u32, limit: u32) -> Result<Vec<SyncLog>> {
        let conn = self.db.connect()?;
        let workspace = workspace_id.to_string();
        let limit = limit.to_string();

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM sync_logs WHERE workspace_id = ?1 ORDER BY started_at DESC LIMIT ?2",
                    COLUMNS
                ),
                [workspace.as_str(), limit.as_str()],
            )
            .await?;

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(Self::row_to_log(&row)?);
        }

        Ok(logs)
    }

    fn row_to_log(row: &turso::Row) -> Result<SyncLog> {
        let empty = String::new();

        let id = row.get_value(0)?.as_text().unwrap_or(&empty).clone();
        let workspace_raw = row.get_value(1)?.as_text().unwrap_or(&empty).clone();
        let platforms_csv = row.get_value(2)?.as_text().unwrap_or(&empty).clone();
        let status_raw = row.get_value(3)?.as_text().unwrap_or(&empty).clone();
        let success_count = *row.get_value(4)?.as_integer().unwrap_or(&0);
        let error_count = *row.get_value(5)?.as_integer().unwrap_or(&0);
        let detail_json = row
            .get_value(6)?
            .as_text()
            .unwrap_or(&String::from("[]"))
            .clone();
        let started_raw = row.get_value(7)?.as_text().unwrap_or(&empty).clone();
        let completed_raw = row.get_value(8)?.as_text().unwrap_or(&empty).clone();

        let workspace_id = workspace_raw
            .parse::<u32>()
            .map_err(|_| ControlError::invalid("workspace_id", "not an integer"))?;

        let platforms = platforms_csv
            .split(',')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<Platform>().ok())
            .collect();

        let completed_at = if completed_raw.is_empty() {
            None
        } else {
            Some(parse_datetime(&completed_raw)?)
        };

        Ok(SyncLog {
            id,
            workspace_id,
            platforms,
            status: SyncLogStatus::parse(&status_raw),
            success_count: success_count as u32,
            error_count: error_count as u32,
            detail: serde_json::from_str(&detail_json)?,
            started_at: parse_datetime(&started_raw)?,
            completed_at,
        })
    }
}
