//! Platform config repository
//!
//! Per-workspace platform credentials, connection status, and the
//! incremental sync checkpoint.

use chrono::{DateTime, Utc};
use turso::Database;

use tally_model::Platform;

use crate::error::{ControlError, Result};
use crate::models::{ConnectionStatus, PlatformConfig};

const COLUMNS: &str =
    "workspace_id, platform, credentials, enabled, status, last_sync, created_at, updated_at";

/// Platform config repository
pub struct PlatformConfigRepo<'a> {
    db: &'a Database,
}

impl<'a> PlatformConfigRepo<'a> {
    /// Create a new platform config repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert or replace the config for (workspace, platform)
    pub async fn upsert(&self, config: &PlatformConfig) -> Result<()> {
        let conn = self.db.connect()?;

        let workspace_id = config.workspace_id.to_string();
        let credentials = serde_json::to_string(&config.credentials)?;
        let last_sync = config.last_sync.map(|t| t.to_rfc3339());
        let created_at = config.created_at.to_rfc3339();
        let updated_at = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO platform_configs (workspace_id, platform, credentials, enabled, status, last_sync, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (workspace_id, platform) DO UPDATE SET
                credentials = excluded.credentials,
                enabled = excluded.enabled,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
            [
                workspace_id.as_str(),
                config.platform.as_str(),
                credentials.as_str(),
                if config.enabled { "1" } else { "0" },
                config.status.as_str(),
                last_sync.as_deref().unwrap_or(""),
                created_at.as_str(),
                updated_at.as_str(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Get the config for (workspace, platform)
    pub async fn get(
        &self,
        workspace_id: u32,
        platform: Platform,
    ) -> Result<Option<PlatformConfig>> {
        let conn = self.db.connect()?;
        let workspace_id = workspace_id.to_string();

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM platform_configs WHERE workspace_id = ?1 AND platform = ?2",
                    COLUMNS
                ),
                [workspace_id.as_str(), platform.as_str()],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_config(&row)?))
        } else {
            Ok(None)
        }
    }

    /// List all configs for a workspace
    pub async fn list(&self, workspace_id: u32) -> Result<Vec<PlatformConfig>> {
        let conn = self.db.connect()?;
        let workspace_id = workspace_id.to_string();

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM platform_configs WHERE workspace_id = ?1 ORDER BY platform",
                    COLUMNS
                ),
                [workspace_id.as_str()],
            )
            .await?;

        let mut configs = Vec::new();
        while let Some(row) = rows.next().await? {
            configs.push(Self::row_to_config(&row)?);
        }

        Ok(configs)
    }

    /// Update connection status after a verification attempt
    pub async fn set_status(
        &self,
        workspace_id: u32,
        platform: Platform,
        status: ConnectionStatus,
    ) -> Result<()> {
        let conn = self.db.connect()?;
        let workspace_id = workspace_id.to_string();
        let updated_at = Utc::now().to_rfc3339();

        let affected = conn
            .execute(
                "UPDATE platform_configs SET status = ?1, updated_at = ?2 WHERE workspace_id = ?3 AND platform = ?4",
                [
                    status.as_str(),
                    updated_at.as_str(),
                    workspace_id.as_str(),
                    platform.as_str(),
                ],
            )
            .await?;

        if affected == 0 {
            return Err(ControlError::not_found("platform_config", platform.as_str()));
        }
        Ok(())
    }

    /// Advance the sync checkpoint
    pub async fn set_last_sync(
        &self,
        workspace_id: u32,
        platform: Platform,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.db.connect()?;
        let workspace_id = workspace_id.to_string();
        let last_sync = at.to_rfc3339();
        let updated_at = Utc::now().to_rfc3339();

        let affected = conn
            .execute(
                "UPDATE platform_configs SET last_sync = ?1, updated_at = ?2 WHERE workspace_id = ?3 AND platform = ?4",
                [
                    last_sync.as_str(),
                    updated_at.as_str(),
                    workspace_id.as_str(),
                    platform.as_str(),
                ],
            )
            .await?;

        if affected == 0 {
            return Err(ControlError::not_found("platform_config", platform.as_str()));
        }
        Ok(())
    }

    /// Clear the sync checkpoint, forcing the next sync to backfill
    pub async fn clear_last_sync(&self, workspace_id: u32, platform: Platform) -> Result<()> {
        let conn = self.db.connect()?;
        let workspace_id = workspace_id.to_string();
        let updated_at = Utc::now().to_rfc3339();

        conn.execute(
            "UPDATE platform_configs SET last_sync = '', updated_at = ?1 WHERE workspace_id = ?2 AND platform = ?3",
            [
                updated_at.as_str(),
                workspace_id.as_str(),
                platform.as_str(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Delete a platform config
    pub async fn delete(&self, workspace_id: u32, platform: Platform) -> Result<()> {
        let conn = self.db.connect()?;
        let workspace_id = workspace_id.to_string();

        let affected = conn
            .execute(
                "DELETE FROM platform_configs WHERE workspace_id = ?1 AND platform = ?2",
                [workspace_id.as_str(), platform.as_str()],
            )
            .await?;

        if affected == 0 {
            return Err(ControlError::not_found("platform_config", platform.as_str()));
        }
        Ok(())
    }

    fn row_to_config(row: &turso::Row) -> Result<PlatformConfig> {
        let empty = String::new();

        let workspace_raw = row.get_value(0)?.as_text().unwrap_or(&empty).clone();
        let platform_raw = row.get_value(1)?.as_text().unwrap_or(&empty).clone();
        let credentials_json = row
            .get_value(2)?
            .as_text()
            .unwrap_or(&String::from("{}"))
            .clone();
        let enabled_int = *row.get_value(3)?.as_integer().unwrap_or(&0);
        let status_raw = row.get_value(4)?.as_text().unwrap_or(&empty).clone();
        let last_sync_raw = row.get_value(5)?.as_text().unwrap_or(&empty).clone();
        let created_at_raw = row.get_value(6)?.as_text().unwrap_or(&empty).clone();
        let updated_at_raw = row.get_value(7)?.as_text().unwrap_or(&empty).clone();

        let workspace_id = workspace_raw
            .parse::<u32>()
            .map_err(|_| ControlError::invalid("workspace_id", "not an integer"))?;
        let platform = platform_raw
            .parse::<Platform>()
            .map_err(|_| ControlError::invalid("platform", platform_raw.clone()))?;
        let credentials = serde_json::from_str(&credentials_json)?;

        let last_sync = if last_sync_raw.is_empty() {
            None
        } else {
            Some(parse_datetime(&last_sync_raw)?)
        };

        Ok(PlatformConfig {
            workspace_id,
            platform,
            credentials,
            enabled: enabled_int != 0,
            status: ConnectionStatus::parse(&status_raw),
            last_sync,
            created_at: parse_datetime(&created_at_raw)?,
            updated_at: parse_datetime(&updated_at_raw)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ControlError::invalid("timestamp", s.to_string()))
}
