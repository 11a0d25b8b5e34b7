//! Control store models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tally_model::Platform;

/// Connection status of a configured platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Credentials verified against the platform API
    Connected,
    /// Last connection attempt failed
    Error,
    /// Credentials stored but never verified
    Unconfigured,
}

impl ConnectionStatus {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Unconfigured => "unconfigured",
        }
    }

    /// Parse, defaulting to unconfigured
    pub fn parse(s: &str) -> Self {
        match s {
            "connected" => Self::Connected,
            "error" => Self::Error,
            _ => Self::Unconfigured,
        }
    }
}

/// Per-workspace platform configuration
///
/// `last_sync` is the sync checkpoint: written only by the orchestrator
/// after a platform's batches have all landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Tenant
    pub workspace_id: u32,
    /// Platform these credentials belong to
    pub platform: Platform,
    /// Opaque credential JSON, parsed by the matching connector
    pub credentials: Value,
    /// Disabled configs are skipped by the orchestrator
    pub enabled: bool,
    /// Last known connection status
    pub status: ConnectionStatus,
    /// Incremental sync checkpoint
    pub last_sync: Option<DateTime<Utc>>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl PlatformConfig {
    /// Create a fresh config with credentials, not yet verified
    pub fn new(workspace_id: u32, platform: Platform, credentials: Value) -> Self {
        let now = Utc::now();
        Self {
            workspace_id,
            platform,
            credentials,
            enabled: true,
            status: ConnectionStatus::Unconfigured,
            last_sync: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of one orchestrator pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncLogStatus {
    /// Pass in progress
    Started,
    /// Every requested platform succeeded
    Completed,
    /// Some platforms failed, others succeeded
    Partial,
    /// Every requested platform failed
    Failed,
}

impl SyncLogStatus {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    /// Parse, defaulting to failed
    pub fn parse(s: &str) -> Self {
        match s {
            "started" => Self::Started,
            "completed" => Self::Completed,
            "partial" => Self::Partial,
            _ => Self::Failed,
        }
    }
}

/// One logged sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLog {
    /// Log id
    pub id: String,
    /// Tenant
    pub workspace_id: u32,
    /// Platforms the pass attempted
    pub platforms: Vec<Platform>,
    /// Outcome
    pub status: SyncLogStatus,
    /// Platforms that completed
    pub success_count: u32,
    /// Platforms that failed
    pub error_count: u32,
    /// Per-platform report JSON
    pub detail: Value,
    /// Pass start time
    pub started_at: DateTime<Utc>,
    /// Pass completion time (None while started)
    pub completed_at: Option<DateTime<Utc>>,
}
