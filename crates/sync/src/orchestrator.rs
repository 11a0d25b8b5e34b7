//! Sync orchestrator
//!
//! Drives one sync pass: builds a fresh connector per configured
//! platform, pages each record kind to exhaustion, writes every page as
//! its own warehouse batch, and advances the checkpoint only when the
//! whole platform succeeded. Platforms run concurrently; pages within a
//! platform are strictly sequential with a fixed delay between them.
//!
//! There is no retry anywhere in this path. A failed platform is
//! reported and left for the next scheduled pass; its already-written
//! pages stay in the warehouse (the upsert path makes the re-fetch
//! harmless).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use tally_config::SyncConfig;
use tally_connectors::{demo, factory, Connector, ConnectorError, SyncWindow};
use tally_control::{ConnectionStatus, ControlStore};
use tally_model::Platform;
use tally_warehouse::Warehouse;

use crate::error::Result;
use crate::report::{SyncReport, SyncStatus, SyncSummary};

/// Which platforms a sync pass covers
#[derive(Debug, Clone)]
pub enum PlatformSelection {
    /// Every platform
    All,
    /// Only the listed platforms
    Only(Vec<Platform>),
}

impl PlatformSelection {
    fn platforms(&self) -> Vec<Platform> {
        match self {
            Self::All => Platform::ALL.to_vec(),
            Self::Only(platforms) => platforms.clone(),
        }
    }
}

/// Default warehouse insert batch size (rows)
const DEFAULT_BATCH_SIZE: usize = 500;

/// Sync orchestrator
pub struct SyncOrchestrator {
    config: SyncConfig,
    warehouse: Arc<dyn Warehouse>,
    control: Arc<ControlStore>,
    batch_size: usize,
}

impl SyncOrchestrator {
    /// Create an orchestrator
    pub fn new(
        config: SyncConfig,
        warehouse: Arc<dyn Warehouse>,
        control: Arc<ControlStore>,
    ) -> Self {
        Self {
            config,
            warehouse,
            control,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the rows-per-insert cap (`[global] batch_size`)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run one sync pass for a workspace
    ///
    /// `force_refresh` ignores checkpoints and re-fetches the full
    /// lookback window. Every selected platform is attempted; failures
    /// are isolated per platform and folded into the summary.
    pub async fn sync(
        &self,
        workspace_id: u32,
        selection: PlatformSelection,
        force_refresh: bool,
    ) -> Result<SyncSummary> {
        let platforms = selection.platforms();
        info!(
            workspace_id,
            platforms = platforms.len(),
            force_refresh,
            "starting sync pass"
        );

        let log = self
            .control
            .sync_logs()
            .start(workspace_id, &platforms)
            .await?;

        let futures = platforms
            .iter()
            .map(|&platform| self.sync_platform(workspace_id, platform, force_refresh));
        let reports = futures::future::join_all(futures).await;

        let summary = SyncSummary::from_reports(reports);
        let detail = serde_json::to_value(&summary.reports)?;
        self.control
            .sync_logs()
            .complete(
                &log.id,
                summary.log_status(),
                summary.success_count,
                summary.error_count,
                &detail,
            )
            .await?;

        info!(
            workspace_id,
            records = summary.records_written(),
            success = summary.success_count,
            errors = summary.error_count,
            "sync pass finished"
        );
        Ok(summary)
    }

    /// Sync one platform, catching every failure into the report
    async fn sync_platform(
        &self,
        workspace_id: u32,
        platform: Platform,
        force_refresh: bool,
    ) -> SyncReport {
        let started = Instant::now();

        match self
            .try_sync_platform(workspace_id, platform, force_refresh)
            .await
        {
            Ok(mut report) => {
                report.duration_ms = started.elapsed().as_millis() as u64;
                report
            }
            Err(e) => {
                warn!(
                    workspace_id,
                    platform = platform.as_str(),
                    error = %e,
                    "platform sync failed"
                );
                self.mark_status(workspace_id, platform, ConnectionStatus::Error)
                    .await;
                SyncReport {
                    platform,
                    status: SyncStatus::Failed,
                    records_written: 0,
                    pages: 0,
                    error: Some(e.to_string()),
                    duration_ms: started.elapsed().as_millis() as u64,
                }
            }
        }
    }

    async fn try_sync_platform(
        &self,
        workspace_id: u32,
        platform: Platform,
        force_refresh: bool,
    ) -> Result<SyncReport> {
        let stored = self
            .control
            .platform_configs()
            .get(workspace_id, platform)
            .await?;

        let Some(stored) = stored else {
            return self.demo_or_skip(workspace_id, platform).await;
        };
        if !stored.enabled {
            debug!(platform = platform.as_str(), "platform disabled, skipping");
            return Ok(SyncReport::skipped(platform));
        }

        // Fresh stateless client per pass; nothing is shared between cycles
        let connector = match factory::build(platform, &stored.credentials, workspace_id) {
            Ok(connector) => connector,
            Err(ConnectorError::NotConfigured(reason)) => {
                debug!(platform = platform.as_str(), %reason, "credentials incomplete");
                return self.demo_or_skip(workspace_id, platform).await;
            }
            Err(e) => return Err(e.into()),
        };

        connector.authenticate().await?;

        let window = match stored.last_sync {
            Some(checkpoint) if !force_refresh => SyncWindow::new(checkpoint, Utc::now()),
            _ => SyncWindow::lookback(self.config.lookback_days),
        };

        let (records_written, pages) = self.run_connector(connector.as_ref(), &window).await?;

        // Checkpoint advances only after every page of every kind landed
        let configs = self.control.platform_configs();
        configs
            .set_last_sync(workspace_id, platform, window.until)
            .await?;
        configs
            .set_status(workspace_id, platform, ConnectionStatus::Connected)
            .await?;

        info!(
            workspace_id,
            platform = platform.as_str(),
            records = records_written,
            pages,
            "platform synced"
        );

        Ok(SyncReport {
            platform,
            status: SyncStatus::Completed,
            records_written,
            pages,
            error: None,
            duration_ms: 0,
        })
    }

    /// Drive a connector's record kinds to cursor exhaustion
    ///
    /// Each page is written before the next is fetched, in inserts of at
    /// most `batch_size` rows. A failure mid-platform keeps the pages
    /// already written.
    pub(crate) async fn run_connector(
        &self,
        connector: &dyn Connector,
        window: &SyncWindow,
    ) -> Result<(u64, u32)> {
        let mut records_written = 0u64;
        let mut pages = 0u32;
        let page_size = self.config.page_size as u32;

        for &kind in connector.record_kinds() {
            let table = connector.platform().table(kind);
            let mut cursor: Option<String> = None;

            loop {
                let page = connector
                    .fetch_page(kind, window, cursor.as_deref(), page_size)
                    .await?;

                if !page.records.is_empty() {
                    let rows: Vec<_> = page.records.iter().map(|r| r.to_row()).collect();
                    for chunk in rows.chunks(self.batch_size) {
                        records_written += self.warehouse.insert_batch(table, chunk).await? as u64;
                    }
                    pages += 1;
                }

                match page.next {
                    Some(next) => {
                        cursor = Some(next);
                        tokio::time::sleep(std::time::Duration::from_millis(
                            self.config.page_delay_ms,
                        ))
                        .await;
                    }
                    None => break,
                }
            }
        }

        Ok((records_written, pages))
    }

    /// Write demo data for an unconfigured platform, or skip
    async fn demo_or_skip(&self, workspace_id: u32, platform: Platform) -> Result<SyncReport> {
        if !self.config.demo_fallback {
            return Ok(SyncReport::skipped(platform));
        }

        let records = demo::demo_records(platform, workspace_id, Utc::now());

        // Group rows by destination table; one batch per table
        let mut by_table: BTreeMap<&'static str, Vec<tally_model::Row>> = BTreeMap::new();
        for record in &records {
            by_table.entry(record.table()).or_default().push(record.to_row());
        }

        let mut records_written = 0u64;
        let mut pages = 0u32;
        for (table, rows) in &by_table {
            for chunk in rows.chunks(self.batch_size) {
                records_written += self.warehouse.insert_batch(table, chunk).await? as u64;
            }
            pages += 1;
        }

        info!(
            workspace_id,
            platform = platform.as_str(),
            records = records_written,
            "wrote demo data for unconfigured platform"
        );

        Ok(SyncReport {
            platform,
            status: SyncStatus::Demo,
            records_written,
            pages,
            error: None,
            duration_ms: 0,
        })
    }

    /// Best-effort status update; a failed write only logs
    async fn mark_status(&self, workspace_id: u32, platform: Platform, status: ConnectionStatus) {
        if let Err(e) = self
            .control
            .platform_configs()
            .set_status(workspace_id, platform, status)
            .await
        {
            debug!(
                platform = platform.as_str(),
                error = %e,
                "could not update connection status"
            );
        }
    }
}
