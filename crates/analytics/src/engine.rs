//! Metrics engine
//!
//! Scans raw records out of the warehouse and derives KPI sets. Nothing
//! here is cached or persisted; every call recomputes from storage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tally_model::{Platform, PlatformRecord};
use tally_warehouse::{schema, Warehouse};

use crate::error::{AnalyticsError, Result};
use crate::kpi::{self, Aggregates, MetricSet};
use crate::timerange::TimeRange;

/// Default cost-of-goods fraction of revenue
pub const DEFAULT_COGS_RATE: f64 = 0.40;

/// Metrics for one platform within a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformMetrics {
    /// Source platform
    pub platform: Platform,
    /// Records the platform contributed to the window
    pub records: u64,
    /// KPIs derived from that platform's records alone
    pub metrics: MetricSet,
}

/// Metrics engine over a warehouse backend
pub struct MetricsEngine {
    warehouse: Arc<dyn Warehouse>,
    cogs_rate: f64,
}

impl MetricsEngine {
    /// Create an engine with the default COGS rate
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            warehouse,
            cogs_rate: DEFAULT_COGS_RATE,
        }
    }

    /// Override the COGS rate (fraction of revenue, 0..=1)
    pub fn with_cogs_rate(mut self, cogs_rate: f64) -> Self {
        self.cogs_rate = cogs_rate;
        self
    }

    /// Full KPI set across every platform for one workspace
    pub async fn overview(&self, workspace_id: u32, range: &TimeRange) -> Result<MetricSet> {
        let records = self.load(schema::TABLES, workspace_id, range).await?;
        debug!(
            workspace_id,
            records = records.len(),
            "computing overview metrics"
        );
        Ok(kpi::compute_metrics(&records, range, self.cogs_rate))
    }

    /// Per-platform KPI breakdown for one workspace
    ///
    /// Platforms with no records in the window still appear, with zeroed
    /// metrics.
    pub async fn by_platform(
        &self,
        workspace_id: u32,
        range: &TimeRange,
    ) -> Result<Vec<PlatformMetrics>> {
        let mut out = Vec::with_capacity(Platform::ALL.len());

        for platform in Platform::ALL {
            let tables = schema::tables_for(platform);
            let records = self.load(&tables, workspace_id, range).await?;
            out.push(PlatformMetrics {
                platform,
                records: records.len() as u64,
                metrics: kpi::compute_metrics(&records, range, self.cogs_rate),
            });
        }

        Ok(out)
    }

    /// Aggregate sums without deriving ratios, for callers that combine
    /// windows themselves
    pub async fn aggregates(&self, workspace_id: u32, range: &TimeRange) -> Result<Aggregates> {
        let records = self.load(schema::TABLES, workspace_id, range).await?;
        Ok(Aggregates::accumulate(&records, range))
    }

    async fn load(
        &self,
        tables: &[&'static str],
        workspace_id: u32,
        range: &TimeRange,
    ) -> Result<Vec<PlatformRecord>> {
        let mut records = Vec::new();

        for &table in tables {
            let rows = self
                .warehouse
                .scan(table, workspace_id, range.start, range.end)
                .await?;

            for row in &rows {
                let record = PlatformRecord::from_row(row)
                    .map_err(|source| AnalyticsError::BadRow { table, source })?;
                records.push(record);
            }
        }

        Ok(records)
    }
}
