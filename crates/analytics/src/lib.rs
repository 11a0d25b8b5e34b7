//! Tally Analytics Engine
//!
//! Derives commerce KPIs (AOV, ROAS, CAC, margins, delivery rate) from
//! raw warehouse records at read time.
//!
//! # Overview
//!
//! - **TimeRange**: window parsing (`7d`, `mtd`, custom date pairs) and
//!   previous-period comparison
//! - **KPI**: pure aggregation and formula layer, nothing persisted
//! - **Engine**: scans the warehouse and computes metric sets per
//!   workspace, overall or broken down by platform
//!
//! # Usage
//!
//! ```ignore
//! use tally_analytics::{MetricsEngine, TimeRange};
//!
//! let range = TimeRange::parse("30d")?;
//! let engine = MetricsEngine::new(warehouse);
//! let metrics = engine.overview(workspace_id, &range).await?;
//! println!("AOV {} ROAS {}", metrics.aov, metrics.roas);
//! ```

pub mod engine;
pub mod error;
pub mod kpi;
pub mod timerange;

#[cfg(test)]
mod kpi_test;
#[cfg(test)]
mod timerange_test;

// Re-exports for convenience
pub use engine::{MetricsEngine, PlatformMetrics, DEFAULT_COGS_RATE};
pub use error::{AnalyticsError, Result};
pub use kpi::{compute_metrics, Aggregates, MetricSet};
pub use timerange::TimeRange;
