//! Connector trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tally_model::{Platform, PlatformRecord, RecordKind};

use crate::error::Result;

/// The time window a sync pass covers
///
/// Incremental syncs start at the last checkpoint; backfills start at
/// the configured lookback horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    /// Fetch records created or updated at/after this instant
    pub since: DateTime<Utc>,
    /// Upper bound, normally "now"
    pub until: DateTime<Utc>,
}

impl SyncWindow {
    /// Create a window
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self { since, until }
    }

    /// The last `days` days, ending now
    pub fn lookback(days: i64) -> Self {
        let until = Utc::now();
        Self {
            since: until - chrono::Duration::days(days),
            until,
        }
    }
}

/// One page of fetched records plus the cursor for the next page
#[derive(Debug, Default)]
pub struct Page {
    /// Normalized records in this page
    pub records: Vec<PlatformRecord>,
    /// Opaque cursor for the next page, `None` when exhausted
    pub next: Option<String>,
}

/// Trait for pull-based connectors that fetch data from external platforms
///
/// Connectors are stateless between sync invocations: the orchestrator
/// constructs a fresh connector (and HTTP client) per sync pass, drives
/// `fetch_page` to exhaustion per record kind, and drops it. Cursors are
/// opaque strings owned by each implementation. No connector retries
/// failed requests; errors surface immediately to the caller.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The platform this connector talks to
    fn platform(&self) -> Platform;

    /// Record kinds this connector can fetch
    fn record_kinds(&self) -> &'static [RecordKind] {
        self.platform().record_kinds()
    }

    /// Acquire or verify credentials before fetching
    ///
    /// Default is a no-op; connectors with a login exchange (Shiprocket)
    /// override it.
    async fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    /// Cheap credential check, used by `tally status` and connect flows
    async fn test_connection(&self) -> Result<bool>;

    /// Fetch one page of records
    ///
    /// `cursor` is `None` for the first page; pass the previous page's
    /// `next` to continue. Returns records normalized to
    /// [`PlatformRecord`] with vendor ids preserved as `external_id`.
    async fn fetch_page(
        &self,
        kind: RecordKind,
        window: &SyncWindow,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Page>;
}
