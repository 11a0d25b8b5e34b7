//! Tests for the sync orchestrator

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use tally_config::SyncConfig;
use tally_connectors::{Connector, ConnectorError, Page, SyncWindow};
use tally_control::{ConnectionStatus, ControlStore, PlatformConfig, SyncLogStatus};
use tally_model::{fields, Platform, PlatformRecord, RecordKind};
use tally_warehouse::MemoryWarehouse;

use crate::orchestrator::{PlatformSelection, SyncOrchestrator};
use crate::report::SyncStatus;

fn test_config() -> SyncConfig {
    SyncConfig {
        page_delay_ms: 0,
        ..SyncConfig::default()
    }
}

async fn orchestrator(
    config: SyncConfig,
) -> (SyncOrchestrator, Arc<MemoryWarehouse>, Arc<ControlStore>) {
    let warehouse = Arc::new(MemoryWarehouse::new());
    let control = Arc::new(ControlStore::new_memory().await.unwrap());
    let orchestrator = SyncOrchestrator::new(config, warehouse.clone(), control.clone());
    (orchestrator, warehouse, control)
}

#[tokio::test]
async fn test_unconfigured_platforms_get_demo_data() {
    let (orchestrator, warehouse, _control) = orchestrator(test_config()).await;

    let summary = orchestrator
        .sync(1, PlatformSelection::All, false)
        .await
        .unwrap();

    assert_eq!(summary.success_count, 4);
    assert_eq!(summary.error_count, 0);
    assert!(summary.reports.iter().all(|r| r.status == SyncStatus::Demo));

    assert_eq!(warehouse.row_count("shopify_orders").await, 100);
    assert_eq!(warehouse.row_count("shopify_customers").await, 20);
    assert_eq!(warehouse.row_count("meta_campaigns").await, 10);
    assert_eq!(warehouse.row_count("google_campaigns").await, 8);
    assert_eq!(warehouse.row_count("shiprocket_shipments").await, 80);
}

#[tokio::test]
async fn test_demo_sync_is_idempotent() {
    let (orchestrator, warehouse, _control) = orchestrator(test_config()).await;

    orchestrator
        .sync(1, PlatformSelection::All, false)
        .await
        .unwrap();
    orchestrator
        .sync(1, PlatformSelection::All, false)
        .await
        .unwrap();

    // Same external ids, so the second pass upserts instead of duplicating
    assert_eq!(warehouse.row_count("shopify_orders").await, 100);
    assert_eq!(warehouse.row_count("shiprocket_shipments").await, 80);
}

#[tokio::test]
async fn test_demo_fallback_disabled_skips() {
    let config = SyncConfig {
        demo_fallback: false,
        ..test_config()
    };
    let (orchestrator, warehouse, _control) = orchestrator(config).await;

    let summary = orchestrator
        .sync(1, PlatformSelection::All, false)
        .await
        .unwrap();

    assert!(summary
        .reports
        .iter()
        .all(|r| r.status == SyncStatus::Skipped));
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.error_count, 0);
    assert_eq!(warehouse.row_count("shopify_orders").await, 0);
}

#[tokio::test]
async fn test_selection_limits_platforms() {
    let (orchestrator, warehouse, _control) = orchestrator(test_config()).await;

    let summary = orchestrator
        .sync(
            1,
            PlatformSelection::Only(vec![Platform::Shiprocket]),
            false,
        )
        .await
        .unwrap();

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].platform, Platform::Shiprocket);
    assert_eq!(warehouse.row_count("shiprocket_shipments").await, 80);
    assert_eq!(warehouse.row_count("shopify_orders").await, 0);
}

#[tokio::test]
async fn test_disabled_platform_is_skipped() {
    let (orchestrator, warehouse, control) = orchestrator(test_config()).await;

    let mut config = PlatformConfig::new(
        1,
        Platform::Shopify,
        serde_json::json!({"store": "x.myshopify.com", "access_token": "shpat"}),
    );
    config.enabled = false;
    control.platform_configs().upsert(&config).await.unwrap();

    let summary = orchestrator
        .sync(1, PlatformSelection::Only(vec![Platform::Shopify]), false)
        .await
        .unwrap();

    assert_eq!(summary.reports[0].status, SyncStatus::Skipped);
    assert_eq!(warehouse.row_count("shopify_orders").await, 0);
}

#[tokio::test]
async fn test_incomplete_credentials_fall_back_to_demo() {
    let (orchestrator, _warehouse, control) = orchestrator(test_config()).await;

    // Row exists but the credential JSON is missing required fields
    control
        .platform_configs()
        .upsert(&PlatformConfig::new(
            1,
            Platform::MetaAds,
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    let summary = orchestrator
        .sync(1, PlatformSelection::Only(vec![Platform::MetaAds]), false)
        .await
        .unwrap();

    assert_eq!(summary.reports[0].status, SyncStatus::Demo);
}

#[tokio::test]
async fn test_failed_platform_does_not_block_others() {
    let (orchestrator, warehouse, control) = orchestrator(test_config()).await;

    // Credentials parse, but the store points at a closed port
    control
        .platform_configs()
        .upsert(&PlatformConfig::new(
            1,
            Platform::Shopify,
            serde_json::json!({"store": "127.0.0.1:1", "access_token": "shpat"}),
        ))
        .await
        .unwrap();

    let summary = orchestrator
        .sync(1, PlatformSelection::All, false)
        .await
        .unwrap();

    let shopify = summary
        .reports
        .iter()
        .find(|r| r.platform == Platform::Shopify)
        .unwrap();
    assert_eq!(shopify.status, SyncStatus::Failed);
    assert!(shopify.error.is_some());

    // The other three platforms still ran their demo fallback
    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.error_count, 1);
    assert_eq!(warehouse.row_count("shopify_orders").await, 0);
    assert_eq!(warehouse.row_count("shiprocket_shipments").await, 80);

    let stored = control
        .platform_configs()
        .get(1, Platform::Shopify)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ConnectionStatus::Error);
    assert!(stored.last_sync.is_none());

    let logs = control.sync_logs().recent(1, 10).await.unwrap();
    assert_eq!(logs[0].status, SyncLogStatus::Partial);
}

#[tokio::test]
async fn test_sync_pass_recorded_in_log() {
    let (orchestrator, _warehouse, control) = orchestrator(test_config()).await;

    orchestrator
        .sync(1, PlatformSelection::All, false)
        .await
        .unwrap();

    let logs = control.sync_logs().recent(1, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, SyncLogStatus::Completed);
    assert_eq!(logs[0].success_count, 4);
    assert_eq!(logs[0].platforms.len(), 4);
    assert!(logs[0].completed_at.is_some());
    assert!(logs[0].detail.is_array());
}

// --- Paging against a stub connector ---

struct StubConnector {
    pages: Vec<Vec<PlatformRecord>>,
    fail_on_page: Option<usize>,
}

impl StubConnector {
    fn order(id: &str, total: f64) -> PlatformRecord {
        PlatformRecord::new(Platform::Shopify, RecordKind::Order, id, 1, Utc::now())
            .with_field(fields::TOTAL_PRICE, total)
    }
}

#[async_trait]
impl Connector for StubConnector {
    fn platform(&self) -> Platform {
        Platform::Shopify
    }

    fn record_kinds(&self) -> &'static [RecordKind] {
        &[RecordKind::Order]
    }

    async fn test_connection(&self) -> Result<bool, ConnectorError> {
        Ok(true)
    }

    async fn fetch_page(
        &self,
        _kind: RecordKind,
        _window: &SyncWindow,
        cursor: Option<&str>,
        _page_size: u32,
    ) -> Result<Page, ConnectorError> {
        let index = match cursor {
            None => 0,
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| ConnectorError::InvalidCursor(c.to_string()))?,
        };

        if Some(index) == self.fail_on_page {
            return Err(ConnectorError::RateLimited {
                retry_after_secs: 60,
            });
        }

        let records = self.pages.get(index).cloned().unwrap_or_default();
        let next = if index + 1 < self.pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(Page { records, next })
    }
}

#[tokio::test]
async fn test_run_connector_pages_to_exhaustion() {
    let (orchestrator, warehouse, _control) = orchestrator(test_config()).await;

    let stub = StubConnector {
        pages: vec![
            vec![StubConnector::order("1", 10.0), StubConnector::order("2", 20.0)],
            vec![StubConnector::order("3", 30.0)],
        ],
        fail_on_page: None,
    };

    let window = SyncWindow::lookback(90);
    let (records, pages) = orchestrator.run_connector(&stub, &window).await.unwrap();

    assert_eq!(records, 3);
    assert_eq!(pages, 2);
    assert_eq!(warehouse.row_count("shopify_orders").await, 3);
}

#[tokio::test]
async fn test_small_batch_size_chunks_inserts() {
    let (orchestrator, warehouse, _control) = orchestrator(test_config()).await;
    let orchestrator = orchestrator.with_batch_size(2);

    // One page of five rows: two full chunks plus a remainder
    let stub = StubConnector {
        pages: vec![(1..=5)
            .map(|i| StubConnector::order(&i.to_string(), i as f64))
            .collect()],
        fail_on_page: None,
    };

    let window = SyncWindow::lookback(90);
    let (records, pages) = orchestrator.run_connector(&stub, &window).await.unwrap();

    assert_eq!(records, 5);
    assert_eq!(pages, 1);
    assert_eq!(warehouse.row_count("shopify_orders").await, 5);
}

#[tokio::test]
async fn test_mid_stream_failure_keeps_prior_pages() {
    let (orchestrator, warehouse, _control) = orchestrator(test_config()).await;

    let stub = StubConnector {
        pages: vec![
            vec![StubConnector::order("1", 10.0)],
            vec![StubConnector::order("2", 20.0)],
            vec![StubConnector::order("3", 30.0)],
        ],
        fail_on_page: Some(1),
    };

    let window = SyncWindow::lookback(90);
    let err = orchestrator.run_connector(&stub, &window).await.unwrap_err();
    assert!(err.to_string().contains("rate limited"));

    // Page 0 landed before the failure and stays
    assert_eq!(warehouse.row_count("shopify_orders").await, 1);
}
