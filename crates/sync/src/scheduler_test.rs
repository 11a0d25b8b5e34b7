//! Tests for the sync scheduler

use std::sync::Arc;
use std::time::Duration;

use tally_config::SyncConfig;
use tally_control::ControlStore;
use tally_warehouse::MemoryWarehouse;

use crate::orchestrator::SyncOrchestrator;
use crate::scheduler::SyncScheduler;

#[tokio::test]
async fn test_first_tick_runs_a_pass_and_clears_the_flag() {
    let warehouse = Arc::new(MemoryWarehouse::new());
    let control = Arc::new(ControlStore::new_memory().await.unwrap());
    let orchestrator = Arc::new(SyncOrchestrator::new(
        SyncConfig {
            page_delay_ms: 0,
            ..SyncConfig::default()
        },
        warehouse.clone(),
        control,
    ));

    // Interval far beyond the test: only the immediate first tick fires
    let scheduler = Arc::new(SyncScheduler::new(orchestrator, 1, 3600));
    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.run().await }
    });

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        if warehouse.row_count("shopify_orders").await == 100 && !scheduler.is_running() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "first sync pass never finished"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    handle.abort();
}
