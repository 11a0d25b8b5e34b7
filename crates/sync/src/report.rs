//! Sync pass reporting

use serde::{Deserialize, Serialize};

use tally_control::SyncLogStatus;
use tally_model::Platform;

/// Outcome of one platform within a sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Real data fetched and written
    Completed,
    /// Fetch or write failed; prior pages of this pass are kept
    Failed,
    /// Not configured and demo fallback disabled
    Skipped,
    /// Demo data substituted for an unconfigured platform
    Demo,
}

/// Per-platform report for one sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Platform this report covers
    pub platform: Platform,
    /// Outcome
    pub status: SyncStatus,
    /// Records written to the warehouse
    pub records_written: u64,
    /// Pages fetched (or demo batches written)
    pub pages: u32,
    /// Error message when `status` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration of this platform's sync
    pub duration_ms: u64,
}

impl SyncReport {
    /// A skipped platform
    pub fn skipped(platform: Platform) -> Self {
        Self {
            platform,
            status: SyncStatus::Skipped,
            records_written: 0,
            pages: 0,
            error: None,
            duration_ms: 0,
        }
    }
}

/// Summary of one full sync pass across platforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSummary {
    /// One report per attempted platform
    pub reports: Vec<SyncReport>,
    /// Platforms that wrote data (real or demo)
    pub success_count: u32,
    /// Platforms that failed
    pub error_count: u32,
}

impl SyncSummary {
    /// Build a summary from per-platform reports
    pub fn from_reports(reports: Vec<SyncReport>) -> Self {
        let success_count = reports
            .iter()
            .filter(|r| matches!(r.status, SyncStatus::Completed | SyncStatus::Demo))
            .count() as u32;
        let error_count = reports
            .iter()
            .filter(|r| r.status == SyncStatus::Failed)
            .count() as u32;

        Self {
            reports,
            success_count,
            error_count,
        }
    }

    /// Total records written across platforms
    pub fn records_written(&self) -> u64 {
        self.reports.iter().map(|r| r.records_written).sum()
    }

    /// Status to record in the sync log
    pub fn log_status(&self) -> SyncLogStatus {
        if self.error_count == 0 {
            SyncLogStatus::Completed
        } else if self.success_count == 0 {
            SyncLogStatus::Failed
        } else {
            SyncLogStatus::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(platform: Platform, status: SyncStatus) -> SyncReport {
        SyncReport {
            platform,
            status,
            records_written: 10,
            pages: 1,
            error: None,
            duration_ms: 5,
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = SyncSummary::from_reports(vec![
            report(Platform::Shopify, SyncStatus::Completed),
            report(Platform::MetaAds, SyncStatus::Demo),
            report(Platform::GoogleAds, SyncStatus::Failed),
            report(Platform::Shiprocket, SyncStatus::Skipped),
        ]);

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.log_status(), SyncLogStatus::Partial);
    }

    #[test]
    fn test_log_status_all_failed() {
        let summary = SyncSummary::from_reports(vec![
            report(Platform::Shopify, SyncStatus::Failed),
            report(Platform::MetaAds, SyncStatus::Failed),
        ]);
        assert_eq!(summary.log_status(), SyncLogStatus::Failed);
    }

    #[test]
    fn test_log_status_skips_are_not_failures() {
        let summary = SyncSummary::from_reports(vec![
            report(Platform::Shopify, SyncStatus::Skipped),
            report(Platform::MetaAds, SyncStatus::Completed),
        ]);
        assert_eq!(summary.log_status(), SyncLogStatus::Completed);
    }
}
