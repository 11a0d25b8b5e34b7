//! Sync pipeline configuration

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Sync orchestrator and scheduler settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between scheduled sync passes
    /// Default: 3600 (one hour)
    pub interval_secs: u64,

    /// Records requested per page from platform APIs
    /// Default: 250 (the Shopify maximum; other platforms clamp lower)
    pub page_size: usize,

    /// Fixed delay between page fetches within one platform, to respect
    /// external rate limits. This is a blocking sleep, not a backoff.
    /// Default: 500
    pub page_delay_ms: u64,

    /// Full-history window for `force_refresh` or first sync, in days
    /// Default: 90
    pub lookback_days: i64,

    /// Substitute deterministic demo data when a platform is not
    /// configured. Demo rows are always flagged `is_demo`.
    /// Default: true
    pub demo_fallback: bool,

    /// Cost of goods sold as a fraction of revenue, used for margin
    /// KPIs when no per-product cost data exists.
    /// Default: 0.40
    pub cogs_rate: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            page_size: 250,
            page_delay_ms: 500,
            lookback_days: 90,
            demo_fallback: true,
            cogs_rate: 0.40,
        }
    }
}

impl SyncConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs < 60 {
            return Err(ConfigError::Validation(
                "sync.interval_secs must be at least 60".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Validation(
                "sync.page_size must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.cogs_rate) {
            return Err(ConfigError::Validation(
                "sync.cogs_rate must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.interval_secs, 3600);
        assert_eq!(config.page_size, 250);
        assert_eq!(config.page_delay_ms, 500);
        assert!(config.demo_fallback);
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_tight_interval() {
        let config = SyncConfig {
            interval_secs: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_cogs_rate() {
        let config = SyncConfig {
            cogs_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
