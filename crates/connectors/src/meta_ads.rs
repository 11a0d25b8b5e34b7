//! Meta Ads connector
//!
//! Pulls daily campaign insights from the Graph API with `time_increment=1`,
//! so each row is one campaign on one day. External ids are
//! `{campaign_id}:{date}` to keep re-syncs idempotent per day.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use tally_model::{fields, Platform, PlatformRecord, RecordKind};

use crate::config::MetaAdsConfig;
use crate::error::{ConnectorError, Result};
use crate::traits::{Connector, Page, SyncWindow};

const GRAPH_URL: &str = "https://graph.facebook.com";

/// Meta Ads connector
pub struct MetaAds {
    config: MetaAdsConfig,
    client: reqwest::Client,
    workspace_id: u32,
}

impl MetaAds {
    /// Create a connector for one sync invocation
    pub fn new(config: MetaAdsConfig, workspace_id: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tally/0.1")
            .build()
            .map_err(|e| ConnectorError::Init(format!("Meta Ads HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            workspace_id,
        })
    }

    fn insights_url(&self, window: &SyncWindow, cursor: Option<&str>, page_size: u32) -> String {
        let time_range = format!(
            r#"{{"since":"{}","until":"{}"}}"#,
            window.since.format("%Y-%m-%d"),
            window.until.format("%Y-%m-%d")
        );

        let mut url = format!(
            "{}/{}/act_{}/insights?level=campaign&time_increment=1&fields=campaign_id,campaign_name,spend,impressions,clicks,conversions,conversion_values&time_range={}&limit={}&access_token={}",
            GRAPH_URL,
            self.config.api_version,
            self.config.ad_account_id,
            urlencoding::encode(&time_range),
            page_size,
            urlencoding::encode(&self.config.access_token),
        );
        if let Some(after) = cursor {
            url.push_str(&format!("&after={}", urlencoding::encode(after)));
        }
        url
    }

    fn handle_error_status(&self, response: reqwest::Response, context: &str) -> ConnectorError {
        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::BAD_REQUEST => {
                ConnectorError::Auth("access token rejected by Graph API".into())
            }
            reqwest::StatusCode::NOT_FOUND => ConnectorError::NotFound(context.to_string()),
            reqwest::StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited {
                retry_after_secs: 300,
            },
            _ => match response.error_for_status() {
                Err(e) => ConnectorError::Http(e),
                Ok(_) => ConnectorError::NotFound(context.to_string()),
            },
        }
    }

    fn insight_record(&self, insight: Insight) -> PlatformRecord {
        let external_id = format!("{}:{}", insight.campaign_id, insight.date_start);
        let timestamp = day_timestamp(&insight.date_start);

        let mut record = PlatformRecord::new(
            Platform::MetaAds,
            RecordKind::CampaignDay,
            external_id,
            self.workspace_id,
            timestamp,
        )
        .with_field(fields::SPEND, parse_decimal(&insight.spend))
        .with_field(fields::IMPRESSIONS, parse_decimal(&insight.impressions))
        .with_field(fields::CLICKS, parse_decimal(&insight.clicks))
        .with_field(fields::CONVERSIONS, parse_decimal(&insight.conversions))
        .with_field(
            fields::CONVERSION_VALUE,
            parse_decimal(&insight.conversion_values),
        );

        if !insight.campaign_name.is_empty() {
            record = record.with_label(fields::CAMPAIGN_NAME, insight.campaign_name);
        }

        record
    }
}

#[async_trait]
impl Connector for MetaAds {
    fn platform(&self) -> Platform {
        Platform::MetaAds
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/{}/act_{}?fields=id&access_token={}",
            GRAPH_URL,
            self.config.api_version,
            self.config.ad_account_id,
            urlencoding::encode(&self.config.access_token),
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::BAD_REQUEST
        {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "ad account"));
        }
        Ok(true)
    }

    async fn fetch_page(
        &self,
        kind: RecordKind,
        window: &SyncWindow,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Page> {
        if kind != RecordKind::CampaignDay {
            return Err(ConnectorError::NotFound(format!(
                "meta_ads does not provide {}",
                kind.as_str()
            )));
        }

        let url = self.insights_url(window, cursor, page_size);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "insights"));
        }

        let data: InsightsResponse = response.json().await?;
        debug!(
            connector = "meta_ads",
            rows = data.data.len(),
            "fetched insights page"
        );

        // Graph only includes paging.next when another page exists
        let next = data
            .paging
            .filter(|p| p.next.is_some())
            .and_then(|p| p.cursors)
            .and_then(|c| c.after);

        let records = data
            .data
            .into_iter()
            .map(|i| self.insight_record(i))
            .collect();

        Ok(Page { records, next })
    }
}

/// Insight dates are plain days; store them as midnight UTC
fn day_timestamp(date: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now)
}

/// Graph API sends numbers as strings
fn parse_decimal(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

// --- API Response Types ---

#[derive(Debug, Deserialize)]
struct InsightsResponse {
    #[serde(default)]
    data: Vec<Insight>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Insight {
    campaign_id: String,
    #[serde(default)]
    campaign_name: String,
    #[serde(default)]
    spend: String,
    #[serde(default)]
    impressions: String,
    #[serde(default)]
    clicks: String,
    #[serde(default)]
    conversions: String,
    #[serde(default)]
    conversion_values: String,
    date_start: String,
}

#[derive(Debug, Deserialize)]
struct Paging {
    cursors: Option<Cursors>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Cursors {
    after: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> MetaAds {
        MetaAds::new(
            MetaAdsConfig {
                ad_account_id: "123456".into(),
                access_token: "EAAtoken".into(),
                api_version: "v19.0".into(),
            },
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_insight_record_external_id() {
        let meta = connector();
        let insight: Insight = serde_json::from_value(serde_json::json!({
            "campaign_id": "8841",
            "campaign_name": "Spring Sale",
            "spend": "1200.50",
            "impressions": "45000",
            "clicks": "900",
            "conversions": "45",
            "conversion_values": "4802.00",
            "date_start": "2024-03-15",
        }))
        .unwrap();

        let record = meta.insight_record(insight);
        assert_eq!(record.external_id, "8841:2024-03-15");
        assert_eq!(record.field(fields::SPEND), 1200.50);
        assert_eq!(record.field(fields::IMPRESSIONS), 45000.0);
        assert_eq!(record.field(fields::CONVERSION_VALUE), 4802.0);
        assert_eq!(
            record.labels.get(fields::CAMPAIGN_NAME).unwrap(),
            "Spring Sale"
        );
        assert_eq!(record.timestamp.format("%Y-%m-%d").to_string(), "2024-03-15");
    }

    #[test]
    fn test_insights_url_includes_window_and_cursor() {
        let meta = connector();
        let window = SyncWindow::lookback(30);
        let url = meta.insights_url(&window, Some("abc=="), 100);

        assert!(url.contains("act_123456/insights"));
        assert!(url.contains("time_increment=1"));
        assert!(url.contains("limit=100"));
        assert!(url.contains("after=abc%3D%3D"));
    }

    #[test]
    fn test_paging_absent_means_exhausted() {
        let response: InsightsResponse = serde_json::from_value(serde_json::json!({
            "data": [],
        }))
        .unwrap();
        assert!(response.paging.is_none());
    }
}
