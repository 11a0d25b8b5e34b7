//! Google Ads connector
//!
//! Pulls daily campaign stats. Costs come back in micros
//! (1,000,000 micros = 1 unit of account currency) and are converted to
//! decimal at ingest so the warehouse only ever sees decimal spend.
//! Pagination is the API's opaque `page_token`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use tally_model::{fields, micros_to_decimal, Platform, PlatformRecord, RecordKind};

use crate::config::GoogleAdsConfig;
use crate::error::{ConnectorError, Result};
use crate::traits::{Connector, Page, SyncWindow};

const ADS_URL: &str = "https://googleads.googleapis.com";

/// Google Ads connector
pub struct GoogleAds {
    config: GoogleAdsConfig,
    client: reqwest::Client,
    workspace_id: u32,
}

impl GoogleAds {
    /// Create a connector for one sync invocation
    pub fn new(config: GoogleAdsConfig, workspace_id: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tally/0.1")
            .build()
            .map_err(|e| ConnectorError::Init(format!("Google Ads HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            workspace_id,
        })
    }

    fn stats_url(&self, window: &SyncWindow, cursor: Option<&str>, page_size: u32) -> String {
        let mut url = format!(
            "{}/{}/customers/{}/campaignDailyStats?startDate={}&endDate={}&pageSize={}",
            ADS_URL,
            self.config.api_version,
            self.config.customer_id,
            window.since.format("%Y-%m-%d"),
            window.until.format("%Y-%m-%d"),
            page_size,
        );
        if let Some(token) = cursor {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }
        url
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .header("developer-token", &self.config.developer_token)
    }

    fn handle_error_status(&self, response: reqwest::Response, context: &str) -> ConnectorError {
        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ConnectorError::Auth("token or developer token rejected".into())
            }
            reqwest::StatusCode::NOT_FOUND => ConnectorError::NotFound(context.to_string()),
            reqwest::StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited {
                retry_after_secs: 60,
            },
            _ => match response.error_for_status() {
                Err(e) => ConnectorError::Http(e),
                Ok(_) => ConnectorError::NotFound(context.to_string()),
            },
        }
    }

    fn stat_record(&self, stat: CampaignStat) -> PlatformRecord {
        let external_id = format!("{}:{}", stat.campaign_id, stat.date);
        let timestamp = day_timestamp(&stat.date);

        let mut record = PlatformRecord::new(
            Platform::GoogleAds,
            RecordKind::CampaignDay,
            external_id,
            self.workspace_id,
            timestamp,
        )
        .with_field(fields::SPEND, micros_to_decimal(stat.cost_micros))
        .with_field(fields::IMPRESSIONS, stat.impressions as f64)
        .with_field(fields::CLICKS, stat.clicks as f64)
        .with_field(fields::CONVERSIONS, stat.conversions)
        .with_field(fields::CONVERSION_VALUE, stat.conversions_value);

        if !stat.campaign_name.is_empty() {
            record = record.with_label(fields::CAMPAIGN_NAME, stat.campaign_name);
        }
        if !stat.status.is_empty() {
            record = record.with_label(fields::STATUS, stat.status);
        }

        record
    }
}

#[async_trait]
impl Connector for GoogleAds {
    fn platform(&self) -> Platform {
        Platform::GoogleAds
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/{}/customers/{}",
            ADS_URL, self.config.api_version, self.config.customer_id
        );
        let response = self.build_request(&url).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "customer"));
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
                "google_ads does not provide {}",
                kind.as_str()
            )));
        }

        let url = self.stats_url(window, cursor, page_size);
        let response = self.build_request(&url).send().await?;
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "campaignDailyStats"));
        }

        let data: StatsResponse = response.json().await?;
        debug!(
            connector = "google_ads",
            rows = data.results.len(),
            "fetched campaign stats page"
        );

        let next = data.next_page_token.filter(|t| !t.is_empty());
        let records = data
            .results
            .into_iter()
            .map(|s| self.stat_record(s))
            .collect();

        Ok(Page { records, next })
    }
}

fn day_timestamp(date: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now)
}

// --- API Response Types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    results: Vec<CampaignStat>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignStat {
    campaign_id: String,
    #[serde(default)]
    campaign_name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    cost_micros: i64,
    #[serde(default)]
    impressions: u64,
    #[serde(default)]
    clicks: u64,
    #[serde(default)]
    conversions: f64,
    #[serde(default)]
    conversions_value: f64,
    date: String,
}
