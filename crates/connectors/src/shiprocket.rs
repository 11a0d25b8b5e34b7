//! Shiprocket connector
//!
//! Logs in with email/password to obtain a bearer token, then pages
//! through shipments with a plain page-number cursor. The token lives
//! only as long as the connector, which the orchestrator rebuilds every
//! sync pass.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use tally_model::{fields, Platform, PlatformRecord, RecordKind};

use crate::config::ShiprocketConfig;
use crate::error::{ConnectorError, Result};
use crate::traits::{Connector, Page, SyncWindow};

const API_URL: &str = "https://apiv2.shiprocket.in/v1/external";

/// Shipment statuses that count as reaching the customer
const DELIVERED_STATUSES: &[&str] = &["delivered", "DELIVERED"];

/// Shiprocket connector
pub struct Shiprocket {
    config: ShiprocketConfig,
    client: reqwest::Client,
    workspace_id: u32,
    /// Bearer token cached after the first login
    token: Mutex<Option<String>>,
}

impl Shiprocket {
    /// Create a connector for one sync invocation
    pub fn new(config: ShiprocketConfig, workspace_id: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tally/0.1")
            .build()
            .map_err(|e| ConnectorError::Init(format!("Shiprocket HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            workspace_id,
            token: Mutex::new(None),
        })
    }

    /// Log in if needed and return the bearer token
    async fn token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(ref t) = *token {
            return Ok(t.clone());
        }

        let response = self
            .client
            .post(format!("{}/auth/login", API_URL))
            .json(&serde_json::json!({
                "email": self.config.email,
                "password": self.config.password,
            }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ConnectorError::Auth("login rejected".into()));
        }
        if !response.status().is_success() {
            return Err(match response.error_for_status() {
                Err(e) => ConnectorError::Http(e),
                Ok(_) => ConnectorError::Auth("login failed".into()),
            });
        }

        let data: LoginResponse = response.json().await?;
        if data.token.is_empty() {
            return Err(ConnectorError::Auth("login returned no token".into()));
        }

        debug!(connector = "shiprocket", "logged in");
        *token = Some(data.token.clone());
        Ok(data.token)
    }

    fn page_number(cursor: Option<&str>) -> Result<u32> {
        match cursor {
            None => Ok(1),
            Some(c) => c
                .parse::<u32>()
                .map_err(|_| ConnectorError::InvalidCursor(format!("shiprocket page: {}", c))),
        }
    }

    fn shipment_record(&self, shipment: Shipment) -> PlatformRecord {
        let delivered = DELIVERED_STATUSES.contains(&shipment.status.as_str());

        let mut record = PlatformRecord::new(
            Platform::Shiprocket,
            RecordKind::Shipment,
            shipment.id.to_string(),
            self.workspace_id,
            parse_timestamp(&shipment.created_at),
        )
        .with_field(fields::WEIGHT, shipment.weight)
        .with_field(fields::SHIPPING_CHARGES, shipment.shipping_charges)
        .with_field(fields::COD_CHARGES, shipment.cod_charges)
        .with_field(fields::DELIVERED, if delivered { 1.0 } else { 0.0 });

        if !shipment.status.is_empty() {
            record = record.with_label(fields::STATUS, shipment.status);
        }
        if !shipment.courier_name.is_empty() {
            record = record.with_label(fields::COURIER, shipment.courier_name);
        }

        record
    }
}

#[async_trait]
impl Connector for Shiprocket {
    fn platform(&self) -> Platform {
        Platform::Shiprocket
    }

    async fn authenticate(&self) -> Result<()> {
        self.token().await?;
        Ok(())
    }

    async fn test_connection(&self) -> Result<bool> {
        match self.token().await {
            Ok(_) => Ok(true),
            Err(ConnectorError::Auth(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn fetch_page(
        &self,
        kind: RecordKind,
        window: &SyncWindow,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Page> {
        if kind != RecordKind::Shipment {
            return Err(ConnectorError::NotFound(format!(
                "shiprocket does not provide {}",
                kind.as_str()
            )));
        }

        let token = self.token().await?;
        let page = Self::page_number(cursor)?;

        let url = format!(
            "{}/shipments?page={}&per_page={}&filter_by=created_at&filter={}",
            API_URL,
            page,
            page_size,
            window.since.format("%Y-%m-%d"),
        );

        let response = self.client.get(&url).bearer_auth(&token).send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ConnectorError::Auth("bearer token expired".into()));
        }
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ConnectorError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if !response.status().is_success() {
            return Err(match response.error_for_status() {
                Err(e) => ConnectorError::Http(e),
                Ok(_) => ConnectorError::NotFound("shipments".into()),
            });
        }

        let data: ShipmentsResponse = response.json().await?;
        debug!(
            connector = "shiprocket",
            page,
            shipments = data.data.len(),
            "fetched shipments page"
        );

        let next = if data.data.len() == page_size as usize {
            Some((page + 1).to_string())
        } else {
            None
        };
        let records = data
            .data
            .into_iter()
            .map(|s| self.shipment_record(s))
            .collect();

        Ok(Page { records, next })
    }
}

/// Shiprocket timestamps are `YYYY-MM-DD HH:MM:SS` or plain dates
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return t.with_timezone(&Utc);
    }
    if let Ok(t) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return t.and_utc();
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now)
}

// --- API Response Types ---

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
struct ShipmentsResponse {
    #[serde(default)]
    data: Vec<Shipment>,
}

#[derive(Debug, Deserialize)]
struct Shipment {
    id: u64,
    #[serde(default)]
    status: String,
    #[serde(default)]
    courier_name: String,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    shipping_charges: f64,
    #[serde(default)]
    cod_charges: f64,
    #[serde(default)]
    created_at: String,
}
