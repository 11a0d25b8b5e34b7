//! Shopify connector
//!
//! Pulls orders and customers from the Shopify Admin REST API. Pagination
//! uses `since_id`: each page asks for records with an id greater than the
//! last id of the previous page, bounded below by `created_at_min`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use tally_model::{fields, Platform, PlatformRecord, RecordKind};

use crate::config::ShopifyConfig;
use crate::error::{ConnectorError, Result};
use crate::traits::{Connector, Page, SyncWindow};

/// Shopify connector
pub struct Shopify {
    config: ShopifyConfig,
    client: reqwest::Client,
    workspace_id: u32,
}

impl Shopify {
    /// Create a connector for one sync invocation
    pub fn new(config: ShopifyConfig, workspace_id: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tally/0.1")
            .build()
            .map_err(|e| ConnectorError::Init(format!("Shopify HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            workspace_id,
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{}",
            self.config.store, self.config.api_version, endpoint
        )
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("X-Shopify-Access-Token", &self.config.access_token)
    }

    fn handle_error_status(&self, response: reqwest::Response, context: &str) -> ConnectorError {
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => ConnectorError::NotFound(context.to_string()),
            reqwest::StatusCode::UNAUTHORIZED => {
                ConnectorError::Auth("invalid or missing access token".into())
            }
            reqwest::StatusCode::FORBIDDEN => {
                ConnectorError::Auth("access denied - check API permissions".into())
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited {
                retry_after_secs: 60,
            },
            _ => match response.error_for_status() {
                Err(e) => ConnectorError::Http(e),
                Ok(_) => ConnectorError::NotFound(context.to_string()),
            },
        }
    }

    fn since_id(cursor: Option<&str>) -> Result<Option<u64>> {
        cursor
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| ConnectorError::InvalidCursor(format!("shopify since_id: {}", c)))
            })
            .transpose()
    }

    async fn fetch_orders(
        &self,
        window: &SyncWindow,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Page> {
        let mut url = self.api_url(&format!(
            "orders.json?status=any&limit={}&created_at_min={}",
            page_size,
            urlencoding::encode(&window.since.to_rfc3339())
        ));
        if let Some(since_id) = Self::since_id(cursor)? {
            url.push_str(&format!("&since_id={}", since_id));
        }

        let response = self.build_request(&url).send().await?;
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "orders"));
        }

        let data: OrdersResponse = response.json().await?;
        debug!(
            connector = "shopify",
            orders = data.orders.len(),
            "fetched order page"
        );

        let next = next_cursor(data.orders.len(), page_size, data.orders.last().map(|o| o.id));
        let records = data
            .orders
            .into_iter()
            .map(|o| self.order_record(o))
            .collect();

        Ok(Page { records, next })
    }

    async fn fetch_customers(
        &self,
        window: &SyncWindow,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Page> {
        let mut url = self.api_url(&format!(
            "customers.json?limit={}&created_at_min={}",
            page_size,
            urlencoding::encode(&window.since.to_rfc3339())
        ));
        if let Some(since_id) = Self::since_id(cursor)? {
            url.push_str(&format!("&since_id={}", since_id));
        }

        let response = self.build_request(&url).send().await?;
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "customers"));
        }

        let data: CustomersResponse = response.json().await?;
        let next = next_cursor(
            data.customers.len(),
            page_size,
            data.customers.last().map(|c| c.id),
        );
        let records = data
            .customers
            .into_iter()
            .map(|c| self.customer_record(c))
            .collect();

        Ok(Page { records, next })
    }

    fn order_record(&self, order: Order) -> PlatformRecord {
        let mut record = PlatformRecord::new(
            Platform::Shopify,
            RecordKind::Order,
            order.id.to_string(),
            self.workspace_id,
            order.created_at.unwrap_or_else(Utc::now),
        )
        .with_field(fields::TOTAL_PRICE, parse_money(&order.total_price))
        .with_field(fields::SUBTOTAL_PRICE, parse_money(&order.subtotal_price))
        .with_field(fields::TOTAL_TAX, parse_money(&order.total_tax));

        if !order.currency.is_empty() {
            record = record.with_label(fields::CURRENCY, order.currency);
        }
        if let Some(status) = order.financial_status {
            record = record.with_label(fields::FINANCIAL_STATUS, status);
        }
        if let Some(status) = order.fulfillment_status {
            record = record.with_label(fields::FULFILLMENT_STATUS, status);
        }

        record
    }

    fn customer_record(&self, customer: Customer) -> PlatformRecord {
        PlatformRecord::new(
            Platform::Shopify,
            RecordKind::Customer,
            customer.id.to_string(),
            self.workspace_id,
            customer.created_at.unwrap_or_else(Utc::now),
        )
        .with_field(fields::TOTAL_SPENT, parse_money(&customer.total_spent))
        .with_field(fields::ORDERS_COUNT, customer.orders_count as f64)
    }
}

#[async_trait]
impl Connector for Shopify {
    fn platform(&self) -> Platform {
        Platform::Shopify
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = self.api_url("shop.json");
        let response = self.build_request(&url).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(self.handle_error_status(response, "shop"));
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
        match kind {
            RecordKind::Order => self.fetch_orders(window, cursor, page_size).await,
            RecordKind::Customer => self.fetch_customers(window, cursor, page_size).await,
            other => Err(ConnectorError::NotFound(format!(
                "shopify does not provide {}",
                other.as_str()
            ))),
        }
    }
}

/// A full page means there may be more; the cursor is the last seen id
fn next_cursor(fetched: usize, page_size: u32, last_id: Option<u64>) -> Option<String> {
    if fetched == page_size as usize {
        last_id.map(|id| id.to_string())
    } else {
        None
    }
}

/// Shopify sends money as decimal strings
fn parse_money(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

// --- API Response Types ---

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct Order {
    id: u64,
    #[serde(default)]
    total_price: String,
    #[serde(default)]
    subtotal_price: String,
    #[serde(default)]
    total_tax: String,
    #[serde(default)]
    currency: String,
    financial_status: Option<String>,
    fulfillment_status: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CustomersResponse {
    customers: Vec<Customer>,
}

#[derive(Debug, Deserialize)]
struct Customer {
    id: u64,
    #[serde(default)]
    total_spent: String,
    #[serde(default)]
    orders_count: u64,
    created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> Shopify {
        Shopify::new(
            ShopifyConfig {
                store: "demo.myshopify.com".into(),
                access_token: "shpat_test".into(),
                api_version: "2024-01".into(),
            },
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_api_url() {
        let shopify = connector();
        assert_eq!(
            shopify.api_url("shop.json"),
            "https://demo.myshopify.com/admin/api/2024-01/shop.json"
        );
    }

    #[test]
    fn test_order_record_normalization() {
        let shopify = connector();
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 4511,
            "total_price": "149.99",
            "subtotal_price": "139.99",
            "total_tax": "10.00",
            "currency": "INR",
            "financial_status": "paid",
            "fulfillment_status": null,
            "created_at": "2024-03-01T10:00:00Z",
        }))
        .unwrap();

        let record = shopify.order_record(order);
        assert_eq!(record.external_id, "4511");
        assert_eq!(record.field(fields::TOTAL_PRICE), 149.99);
        assert_eq!(record.labels.get(fields::CURRENCY).unwrap(), "INR");
        assert_eq!(record.labels.get(fields::FINANCIAL_STATUS).unwrap(), "paid");
        assert!(!record.labels.contains_key(fields::FULFILLMENT_STATUS));
        assert!(!record.is_demo);
    }

    #[test]
    fn test_next_cursor() {
        // Full page: continue from last id
        assert_eq!(next_cursor(250, 250, Some(999)), Some("999".to_string()));
        // Short page: exhausted
        assert_eq!(next_cursor(120, 250, Some(999)), None);
        assert_eq!(next_cursor(0, 250, None), None);
    }

    #[test]
    fn test_bad_cursor_rejected() {
        let err = Shopify::since_id(Some("not-a-number")).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidCursor(_)));
        assert_eq!(Shopify::since_id(Some("42")).unwrap(), Some(42));
        assert_eq!(Shopify::since_id(None).unwrap(), None);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("149.99"), 149.99);
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(parse_money("garbage"), 0.0);
    }
}
