//! Tally - Connectors
//!
//! Pull-based connectors that fetch commerce data from external
//! platforms and normalize it into `PlatformRecord`s for the warehouse.
//!
//! # Available Connectors
//!
//! - **Shopify** - storefront orders and customers (Admin REST API)
//! - **Meta Ads** - daily campaign insights (Graph API)
//! - **Google Ads** - daily campaign stats, cost in micros
//! - **Shiprocket** - shipments (bearer login, page-number paging)
//!
//! # Design Principles
//!
//! - **Stateless**: a connector lives for one sync pass; no connection
//!   pools or cached sessions survive between passes
//! - **Cursor-driven**: `fetch_page` is lazy and restartable; the
//!   caller loops until `next` is `None`
//! - **No retries**: failures surface immediately; the orchestrator
//!   records them and moves on to the next platform
//! - **Explicit demo fallback**: unconfigured platforms can be seeded
//!   with deterministic demo records, always flagged `is_demo`
//!
//! # Example
//!
//! ```ignore
//! use tally_connectors::{factory, Connector, SyncWindow};
//! use tally_model::RecordKind;
//!
//! let connector = factory::build(platform, &credentials, workspace_id)?;
//! connector.authenticate().await?;
//!
//! let window = SyncWindow::lookback(90);
//! let mut cursor = None;
//! loop {
//!     let page = connector
//!         .fetch_page(RecordKind::Order, &window, cursor.as_deref(), 250)
//!         .await?;
//!     write(page.records);
//!     match page.next {
//!         Some(next) => cursor = Some(next),
//!         None => break,
//!     }
//! }
//! ```

pub mod config;
pub mod demo;
pub mod factory;

mod error;
mod google_ads;
mod meta_ads;
mod shiprocket;
mod shopify;
mod traits;

// Re-exports
pub use config::{GoogleAdsConfig, MetaAdsConfig, ShiprocketConfig, ShopifyConfig};
pub use error::{ConnectorError, Result};
pub use google_ads::GoogleAds;
pub use meta_ads::MetaAds;
pub use shiprocket::Shiprocket;
pub use shopify::Shopify;
pub use traits::{Connector, Page, SyncWindow};
