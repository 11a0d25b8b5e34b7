//! KPI formulas
//!
//! Metrics are derived at read time from raw warehouse records and never
//! persisted. Every ratio guards its denominator: a window with zero
//! orders has an AOV of 0, not NaN. All reported values are rounded to
//! two decimal places.

use serde::{Deserialize, Serialize};

use tally_model::{fields, PlatformRecord, RecordKind};

use crate::timerange::TimeRange;

/// Raw sums accumulated over a window, before any ratios
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    /// Gross order revenue
    pub revenue: f64,
    /// Number of orders
    pub orders: u64,
    /// New customers acquired in the window
    pub new_customers: u64,
    /// Ad spend across all networks
    pub ad_spend: f64,
    /// Ad impressions
    pub impressions: u64,
    /// Ad clicks
    pub clicks: u64,
    /// Attributed conversions
    pub conversions: u64,
    /// Revenue the ad networks credit to campaigns
    pub conversion_value: f64,
    /// Shipments created
    pub shipments: u64,
    /// Shipments that reached the customer
    pub delivered: u64,
    /// Courier and COD charges
    pub shipping_cost: f64,
    /// True if any contributing record is demo data
    pub has_demo_data: bool,
}

impl Aggregates {
    /// Fold records that fall inside the window into the aggregates
    ///
    /// Records outside the window are skipped, not an error; callers may
    /// hand over a full table scan.
    pub fn accumulate(records: &[PlatformRecord], window: &TimeRange) -> Self {
        let mut agg = Self::default();
        for record in records {
            if !window.contains(record.timestamp) {
                continue;
            }
            agg.add(record);
        }
        agg
    }

    fn add(&mut self, record: &PlatformRecord) {
        self.has_demo_data |= record.is_demo;

        match record.kind {
            RecordKind::Order => {
                self.orders += 1;
                self.revenue += record.field(fields::TOTAL_PRICE);
            }
            RecordKind::Customer => {
                self.new_customers += 1;
            }
            RecordKind::CampaignDay => {
                self.ad_spend += record.field(fields::SPEND);
                self.impressions += record.field(fields::IMPRESSIONS) as u64;
                self.clicks += record.field(fields::CLICKS) as u64;
                self.conversions += record.field(fields::CONVERSIONS) as u64;
                self.conversion_value += record.field(fields::CONVERSION_VALUE);
            }
            RecordKind::Shipment => {
                self.shipments += 1;
                if record.field(fields::DELIVERED) > 0.0 {
                    self.delivered += 1;
                }
                self.shipping_cost += record.field(fields::SHIPPING_CHARGES)
                    + record.field(fields::COD_CHARGES);
            }
        }
    }
}

/// Derived KPIs for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Gross order revenue
    pub revenue: f64,
    /// Number of orders
    pub orders: u64,
    /// New customers acquired
    pub new_customers: u64,
    /// Ad spend across all networks
    pub ad_spend: f64,
    /// Average order value
    pub aov: f64,
    /// Click-through rate, percent
    pub ctr: f64,
    /// Cost per click
    pub cpc: f64,
    /// Return on ad spend (ratio, not percent)
    pub roas: f64,
    /// Customer acquisition cost
    pub cac: f64,
    /// Gross margin, percent
    pub gross_margin: f64,
    /// Net margin after COGS, ad spend, and shipping, percent
    pub net_margin: f64,
    /// Share of shipments delivered, percent
    pub delivery_success_rate: f64,
    /// True if any contributing record was demo data
    pub is_demo_data: bool,
}

/// Compute the full KPI set from raw records
///
/// Pure function: no I/O, recomputed on every query. `cogs_rate` is the
/// cost-of-goods fraction of revenue (0.40 means a 60% gross margin on
/// every sale).
pub fn compute_metrics(records: &[PlatformRecord], window: &TimeRange, cogs_rate: f64) -> MetricSet {
    let agg = Aggregates::accumulate(records, window);
    derive(&agg, cogs_rate)
}

/// Derive the KPI set from pre-accumulated sums
pub fn derive(agg: &Aggregates, cogs_rate: f64) -> MetricSet {
    let cogs = agg.revenue * cogs_rate;
    let total_costs = cogs + agg.ad_spend + agg.shipping_cost;

    MetricSet {
        revenue: round2(agg.revenue),
        orders: agg.orders,
        new_customers: agg.new_customers,
        ad_spend: round2(agg.ad_spend),
        aov: round2(ratio(agg.revenue, agg.orders as f64)),
        ctr: round2(ratio(agg.clicks as f64, agg.impressions as f64) * 100.0),
        cpc: round2(ratio(agg.ad_spend, agg.clicks as f64)),
        roas: round2(ratio(agg.conversion_value, agg.ad_spend)),
        cac: round2(ratio(agg.ad_spend, agg.new_customers as f64)),
        gross_margin: round2(ratio(agg.revenue - cogs, agg.revenue) * 100.0),
        net_margin: round2(ratio(agg.revenue - total_costs, agg.revenue) * 100.0),
        delivery_success_rate: round2(ratio(agg.delivered as f64, agg.shipments as f64) * 100.0),
        is_demo_data: agg.has_demo_data,
    }
}

/// Division with a zero-guarded denominator
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
