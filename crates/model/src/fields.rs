//! Canonical field and label names
//!
//! Connectors write these keys; the analytics engine reads them. Keeping
//! them as constants avoids typo drift between the write and read paths.

/// Order total, tax inclusive
pub const TOTAL_PRICE: &str = "total_price";
/// Order total before tax and shipping
pub const SUBTOTAL_PRICE: &str = "subtotal_price";
/// Order tax amount
pub const TOTAL_TAX: &str = "total_tax";

/// Customer lifetime spend
pub const TOTAL_SPENT: &str = "total_spent";
/// Customer lifetime order count
pub const ORDERS_COUNT: &str = "orders_count";

/// Ad spend for the campaign-day, in account currency (not micros)
pub const SPEND: &str = "spend";
/// Ad impressions
pub const IMPRESSIONS: &str = "impressions";
/// Ad clicks
pub const CLICKS: &str = "clicks";
/// Attributed conversions
pub const CONVERSIONS: &str = "conversions";
/// Attributed conversion value (revenue credited to the campaign)
pub const CONVERSION_VALUE: &str = "conversion_value";

/// Shipment weight in kg
pub const WEIGHT: &str = "weight";
/// Courier shipping charges
pub const SHIPPING_CHARGES: &str = "shipping_charges";
/// Cash-on-delivery charges
pub const COD_CHARGES: &str = "cod_charges";
/// 1.0 if the shipment reached the customer, else 0.0
pub const DELIVERED: &str = "delivered";

// Labels

/// ISO currency code
pub const CURRENCY: &str = "currency";
/// Vendor-reported financial status (paid, pending, refunded, ...)
pub const FINANCIAL_STATUS: &str = "financial_status";
/// Vendor-reported fulfillment status
pub const FULFILLMENT_STATUS: &str = "fulfillment_status";
/// Campaign display name
pub const CAMPAIGN_NAME: &str = "campaign_name";
/// Campaign status (ACTIVE, PAUSED, ...)
pub const STATUS: &str = "status";
/// Courier company name
pub const COURIER: &str = "courier";
