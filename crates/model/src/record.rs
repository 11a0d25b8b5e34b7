//! Normalized platform records and warehouse row conversion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::platform::{Platform, RecordKind};

/// A warehouse row: one flat JSON object, inserted as `JSONEachRow`
pub type Row = Map<String, Value>;

/// Columns every warehouse table shares; everything else is a metric field
const META_COLUMNS: &[&str] = &[
    "platform",
    "kind",
    "external_id",
    "workspace_id",
    "timestamp",
    "updated_at",
    "is_demo",
    "labels",
];

/// One normalized record: an order, a campaign-day, a shipment, or a
/// customer, reduced to numeric fields plus string labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    /// Source platform
    pub platform: Platform,
    /// What this row represents
    pub kind: RecordKind,
    /// Stable vendor id, unique per (platform, kind, workspace)
    pub external_id: String,
    /// Tenant this record belongs to
    pub workspace_id: u32,
    /// Business timestamp (order created, campaign date, pickup date)
    pub timestamp: DateTime<Utc>,
    /// Flat numeric fields (see [`crate::fields`])
    pub fields: BTreeMap<String, f64>,
    /// Flat string labels (currency, status, courier, ...)
    pub labels: BTreeMap<String, String>,
    /// True when generated by the demo-data path, never by a real API
    pub is_demo: bool,
}

impl PlatformRecord {
    /// Create a record with empty fields and labels
    pub fn new(
        platform: Platform,
        kind: RecordKind,
        external_id: impl Into<String>,
        workspace_id: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            platform,
            kind,
            external_id: external_id.into(),
            workspace_id,
            timestamp,
            fields: BTreeMap::new(),
            labels: BTreeMap::new(),
            is_demo: false,
        }
    }

    /// Set a numeric field (builder style)
    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Set a string label (builder style)
    pub fn with_label(mut self, name: &str, value: impl Into<String>) -> Self {
        self.labels.insert(name.to_string(), value.into());
        self
    }

    /// Mark as demo data
    pub fn demo(mut self) -> Self {
        self.is_demo = true;
        self
    }

    /// Get a numeric field, defaulting to 0
    pub fn field(&self, name: &str) -> f64 {
        self.fields.get(name).copied().unwrap_or(0.0)
    }

    /// Warehouse table this record belongs in
    pub fn table(&self) -> &'static str {
        self.platform.table(self.kind)
    }

    /// Flatten into a warehouse row
    ///
    /// Metric fields land as top-level numeric columns; labels are kept
    /// as a nested JSON object under `labels`. `updated_at` is stamped
    /// at conversion time and drives upsert version selection.
    pub fn to_row(&self) -> Row {
        let mut row = Map::new();
        row.insert("platform".into(), Value::String(self.platform.as_str().into()));
        row.insert("kind".into(), Value::String(self.kind.as_str().into()));
        row.insert("external_id".into(), Value::String(self.external_id.clone()));
        row.insert("workspace_id".into(), Value::from(self.workspace_id));
        row.insert("timestamp".into(), Value::String(self.timestamp.to_rfc3339()));
        row.insert("updated_at".into(), Value::String(Utc::now().to_rfc3339()));
        row.insert("is_demo".into(), Value::from(u8::from(self.is_demo)));

        for (name, value) in &self.fields {
            row.insert(name.clone(), Value::from(*value));
        }

        let labels: Map<String, Value> = self
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        row.insert("labels".into(), Value::Object(labels));

        row
    }

    /// Rebuild a record from a warehouse row (the read path)
    pub fn from_row(row: &Row) -> Result<Self, RowError> {
        let platform: Platform = str_column(row, "platform")?
            .parse()
            .map_err(|_| RowError::BadColumn("platform"))?;
        let kind = match str_column(row, "kind")? {
            "order" => RecordKind::Order,
            "customer" => RecordKind::Customer,
            "campaign_day" => RecordKind::CampaignDay,
            "shipment" => RecordKind::Shipment,
            _ => return Err(RowError::BadColumn("kind")),
        };
        let external_id = str_column(row, "external_id")?.to_string();
        let workspace_id = row
            .get("workspace_id")
            .and_then(Value::as_u64)
            .ok_or(RowError::BadColumn("workspace_id"))? as u32;
        let timestamp = DateTime::parse_from_rfc3339(str_column(row, "timestamp")?)
            .map_err(|_| RowError::BadColumn("timestamp"))?
            .with_timezone(&Utc);
        let is_demo = row
            .get("is_demo")
            .map(|v| v.as_u64().unwrap_or(0) != 0 || v.as_bool().unwrap_or(false))
            .unwrap_or(false);

        let mut fields = BTreeMap::new();
        for (name, value) in row {
            if META_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            if let Some(n) = value.as_f64() {
                fields.insert(name.clone(), n);
            }
        }

        let mut labels = BTreeMap::new();
        if let Some(Value::Object(map)) = row.get("labels") {
            for (name, value) in map {
                if let Some(s) = value.as_str() {
                    labels.insert(name.clone(), s.to_string());
                }
            }
        }

        Ok(Self {
            platform,
            kind,
            external_id,
            workspace_id,
            timestamp,
            fields,
            labels,
            is_demo,
        })
    }
}

fn str_column<'a>(row: &'a Row, name: &'static str) -> Result<&'a str, RowError> {
    row.get(name)
        .and_then(Value::as_str)
        .ok_or(RowError::Missing(name))
}

/// Errors converting warehouse rows back into records
#[derive(Debug, Error)]
pub enum RowError {
    /// Required column absent or not a string
    #[error("missing column: {0}")]
    Missing(&'static str),

    /// Column present but unparseable
    #[error("bad column value: {0}")]
    BadColumn(&'static str),
}
