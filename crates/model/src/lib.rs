//! Tally - Data Model
//!
//! The normalized record model shared by connectors, the warehouse, the
//! sync orchestrator, and the analytics engine.
//!
//! # Overview
//!
//! Every external platform produces the same flat shape: a
//! [`PlatformRecord`] with a stable external id, a timestamp, numeric
//! fields (spend, revenue, clicks, weight, ...) and string labels
//! (currency, status, courier, ...). Connectors normalize vendor JSON
//! into this shape; the warehouse stores one row per record; the
//! analytics engine aggregates fields back out.
//!
//! # Invariants
//!
//! - `external_id` is unique per `(platform, kind, workspace)`.
//!   Re-syncing upserts, it never duplicates.
//! - Records are append-or-upsert: created by the orchestrator, never
//!   mutated in place.
//! - Demo records always carry `is_demo = true` so downstream
//!   aggregates can surface the taint explicitly.

mod currency;
mod platform;
mod record;

pub mod fields;

#[cfg(test)]
mod record_test;

pub use currency::micros_to_decimal;
pub use platform::{Platform, PlatformParseError, RecordKind};
pub use record::{PlatformRecord, Row, RowError};
