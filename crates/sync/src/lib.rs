//! Tally - Sync Orchestration
//!
//! Coordinates connectors, the control store, and the warehouse into
//! complete sync passes, and schedules them on a fixed interval.
//!
//! # Flow
//!
//! 1. Selected platforms run concurrently; each builds a fresh
//!    stateless connector from stored credentials
//! 2. Within a platform, pages are fetched sequentially with a fixed
//!    delay, and each page is written as its own atomic batch
//! 3. The checkpoint advances only after the whole platform succeeded;
//!    the next incremental pass starts there
//! 4. Failures are isolated per platform, logged, and reported; the
//!    next scheduled pass is the retry
//!
//! Unconfigured platforms can be seeded with deterministic demo data,
//! always flagged so dashboards can surface the substitution.

mod error;
mod orchestrator;
mod report;
mod scheduler;

#[cfg(test)]
mod orchestrator_test;
#[cfg(test)]
mod scheduler_test;

pub use error::{Result, SyncError};
pub use orchestrator::{PlatformSelection, SyncOrchestrator};
pub use report::{SyncReport, SyncStatus, SyncSummary};
pub use scheduler::SyncScheduler;
