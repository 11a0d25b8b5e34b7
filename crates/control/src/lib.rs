//! Tally Control Store
//!
//! Turso-backed persistence for the thin operational state the sync
//! pipeline needs: per-workspace platform credentials with connection
//! status and the `last_sync` checkpoint, plus a log of sync passes.
//!
//! Warehouse data never lives here; this is the control plane only.
//!
//! # Usage
//!
//! ```ignore
//! use tally_control::ControlStore;
//!
//! // File-based (production)
//! let store = ControlStore::new("data").await?;
//!
//! // In-memory (testing)
//! let store = ControlStore::new_memory().await?;
//!
//! let configs = store.platform_configs();
//! let config = configs.get(1, Platform::Shopify).await?;
//! ```

mod db;
mod error;
mod models;
mod repos;

pub use db::ControlStore;
pub use error::{ControlError, Result};
pub use models::{ConnectionStatus, PlatformConfig, SyncLog, SyncLogStatus};
pub use repos::{PlatformConfigRepo, SyncLogRepo};

impl ControlStore {
    /// Get the platform config repository
    pub fn platform_configs(&self) -> PlatformConfigRepo<'_> {
        PlatformConfigRepo::new(self.db())
    }

    /// Get the sync log repository
    pub fn sync_logs(&self) -> SyncLogRepo<'_> {
        SyncLogRepo::new(self.db())
    }
}
