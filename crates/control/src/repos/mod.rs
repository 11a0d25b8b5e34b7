//! Control store repositories

mod platform_configs;
mod sync_logs;

pub use platform_configs::PlatformConfigRepo;
pub use sync_logs::SyncLogRepo;
