//! Command implementations for the Tally CLI

pub mod init;
pub mod metrics;
pub mod query;
pub mod serve;
pub mod status;
pub mod sync;
