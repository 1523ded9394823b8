//! Data model and statistics for barrage reports.
//!
//! Everything here is synchronous and free of runtime state. The `barrage` crate drives these
//! types from the reporter task.
mod config;
mod constants;
mod data;
mod report;
mod stats;
mod timeline;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use report::*;
pub use stats::*;
pub use timeline::*;

pub use time::OffsetDateTime;
