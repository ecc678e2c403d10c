//! Domain models for liftstat.
//!
//! ## Submodules
//!
//! - [`stats`] - Canonical record, open/total pairs and merge rules
//! - [`resort`] - Resort descriptors and declared provider families
//! - [`status`] - Normalized lift/trail operating status

pub mod resort;
pub mod stats;
pub mod status;

pub use resort::{ResortDescriptor, StatsProvider};
pub use stats::{Counts, PartialStats, StatsRecord};
pub use status::OperatingStatus;
