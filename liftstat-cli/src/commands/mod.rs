//! CLI command implementations.

pub mod resorts;
pub mod stats;
