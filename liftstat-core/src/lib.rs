// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # liftstat Core
//!
//! Canonical stats model for liftstat.
//!
//! Every upstream source, whatever its shape, is normalized into the types
//! defined here:
//!
//! - [`StatsRecord`] - open/total lifts and trails, groomed trails, base depth
//! - [`PartialStats`] - the same with every field optional, plus merge rules
//! - [`ResortDescriptor`] - a resort id and its known endpoints
//! - [`AreaAggregator`] - combines per-area reports into one resort record
//!
//! A record whose lift and trail totals are both zero is never a result:
//! it is reported as unavailable.

pub mod aggregate;
pub mod error;
pub mod models;

pub use error::CoreError;

pub use aggregate::{
    AreaAggregator, AreaReport, BaseDepthRule, ConnectorRule, LiftEntry, TrailEntry,
};
pub use models::{
    Counts, OperatingStatus, PartialStats, ResortDescriptor, StatsProvider, StatsRecord,
};
