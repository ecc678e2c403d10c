//! POWDR resort API.
//!
//! POWDR resorts expose `dor/drupal` lists of trails, lifts and snow reports
//! on the host given as the resort's `api` endpoint.

mod parser;
mod strategies;

pub use parser::{
    PowdrLift, PowdrLocation, PowdrSnowReport, PowdrTrail, base_depth, combine, lift_stats,
    trail_stats,
};
pub use strategies::PowdrStrategy;
