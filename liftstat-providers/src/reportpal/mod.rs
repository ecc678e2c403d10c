//! reportpal conditions API.
//!
//! Used by several resort groups. Responses carry a resort-wide summary
//! under `currentConditions` and, for some resorts, per-area lift and trail
//! lists under `facilities`.

mod parser;
mod strategies;

pub use parser::{
    Area, Areas, CurrentConditions, Depth, Facilities, Lift, Lifts, Location, ReportPalReport,
    ResortLocations, Resortwide, Trail, Trails, parse_report,
};
pub use strategies::{BIG_SKY_URL, ReportPalAreasStrategy, ReportPalStrategy, SNOQUALMIE_AREAS};
