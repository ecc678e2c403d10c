//! reportpal response parser.

use liftstat_core::{
    AreaAggregator, AreaReport, BaseDepthRule, Counts, LiftEntry, OperatingStatus, PartialStats,
    TrailEntry,
};
use liftstat_fetch::FetchError;
use serde::Deserialize;
use tracing::debug;

use crate::lenient;

/// A reportpal response. Both blocks are optional; resorts publish one or
/// the other or both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPalReport {
    /// Summary conditions.
    #[serde(default)]
    pub current_conditions: Option<CurrentConditions>,
    /// Per-area lift and trail lists.
    #[serde(default)]
    pub facilities: Option<Facilities>,
}

/// `currentConditions` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Resort-wide totals.
    #[serde(default)]
    pub resortwide: Option<Resortwide>,
    /// Measuring sites.
    #[serde(default)]
    pub resort_locations: Option<ResortLocations>,
}

/// Resort-wide totals.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Resortwide {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub num_trails_open: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub num_trails_total: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub num_lifts_open: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub num_lifts_total: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub num_trails_groomed: Option<u32>,
}

/// `resortLocations` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResortLocations {
    /// Sites in publication order.
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub location: Vec<Location>,
}

/// A measuring site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    /// Site name.
    #[serde(default)]
    pub name: Option<String>,
    /// Base reading.
    #[serde(default)]
    pub base: Option<Depth>,
}

/// A depth reading; `inches` may be `"30"` or `"24 - 48"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Depth {
    /// Inches, low end of a range.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub inches: Option<u32>,
}

/// `facilities` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Facilities {
    /// Area wrapper.
    #[serde(default)]
    pub areas: Option<Areas>,
}

/// `areas` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Areas {
    /// Areas.
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub area: Vec<Area>,
}

/// One sub-area with its lifts and trails.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct Area {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lifts: Option<Lifts>,
    #[serde(default)]
    pub trails: Option<Trails>,
}

/// `lifts` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lifts {
    /// Lifts.
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub lift: Vec<Lift>,
}

/// A lift.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct Lift {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// `trails` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trails {
    /// Trails.
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub trail: Vec<Trail>,
}

/// A trail.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct Trail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub groomed: bool,
}

// ============================================================================
// Normalization
// ============================================================================

impl ReportPalReport {
    /// First positive base reading across the measuring sites.
    pub fn base_depth(&self) -> Option<u32> {
        let locations = self
            .current_conditions
            .as_ref()
            .and_then(|c| c.resort_locations.as_ref())?;
        BaseDepthRule::FirstPositive.pick(
            locations
                .location
                .iter()
                .map(|l| l.base.as_ref().and_then(|b| b.inches)),
        )
    }

    /// Resort-wide summary stats.
    pub fn summary(&self) -> Option<PartialStats> {
        let rw = self
            .current_conditions
            .as_ref()
            .and_then(|c| c.resortwide.as_ref())?;
        Some(PartialStats {
            lifts: Some(Counts::new(
                rw.num_lifts_open.unwrap_or(0),
                rw.num_lifts_total.unwrap_or(0),
            )),
            trails: Some(Counts::new(
                rw.num_trails_open.unwrap_or(0),
                rw.num_trails_total.unwrap_or(0),
            )),
            groomed: Some(rw.num_trails_groomed.unwrap_or(0)),
            base_depth: Some(self.base_depth().unwrap_or(0)),
            ..PartialStats::default()
        })
    }

    /// Per-area reports with item lists.
    pub fn area_reports(&self) -> Option<Vec<AreaReport>> {
        let areas = self.facilities.as_ref().and_then(|f| f.areas.as_ref())?;
        Some(areas.area.iter().map(Area::to_report).collect())
    }

    /// Counts computed from the area lists, with the resort-wide base depth.
    pub fn area_stats(&self, aggregator: &AreaAggregator) -> Option<PartialStats> {
        let reports = self.area_reports()?;
        let mut stats = aggregator.aggregate(&reports);
        stats.base_depth = Some(self.base_depth().unwrap_or(0));
        Some(stats)
    }
}

impl Area {
    /// Converts the area into an aggregator report.
    pub fn to_report(&self) -> AreaReport {
        let lifts = self
            .lifts
            .as_ref()
            .map(|l| l.lift.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|l| {
                LiftEntry::new(
                    l.name.clone(),
                    l.kind.clone(),
                    OperatingStatus::coerce(&l.status),
                )
            })
            .collect();
        let trails = self
            .trails
            .as_ref()
            .map(|t| t.trail.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|t| TrailEntry::new(t.name.clone(), OperatingStatus::coerce(&t.status), t.groomed))
            .collect();

        AreaReport::new(self.name.clone())
            .with_lifts(lifts)
            .with_trails(trails)
    }
}

/// Parses a reportpal body.
pub fn parse_report(json_str: &str) -> Result<ReportPalReport, FetchError> {
    debug!(len = json_str.len(), "Parsing reportpal response");
    Ok(serde_json::from_str(json_str)?)
}
