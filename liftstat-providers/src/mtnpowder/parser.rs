//! mtnpowder feed parser.

use liftstat_core::{AreaAggregator, BaseDepthRule, Counts, PartialStats};
use liftstat_fetch::FetchError;
use serde::Deserialize;
use tracing::debug;

use crate::lenient;

// ============================================================================
// Feed Types
// ============================================================================

/// A `feed/v3.json` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MtnPowderFeed {
    /// One entry per requested resort.
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub resorts: Vec<FeedResort>,
}

/// One resort in a feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedResort {
    /// Feed id.
    #[serde(default, alias = "ID", deserialize_with = "lenient::opt_u32")]
    pub id: Option<u32>,
    /// Resort name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current snow report.
    #[serde(default)]
    pub snow_report: Option<SnowReport>,
}

/// The snow report block of a feed resort.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnowReport {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_open_lifts: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_lifts: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_open_trails: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_trails: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub groomed_trails: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub open_terrain_acres: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_terrain_acres: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_open_parks: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_parks: Option<u32>,
    #[serde(default)]
    pub base_area: Option<DepthArea>,
    #[serde(default)]
    pub mid_mountain_area: Option<DepthArea>,
    /// "18 - 48", "47" or "--".
    #[serde(default)]
    pub snow_base_range_in: Option<String>,
}

/// A named measuring site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepthArea {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub base_in: Option<u32>,
}

// ============================================================================
// Normalization
// ============================================================================

fn pair(open: Option<u32>, total: Option<u32>) -> Option<Counts> {
    match (open, total) {
        (None, None) => None,
        (open, total) => Some(Counts::new(open.unwrap_or(0), total.unwrap_or(0))),
    }
}

impl SnowReport {
    /// Base depth: base area, else mid-mountain, else the low end of the
    /// base range.
    pub fn base_depth(&self) -> Option<u32> {
        self.base_area
            .as_ref()
            .and_then(|a| a.base_in)
            .or_else(|| self.mid_mountain_area.as_ref().and_then(|a| a.base_in))
            .or_else(|| {
                self.snow_base_range_in
                    .as_deref()
                    .and_then(lenient::leading_int)
            })
    }

    /// Converts the report into partial stats. Acres and parks are kept
    /// only when the feed lists a non-zero total.
    pub fn to_stats(&self) -> PartialStats {
        PartialStats {
            lifts: pair(self.total_open_lifts, self.total_lifts),
            trails: pair(self.total_open_trails, self.total_trails),
            groomed: self.groomed_trails,
            base_depth: self.base_depth(),
            acres: pair(self.open_terrain_acres, self.total_terrain_acres)
                .filter(|c| !c.is_empty()),
            parks: pair(self.total_open_parks, self.total_parks).filter(|c| !c.is_empty()),
        }
    }
}

impl MtnPowderFeed {
    /// Returns the report for a feed id, or the first report when no entry
    /// carries that id.
    pub fn report_for(&self, feed_id: Option<u32>) -> Option<&SnowReport> {
        let with_report = || self.resorts.iter().filter(|r| r.snow_report.is_some());
        feed_id
            .and_then(|id| with_report().find(|r| r.id == Some(id)))
            .or_else(|| with_report().next())
            .and_then(|r| r.snow_report.as_ref())
    }

    /// Sums every report in the feed, taking the deepest base.
    pub fn combined_stats(&self) -> PartialStats {
        AreaAggregator::new()
            .base_depth(BaseDepthRule::Deepest)
            .combine(
                self.resorts
                    .iter()
                    .filter_map(|r| r.snow_report.as_ref())
                    .map(SnowReport::to_stats),
            )
    }
}

/// Parses a feed body.
pub fn parse_feed(json_str: &str) -> Result<MtnPowderFeed, FetchError> {
    debug!(len = json_str.len(), "Parsing mtnpowder feed");
    let feed: MtnPowderFeed = serde_json::from_str(json_str)?;
    if feed.resorts.is_empty() {
        return Err(FetchError::NoData("feed lists no resorts".to_string()));
    }
    Ok(feed)
}
