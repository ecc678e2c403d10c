//! Multi-area aggregation.
//!
//! Some resorts publish one report per physical sub-area (or per mountain).
//! [`AreaAggregator`] filters areas and items within them, then combines the
//! per-area counts into a single resort-level [`PartialStats`].
//!
//! ```
//! use liftstat_core::{AreaAggregator, AreaReport, ConnectorRule, Counts, PartialStats};
//!
//! let aggregator = AreaAggregator::new()
//!     .allow_areas(["Summit West"])
//!     .exclude_lift_kind("Magic Carpet")
//!     .connectors(ConnectorRule::new(["West", "Central"], Some("Summit")).unwrap());
//!
//! let area = AreaReport::new("Summit West").with_summary(PartialStats {
//!     lifts: Some(Counts::new(3, 4)),
//!     ..PartialStats::default()
//! });
//! let stats = aggregator.aggregate(&[area]);
//! assert_eq!(stats.lifts, Some(Counts::new(3, 4)));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Counts, OperatingStatus, PartialStats};

// ============================================================================
// Area Reports
// ============================================================================

/// One lift in an area report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiftEntry {
    /// Lift name.
    pub name: String,
    /// Lift type as the source spells it ("Chair", "Magic Carpet").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Normalized status.
    pub status: OperatingStatus,
}

impl LiftEntry {
    /// Creates a lift entry.
    pub fn new(name: impl Into<String>, kind: Option<String>, status: OperatingStatus) -> Self {
        Self {
            name: name.into(),
            kind,
            status,
        }
    }
}

/// One trail in an area report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailEntry {
    /// Trail name.
    pub name: String,
    /// Normalized status.
    pub status: OperatingStatus,
    /// Whether the trail was groomed.
    #[serde(default)]
    pub groomed: bool,
}

impl TrailEntry {
    /// Creates a trail entry.
    pub fn new(name: impl Into<String>, status: OperatingStatus, groomed: bool) -> Self {
        Self {
            name: name.into(),
            status,
            groomed,
        }
    }
}

/// Stats for one named sub-area.
///
/// `summary` carries whatever the source reports at area level. When the
/// item lists are present they replace the summary's lift, trail and groomed
/// counts, so item-level filters apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaReport {
    /// Area name.
    pub name: String,
    /// Area-level stats.
    #[serde(default)]
    pub summary: PartialStats,
    /// Individual lifts, when listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifts: Option<Vec<LiftEntry>>,
    /// Individual trails, when listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trails: Option<Vec<TrailEntry>>,
}

impl AreaReport {
    /// Creates an empty report for an area.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the area-level summary.
    pub fn with_summary(mut self, summary: PartialStats) -> Self {
        self.summary = summary;
        self
    }

    /// Sets the lift list.
    pub fn with_lifts(mut self, lifts: Vec<LiftEntry>) -> Self {
        self.lifts = Some(lifts);
        self
    }

    /// Sets the trail list.
    pub fn with_trails(mut self, trails: Vec<TrailEntry>) -> Self {
        self.trails = Some(trails);
        self
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Matches trails that only connect two areas ("West to Central Upper").
#[derive(Debug, Clone)]
pub struct ConnectorRule {
    pattern: Regex,
}

impl ConnectorRule {
    /// Builds a rule matching "<A> to <B>" where A and B are area names,
    /// each optionally preceded by `prefix`. Case-insensitive, anchored at
    /// the start of the trail name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if `names` is empty.
    pub fn new<I, S>(names: I, prefix: Option<&str>) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives = names
            .into_iter()
            .map(|n| regex::escape(n.as_ref().trim()))
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();
        if alternatives.is_empty() {
            return Err(CoreError::InvalidConfig(
                "connector rule needs at least one area name".to_string(),
            ));
        }

        let area = alternatives.join("|");
        let lead = prefix
            .map(|p| format!(r"(?:{}\s+)?", regex::escape(p.trim())))
            .unwrap_or_default();
        let pattern = Regex::new(&format!(
            r"(?i)^{lead}(?:{area})\s+to\s+{lead}(?:{area})\b"
        ))?;
        Ok(Self { pattern })
    }

    /// Returns true if the trail name is a connector.
    pub fn is_connector(&self, trail_name: &str) -> bool {
        self.pattern.is_match(trail_name.trim())
    }
}

/// How the aggregated base depth is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseDepthRule {
    /// First positive reading in preference order (allow-list order, else
    /// input order).
    #[default]
    FirstPositive,
    /// Deepest reading across areas.
    Deepest,
}

impl BaseDepthRule {
    /// Picks a base depth from readings in preference order.
    ///
    /// Absent readings are skipped. If every present reading is zero the
    /// result is `Some(0)`; if none is present, `None`.
    pub fn pick<I>(self, readings: I) -> Option<u32>
    where
        I: IntoIterator<Item = Option<u32>>,
    {
        let mut present = readings.into_iter().flatten().peekable();
        present.peek()?;
        match self {
            Self::FirstPositive => Some(present.find(|d| *d > 0).unwrap_or(0)),
            Self::Deepest => present.max(),
        }
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Combines per-area reports into one resort-level record.
#[derive(Debug, Clone, Default)]
pub struct AreaAggregator {
    allowed: Option<Vec<String>>,
    excluded_lift_kinds: Vec<String>,
    connectors: Vec<ConnectorRule>,
    base_depth: BaseDepthRule,
}

impl AreaAggregator {
    /// Creates an aggregator that includes every area and item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts aggregation to the named areas. The order given is the
    /// base-depth preference order.
    pub fn allow_areas<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Drops lifts of this type from open and total (case-insensitive).
    pub fn exclude_lift_kind(mut self, kind: impl Into<String>) -> Self {
        self.excluded_lift_kinds.push(kind.into());
        self
    }

    /// Drops trails matching the rule from open and total.
    pub fn connectors(mut self, rule: ConnectorRule) -> Self {
        self.connectors.push(rule);
        self
    }

    /// Sets the base depth rule.
    pub fn base_depth(mut self, rule: BaseDepthRule) -> Self {
        self.base_depth = rule;
        self
    }

    /// Returns true if the area passes the allow-list.
    pub fn includes_area(&self, name: &str) -> bool {
        self.allowed.as_ref().is_none_or(|allowed| {
            allowed
                .iter()
                .any(|a| a.trim().eq_ignore_ascii_case(name.trim()))
        })
    }

    fn includes_lift(&self, lift: &LiftEntry) -> bool {
        lift.kind.as_deref().is_none_or(|kind| {
            !self
                .excluded_lift_kinds
                .iter()
                .any(|k| k.eq_ignore_ascii_case(kind.trim()))
        })
    }

    fn includes_trail(&self, trail: &TrailEntry) -> bool {
        !self.connectors.iter().any(|c| c.is_connector(&trail.name))
    }

    /// Computes one area's stats with the item filters applied.
    pub fn area_stats(&self, area: &AreaReport) -> PartialStats {
        let mut stats = area.summary.clone();

        if let Some(lifts) = &area.lifts {
            stats.lifts = Some(Counts::tally(
                lifts
                    .iter()
                    .filter(|l| self.includes_lift(l))
                    .map(|l| l.status.is_open()),
            ));
        }

        if let Some(trails) = &area.trails {
            let included = trails
                .iter()
                .filter(|t| self.includes_trail(t))
                .collect::<Vec<_>>();
            stats.trails = Some(Counts::tally(included.iter().map(|t| t.status.is_open())));
            stats.groomed = Some(
                u32::try_from(included.iter().filter(|t| t.groomed).count()).unwrap_or(u32::MAX),
            );
        }

        stats
    }

    /// Aggregates the included areas.
    pub fn aggregate(&self, areas: &[AreaReport]) -> PartialStats {
        let mut included = areas
            .iter()
            .filter(|a| self.includes_area(&a.name))
            .collect::<Vec<_>>();

        if let Some(allowed) = &self.allowed {
            included.sort_by_key(|a| {
                allowed
                    .iter()
                    .position(|n| n.trim().eq_ignore_ascii_case(a.name.trim()))
                    .unwrap_or(usize::MAX)
            });
        }

        self.combine(included.into_iter().map(|a| self.area_stats(a)))
    }

    /// Combines already-filtered per-area stats: counts are summed and base
    /// depth follows the configured rule.
    pub fn combine<I>(&self, parts: I) -> PartialStats
    where
        I: IntoIterator<Item = PartialStats>,
    {
        let parts = parts.into_iter().collect::<Vec<_>>();
        let base_depth = self.base_depth.pick(parts.iter().map(|p| p.base_depth));
        let mut merged = PartialStats::merge(parts);
        merged.base_depth = base_depth;
        merged
    }
}

// ============================================================================
// Tests
// ============================================================================
