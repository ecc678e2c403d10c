//! Parsers for the POWDR `dor/drupal` lists.

use liftstat_core::{Counts, PartialStats};
use serde::Deserialize;

use crate::lenient;

/// A trail from `/trails`.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct PowdrTrail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub groom_status: Option<String>,
}

impl PowdrTrail {
    /// Winter alpine trails are the only ones counted.
    pub fn is_counted(&self) -> bool {
        self.season == "winter" && self.kind == "alpine_trail"
    }

    /// Groom status starts with "groomed".
    pub fn is_groomed(&self) -> bool {
        self.groom_status
            .as_deref()
            .is_some_and(|s| s.starts_with("groomed"))
    }
}

/// A lift from `/lifts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct PowdrLift {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
}

impl PowdrLift {
    /// Winter lifts other than carpets.
    pub fn is_counted(&self) -> bool {
        self.season == "winter" && self.kind != "carpet"
    }
}

/// A snow report from `/snow-reports`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowdrSnowReport {
    /// Measuring site.
    #[serde(default)]
    pub location: Option<PowdrLocation>,
    /// Base depth in inches.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub base_depth: Option<u32>,
}

/// Measuring site of a snow report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowdrLocation {
    /// Site name ("Primary" for the main one).
    #[serde(default)]
    pub name: Option<String>,
}

/// Trail counts and groomed count.
pub fn trail_stats(trails: &[PowdrTrail]) -> (Counts, u32) {
    let counted = trails.iter().filter(|t| t.is_counted()).collect::<Vec<_>>();
    let open = Counts::tally(counted.iter().map(|t| t.status == "open"));
    let groomed = u32::try_from(counted.iter().filter(|t| t.is_groomed()).count()).unwrap_or(u32::MAX);
    (open, groomed)
}

/// Lift counts.
pub fn lift_stats(lifts: &[PowdrLift]) -> Counts {
    Counts::tally(
        lifts
            .iter()
            .filter(|l| l.is_counted())
            .map(|l| l.status == "open"),
    )
}

/// Base depth of the "Primary" report, else the first one.
pub fn base_depth(reports: &[PowdrSnowReport]) -> Option<u32> {
    reports
        .iter()
        .find(|r| {
            r.location
                .as_ref()
                .and_then(|l| l.name.as_deref())
                == Some("Primary")
        })
        .or_else(|| reports.first())
        .and_then(|r| r.base_depth)
}

/// Combines whichever lists were fetched.
pub fn combine(
    trails: Option<&[PowdrTrail]>,
    lifts: Option<&[PowdrLift]>,
    snow: Option<&[PowdrSnowReport]>,
) -> PartialStats {
    let mut stats = PartialStats::new();
    if let Some(trails) = trails {
        let (counts, groomed) = trail_stats(trails);
        stats.trails = Some(counts);
        stats.groomed = Some(groomed);
    }
    if let Some(lifts) = lifts {
        stats.lifts = Some(lift_stats(lifts));
    }
    stats.base_depth = snow.and_then(base_depth);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trails() -> Vec<PowdrTrail> {
        serde_json::from_str(
            r#"[
                {"name": "Chip's Run", "season": "winter", "type": "alpine_trail", "status": "open", "groom_status": "groomed_am"},
                {"name": "Regulator", "season": "winter", "type": "alpine_trail", "status": "closed", "groom_status": null},
                {"name": "Bike Trail", "season": "summer", "type": "alpine_trail", "status": "open"},
                {"name": "Nordic", "season": "winter", "type": "nordic_trail", "status": "open", "groom_status": "groomed"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_trail_stats() {
        let (counts, groomed) = trail_stats(&trails());
        assert_eq!(counts, Counts::new(1, 2));
        assert_eq!(groomed, 1);
    }

    #[test]
    fn test_lift_stats() {
        let lifts: Vec<PowdrLift> = serde_json::from_str(
            r#"[
                {"season": "winter", "type": "tram", "status": "open"},
                {"season": "winter", "type": "chair", "status": "closed"},
                {"season": "winter", "type": "carpet", "status": "open"},
                {"season": "summer", "type": "chair", "status": "open"}
            ]"#,
        )
        .unwrap();
        assert_eq!(lift_stats(&lifts), Counts::new(1, 2));
    }

    #[test]
    fn test_base_depth_prefers_primary() {
        let reports: Vec<PowdrSnowReport> = serde_json::from_str(
            r#"[
                {"location": {"name": "Mid"}, "base_depth": "40"},
                {"location": {"name": "Primary"}, "base_depth": 72.4}
            ]"#,
        )
        .unwrap();
        assert_eq!(base_depth(&reports), Some(72));
        assert_eq!(base_depth(&reports[..1]), Some(40));
        assert_eq!(base_depth(&[]), None);
    }

    #[test]
    fn test_combine_partial() {
        let stats = combine(Some(&trails()), None, None);
        assert_eq!(stats.trails, Some(Counts::new(1, 2)));
        assert!(stats.lifts.is_none());
        assert!(stats.base_depth.is_none());
        assert!(combine(None, None, None).is_empty());
    }
}
