//! Canonical stats types.
//!
//! - [`Counts`] - an open/total pair
//! - [`StatsRecord`] - the canonical per-resort record every strategy produces
//! - [`PartialStats`] - a record with every field optional, used while merging

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Counts
// ============================================================================

/// An open/total pair (lifts, trails, acres, parks).
///
/// Producers go through [`Counts::new`], which keeps `open <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counts {
    /// Units currently open.
    pub open: u32,
    /// Units in total.
    pub total: u32,
}

impl Counts {
    /// Creates a pair, clamping `open` to `total`.
    pub fn new(open: u32, total: u32) -> Self {
        Self {
            open: open.min(total),
            total,
        }
    }

    /// Counts a sequence of open flags: every item adds to the total, open
    /// items add to `open`.
    pub fn tally<I>(items: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        items.into_iter().fold(Self::default(), |acc, open| Self {
            open: acc.open + u32::from(open),
            total: acc.total + 1,
        })
    }

    /// Returns the number of closed units.
    pub fn closed(&self) -> u32 {
        self.total.saturating_sub(self.open)
    }

    /// Returns true when nothing is counted.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns true when `open <= total`.
    pub fn is_consistent(&self) -> bool {
        self.open <= self.total
    }

    /// Adds two pairs field by field.
    pub fn combine(self, other: Self) -> Self {
        Self::new(
            self.open.saturating_add(other.open),
            self.total.saturating_add(other.total),
        )
    }
}

impl std::ops::Add for Counts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.combine(rhs)
    }
}

impl std::fmt::Display for Counts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.open, self.total)
    }
}

// ============================================================================
// Stats Record
// ============================================================================

/// The canonical, normalized operating status of one resort.
///
/// A record whose lift and trail totals are both zero is not valid: it cannot
/// be told apart from a parsing failure, so it is reported as unavailable
/// instead. [`PartialStats::into_record`] is the gate that enforces this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    /// Open/total lifts.
    pub lifts: Counts,
    /// Open/total trails.
    pub trails: Counts,
    /// Trails marked groomed. Not bounded by `trails.total`.
    #[serde(default)]
    pub groomed: u32,
    /// Base snow depth in inches. Zero means no snow reported.
    #[serde(default)]
    pub base_depth: u32,
    /// Open/total skiable acres, when the source exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acres: Option<Counts>,
    /// Open/total terrain parks, when the source exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parks: Option<Counts>,
}

impl StatsRecord {
    /// Creates a record from lift and trail counts.
    pub fn new(lifts: Counts, trails: Counts) -> Self {
        Self {
            lifts,
            trails,
            ..Self::default()
        }
    }

    /// Sets the groomed trail count.
    pub fn with_groomed(mut self, groomed: u32) -> Self {
        self.groomed = groomed;
        self
    }

    /// Sets the base depth in inches.
    pub fn with_base_depth(mut self, inches: u32) -> Self {
        self.base_depth = inches;
        self
    }

    /// Sets the acreage counts.
    pub fn with_acres(mut self, acres: Counts) -> Self {
        self.acres = Some(acres);
        self
    }

    /// Sets the terrain park counts.
    pub fn with_parks(mut self, parks: Counts) -> Self {
        self.parks = Some(parks);
        self
    }

    /// True iff both the trail and lift totals are zero.
    pub fn is_unavailable(&self) -> bool {
        self.trails.total == 0 && self.lifts.total == 0
    }

    /// Merges full records (sums for counts, max for base depth).
    ///
    /// Returns `None` when there is nothing to merge or the merged record is
    /// unavailable.
    pub fn merge<I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = StatsRecord>,
    {
        PartialStats::merge(records.into_iter().map(PartialStats::from)).into_record()
    }

    /// Validates the record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if any pair has `open > total` or the
    /// record is unavailable.
    pub fn validate(&self) -> Result<(), CoreError> {
        let pairs = [
            ("lifts", Some(self.lifts)),
            ("trails", Some(self.trails)),
            ("acres", self.acres),
            ("parks", self.parks),
        ];
        for (name, pair) in pairs.into_iter().filter_map(|(n, p)| p.map(|p| (n, p))) {
            if !pair.is_consistent() {
                return Err(CoreError::InvalidData(format!(
                    "{name}: open {} exceeds total {}",
                    pair.open, pair.total
                )));
            }
        }
        if self.is_unavailable() {
            return Err(CoreError::InvalidData(
                "lift and trail totals are both zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamps every `open` to its `total`.
    ///
    /// Unlike `validate()`, this fixes the values instead of failing, for
    /// sources that report more open units than they list.
    pub fn sanitize(&mut self) {
        self.lifts = Counts::new(self.lifts.open, self.lifts.total);
        self.trails = Counts::new(self.trails.open, self.trails.total);
        self.acres = self.acres.map(|c| Counts::new(c.open, c.total));
        self.parks = self.parks.map(|c| Counts::new(c.open, c.total));
    }
}

// ============================================================================
// Partial Stats
// ============================================================================

/// A stats record where every field may be absent.
///
/// Extractors fill in what their source exposes; [`PartialStats::merge`]
/// combines several of them and [`PartialStats::into_record`] turns the
/// result into a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialStats {
    /// Open/total lifts.
    pub lifts: Option<Counts>,
    /// Open/total trails.
    pub trails: Option<Counts>,
    /// Groomed trails.
    pub groomed: Option<u32>,
    /// Base depth in inches.
    pub base_depth: Option<u32>,
    /// Open/total acres.
    pub acres: Option<Counts>,
    /// Open/total parks.
    pub parks: Option<Counts>,
}

impl PartialStats {
    /// Creates an empty partial record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.lifts.is_none()
            && self.trails.is_none()
            && self.groomed.is_none()
            && self.base_depth.is_none()
            && self.acres.is_none()
            && self.parks.is_none()
    }

    /// True iff neither lifts nor trails have a non-zero total.
    pub fn is_unavailable(&self) -> bool {
        self.lifts.is_none_or(|c| c.total == 0) && self.trails.is_none_or(|c| c.total == 0)
    }

    /// Merges partial records field by field.
    ///
    /// Counts (lifts, trails, groomed, acres, parks) are summed and base depth
    /// takes the maximum. A field is computed only over the inputs that
    /// provide it; a field absent from every input stays absent.
    pub fn merge<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = PartialStats>,
    {
        parts.into_iter().fold(Self::default(), |acc, part| Self {
            lifts: combine(acc.lifts, part.lifts, Counts::combine),
            trails: combine(acc.trails, part.trails, Counts::combine),
            groomed: combine(acc.groomed, part.groomed, u32::saturating_add),
            base_depth: combine(acc.base_depth, part.base_depth, u32::max),
            acres: combine(acc.acres, part.acres, Counts::combine),
            parks: combine(acc.parks, part.parks, Counts::combine),
        })
    }

    /// Converts into a canonical record.
    ///
    /// Absent lifts/trails/groomed/base depth become zero. Returns `None`
    /// when the record would be unavailable.
    pub fn into_record(self) -> Option<StatsRecord> {
        if self.is_unavailable() {
            return None;
        }
        let mut record = StatsRecord {
            lifts: self.lifts.unwrap_or_default(),
            trails: self.trails.unwrap_or_default(),
            groomed: self.groomed.unwrap_or(0),
            base_depth: self.base_depth.unwrap_or(0),
            acres: self.acres,
            parks: self.parks,
        };
        record.sanitize();
        Some(record)
    }
}

impl From<StatsRecord> for PartialStats {
    fn from(record: StatsRecord) -> Self {
        Self {
            lifts: Some(record.lifts),
            trails: Some(record.trails),
            groomed: Some(record.groomed),
            base_depth: Some(record.base_depth),
            acres: record.acres,
            parks: record.parks,
        }
    }
}

fn combine<T>(a: Option<T>, b: Option<T>, f: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

// ============================================================================
// Tests
// ============================================================================
