//! Operating status of individual lifts and trails.
//!
//! Sources spell statuses many ways ("Open", "OPEN", "open", "Hold",
//! "Expected", ...). [`OperatingStatus::coerce`] folds them into one enum so
//! tallying only ever asks [`OperatingStatus::is_open`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Operating Status
// ============================================================================

/// Normalized status of a lift or trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperatingStatus {
    /// Running / skiable right now.
    Open,
    /// Temporarily stopped (wind hold, mechanical).
    Hold,
    /// Expected to open later today.
    Scheduled,
    /// Closed, or a status the source did not explain.
    #[default]
    Closed,
}

impl OperatingStatus {
    /// Folds a raw status string into a normalized status.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unrecognized is `Closed`.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" | "opened" | "o" => Self::Open,
            "hold" | "on hold" | "wind hold" | "delayed" => Self::Hold,
            "scheduled" | "expected" | "anticipated" => Self::Scheduled,
            _ => Self::Closed,
        }
    }

    /// Returns true only for `Open`.
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// Returns a lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Hold => "hold",
            Self::Scheduled => "scheduled",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OperatingStatus {
    fn from(raw: &str) -> Self {
        Self::coerce(raw)
    }
}
