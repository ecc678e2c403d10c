//! Raw upstream payloads.
//!
//! The generic fallback fetches whatever a resort declares as its stats
//! endpoint. [`RawPayload::detect`] recognizes which known schema the body
//! follows and [`RawPayload::normalize`] maps it onto [`PartialStats`].

use liftstat_core::{AreaAggregator, PartialStats};
use liftstat_fetch::FetchError;
use serde_json::Value;
use tracing::debug;

use crate::mtnpowder::MtnPowderFeed;
use crate::reportpal::ReportPalReport;

/// A decoded upstream body of a known shape.
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// mtnpowder `Resorts[].SnowReport`.
    MtnPowder(MtnPowderFeed),
    /// reportpal `currentConditions` / `facilities`.
    ReportPal(ReportPalReport),
    /// Already in canonical shape (`lifts`, `trails`, `baseDepth`, ...).
    Canonical(PartialStats),
}

impl RawPayload {
    /// Returns the variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MtnPowder(_) => "mtnpowder",
            Self::ReportPal(_) => "reportpal",
            Self::Canonical(_) => "canonical",
        }
    }

    /// Recognizes the schema of a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidResponse` for an unknown shape and
    /// `FetchError::Json` when a recognized shape does not decode.
    pub fn detect(value: Value) -> Result<Self, FetchError> {
        let Some(object) = value.as_object() else {
            return Err(FetchError::InvalidResponse(
                "payload is not a JSON object".to_string(),
            ));
        };
        let is_mtnpowder = object.contains_key("Resorts");
        let is_reportpal =
            object.contains_key("currentConditions") || object.contains_key("facilities");
        let is_canonical = ["lifts", "trails"]
            .iter()
            .any(|k| object.get(*k).is_some_and(Value::is_object));
        let keys = object.keys().take(5).cloned().collect::<Vec<_>>().join(", ");

        let payload = if is_mtnpowder {
            Self::MtnPowder(serde_json::from_value(value)?)
        } else if is_reportpal {
            Self::ReportPal(serde_json::from_value(value)?)
        } else if is_canonical {
            Self::Canonical(serde_json::from_value(value)?)
        } else {
            return Err(FetchError::InvalidResponse(format!(
                "unrecognized payload (keys: {keys})"
            )));
        };

        debug!(kind = payload.kind(), "Detected payload");
        Ok(payload)
    }

    /// Parses and detects a body.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Json` when the body is not JSON, otherwise as
    /// [`RawPayload::detect`].
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        Self::detect(serde_json::from_str(body)?)
    }

    /// Maps the payload onto partial stats.
    pub fn normalize(&self) -> PartialStats {
        match self {
            Self::MtnPowder(feed) => feed
                .report_for(None)
                .map(|r| r.to_stats())
                .unwrap_or_default(),
            Self::ReportPal(report) => report
                .summary()
                .or_else(|| report.area_stats(&AreaAggregator::new()))
                .unwrap_or_default(),
            Self::Canonical(stats) => stats.clone(),
        }
    }
}
