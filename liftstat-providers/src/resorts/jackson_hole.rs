//! Jackson Hole.

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use serde::Deserialize;
use tracing::instrument;

use super::{fetch_json, into_record};
use crate::lenient;

/// Status API.
pub const API_URL: &str = "https://jacksonhole-prod.zaneray.com/api/all.json";

/// The parts of `all.json` that carry stats.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct AllStatus {
    #[serde(default)]
    pub trail_status: Option<TrailStatus>,
    #[serde(default)]
    pub lift_status: Option<LiftStatus>,
    #[serde(default)]
    pub snow: Option<Snow>,
}

/// Trail summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TrailStatus {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub open_trails: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_trails: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub groomed_trails: Option<u32>,
}

/// Lift summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct LiftStatus {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub open_lifts: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_lifts: Option<u32>,
}

/// Snow block; only the mid-mountain depth is read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Snow {
    #[serde(default)]
    pub mid_mountain: Option<SnowSite>,
}

/// One snow measuring site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SnowSite {
    #[serde(default)]
    pub total_snow_depth: Option<Measurement>,
}

/// A measured value.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct Measurement {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub value: Option<u32>,
}

impl AllStatus {
    /// Converts the status into partial stats.
    pub fn to_stats(&self) -> PartialStats {
        let trails = self.trail_status.clone().unwrap_or_default();
        let lifts = self.lift_status.clone().unwrap_or_default();
        let depth = self
            .snow
            .as_ref()
            .and_then(|s| s.mid_mountain.as_ref())
            .and_then(|m| m.total_snow_depth.as_ref())
            .and_then(|d| d.value);

        PartialStats {
            lifts: Some(Counts::new(
                lifts.open_lifts.unwrap_or(0),
                lifts.total_lifts.unwrap_or(0),
            )),
            trails: Some(Counts::new(
                trails.open_trails.unwrap_or(0),
                trails.total_trails.unwrap_or(0),
            )),
            groomed: Some(trails.groomed_trails.unwrap_or(0)),
            base_depth: Some(depth.unwrap_or(0)),
            ..PartialStats::default()
        }
    }
}

/// Jackson Hole API strategy.
#[derive(Debug, Clone)]
pub struct JacksonHoleStrategy {
    url: String,
}

impl JacksonHoleStrategy {
    /// Creates the strategy for the public API.
    pub fn new() -> Self {
        Self::with_url(API_URL)
    }

    /// Creates the strategy for another API location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for JacksonHoleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for JacksonHoleStrategy {
    fn id(&self) -> &str {
        "jackson-hole.api"
    }

    fn source(&self) -> SourceKind {
        SourceKind::JsonFeed
    }

    #[instrument(skip(self, _resort, ctx), fields(url = %self.url))]
    async fn fetch(
        &self,
        _resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let status: AllStatus = fetch_json(&self.url, ctx).await?;
        into_record("jackson-hole", status.to_stats())
    }
}
