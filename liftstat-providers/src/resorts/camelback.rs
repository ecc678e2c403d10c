//! Camelback.
//!
//! The snow report lists open counts only, as `<dt>label</dt><dd>N ...</dd>`
//! measures. Totals are fixed.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::instrument;

use super::{fetch_page, into_record};

/// Snow report page.
pub const REPORT_URL: &str = "https://conditions.camelbackresort.com/conditions/snow-report/";

/// Lifts on the mountain.
pub const LIFT_TOTAL: u32 = 9;

/// Trails on the mountain.
pub const TRAIL_TOTAL: u32 = 39;

/// Pattern for a `<dt>label</dt><dd>N` measure.
static MEASURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<dt>\s*([^<]+?)\s*</dt>\s*<dd>\s*(\d+)").expect("Invalid regex")
});

/// Returns the leading number of the measure with this label.
pub fn measure(html: &str, label: &str) -> Option<u32> {
    MEASURE
        .captures_iter(html)
        .find(|c| c[1].eq_ignore_ascii_case(label))
        .and_then(|c| c[2].parse().ok())
}

/// Parses the snow report page.
///
/// A page with neither an open lifts nor an open trails measure yields
/// nothing.
pub fn parse_camelback(html: &str) -> PartialStats {
    let lifts = measure(html, "Open Lifts");
    let trails = measure(html, "Open Trails");
    if lifts.is_none() && trails.is_none() {
        return PartialStats::default();
    }

    PartialStats {
        lifts: Some(Counts::new(lifts.unwrap_or(0), LIFT_TOTAL)),
        trails: Some(Counts::new(trails.unwrap_or(0), TRAIL_TOTAL)),
        groomed: Some(measure(html, "Grooming").unwrap_or(0)),
        base_depth: Some(measure(html, "Base Depth").unwrap_or(0)),
        ..PartialStats::default()
    }
}

/// Camelback snow report strategy.
#[derive(Debug, Clone)]
pub struct CamelbackStrategy {
    url: String,
}

impl CamelbackStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(REPORT_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for CamelbackStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for CamelbackStrategy {
    fn id(&self) -> &str {
        "camelback.snow_report"
    }

    fn source(&self) -> SourceKind {
        SourceKind::HtmlPage
    }

    #[instrument(skip(self, _resort, ctx), fields(url = %self.url))]
    async fn fetch(
        &self,
        _resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let html = fetch_page(&self.url, ctx).await?;
        into_record("camelback", parse_camelback(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <dl class="SnowReport-measure">
            <dt>Open Lifts</dt>
            <dd>7 Lifts</dd>
        </dl>
        <dl class="SnowReport-measure">
            <dt>Open Trails</dt>
            <dd>31 Trails</dd>
        </dl>
        <dl class="SnowReport-measure">
            <dt>Grooming</dt>
            <dd>18 Trails</dd>
        </dl>
        <dl class="SnowReport-measure">
            <dt>Base Depth</dt>
            <dd>16 - 60 in.</dd>
        </dl>
    "#;

    #[test]
    fn test_parse_camelback() {
        let record = parse_camelback(PAGE).into_record().unwrap();
        assert_eq!(record.lifts, Counts::new(7, LIFT_TOTAL));
        assert_eq!(record.trails, Counts::new(31, TRAIL_TOTAL));
        assert_eq!(record.groomed, 18);
        assert_eq!(record.base_depth, 16);
    }

    #[test]
    fn test_missing_measures_default_to_zero() {
        let record = parse_camelback("<dt>Open Trails</dt><dd>4</dd>")
            .into_record()
            .unwrap();
        assert_eq!(record.lifts, Counts::new(0, LIFT_TOTAL));
        assert_eq!(record.trails, Counts::new(4, TRAIL_TOTAL));
        assert_eq!(record.groomed, 0);
        assert_eq!(record.base_depth, 0);
    }

    #[test]
    fn test_page_without_measures() {
        assert!(parse_camelback("<html>Opening soon</html>").is_empty());
    }
}
