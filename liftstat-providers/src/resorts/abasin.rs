//! Arapahoe Basin.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::instrument;

use super::{fetch_page, into_record};

/// Snow report page.
pub const REPORT_URL: &str = "https://www.arapahoebasin.com/snow-report/";

/// Pattern for the open runs summary block.
static OPEN_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<h5>(\d+)<span>/(\d+)</span></h5>\s*<p>Open Runs</p>").expect("Invalid regex")
});

/// Pattern for the open lifts summary block.
static OPEN_LIFTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<h5>(\d+)<span>/(\d+)</span></h5>\s*<p>Open Lifts</p>").expect("Invalid regex")
});

/// Pattern for the base depth.
static BASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\d+)"\s*<span>Base</span>"#).expect("Invalid regex"));

fn summary(pattern: &Regex, html: &str) -> Counts {
    pattern
        .captures(html)
        .and_then(|c| Some(Counts::new(c[1].parse().ok()?, c[2].parse().ok()?)))
        .unwrap_or_default()
}

/// Parses the snow report page. Groomed is the number of grooming icons.
pub fn parse_abasin(html: &str) -> PartialStats {
    PartialStats {
        lifts: Some(summary(&OPEN_LIFTS, html)),
        trails: Some(summary(&OPEN_RUNS, html)),
        groomed: Some(u32::try_from(html.matches("grooming-icon").count()).unwrap_or(u32::MAX)),
        base_depth: Some(
            BASE.captures(html)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0),
        ),
        ..PartialStats::default()
    }
}

/// Arapahoe Basin snow report strategy.
#[derive(Debug, Clone)]
pub struct AbasinStrategy {
    url: String,
}

impl AbasinStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(REPORT_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for AbasinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for AbasinStrategy {
    fn id(&self) -> &str {
        "abasin.snow_report"
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
        into_record("abasin", parse_abasin(&html))
    }
}
