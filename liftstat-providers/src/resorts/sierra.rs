//! Sierra-at-Tahoe.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::instrument;

use super::{fetch_page, into_record};

/// Weather and snow report page.
pub const REPORT_URL: &str = "https://sierraattahoe.com/weather-snow-report/";

static LIFTS: LazyLock<Regex> = LazyLock::new(|| status_pattern("Lifts Open"));

static RUNS: LazyLock<Regex> = LazyLock::new(|| status_pattern("Runs Open"));

static GROOMED: LazyLock<Regex> = LazyLock::new(|| status_pattern("Runs Groomed"));

/// Pattern for the summit and base figures after the "Depth" label.
static DEPTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)>\s*Depth\s*<[\s\S]*?font-weight:\s*1000[^>]*>(\d+)&#8243;[\s\S]*?font-weight:\s*1000[^>]*>(\d+)&#8243;",
    )
    .expect("Invalid regex")
});

/// `<em>N</em>...<span class="status-total">/M</span>` following a label.
fn status_pattern(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?i){label}[\s\S]*?<em>(\d+)</em>[\s\S]*?status-total[^>]*>/(\d+)"
    ))
    .expect("Invalid regex")
}

fn status(pattern: &Regex, html: &str) -> Option<Counts> {
    let caps = pattern.captures(html)?;
    Some(Counts::new(caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Parses the snow report page. Base depth is the second depth figure; the
/// first is the summit.
pub fn parse_sierra(html: &str) -> PartialStats {
    PartialStats {
        lifts: status(&LIFTS, html),
        trails: status(&RUNS, html),
        groomed: status(&GROOMED, html).map(|c| c.open),
        base_depth: DEPTH.captures(html).and_then(|c| c[2].parse().ok()),
        ..PartialStats::default()
    }
}

/// Sierra-at-Tahoe snow report strategy.
#[derive(Debug, Clone)]
pub struct SierraStrategy {
    url: String,
}

impl SierraStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(REPORT_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for SierraStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for SierraStrategy {
    fn id(&self) -> &str {
        "sierra.snow_report"
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
        into_record("sierra", parse_sierra(&html))
    }
}
