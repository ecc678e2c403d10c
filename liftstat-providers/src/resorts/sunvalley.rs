//! Sun Valley.
//!
//! The mountain report page carries one tab panel per mountain (Bald and
//! Dollar). Both are summed; base depth is the deeper of the two.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{AreaAggregator, BaseDepthRule, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::{debug, instrument};

use super::mountain_report::{lifts_open, panel, trails_open};
use super::{fetch_page, into_record};

/// Mountain report page.
pub const REPORT_URL: &str = "https://www.sunvalley.com/the-mountain/mountain-report";

/// Tab panels, one per mountain.
pub const TABS: [&str; 2] = ["report-bald", "report-dollar"];

/// Pattern for a depth with an inch mark followed by the "Base" label.
static BASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(\d+)(?:&#8221;|&#34;|&quot;|"|\x{201D})\s*</p>\s*</div>\s*<p[^>]*>\s*Base\s*</p>"#,
    )
    .expect("Invalid regex")
});

/// Parses one mountain's panel.
pub fn parse_panel(html: &str) -> PartialStats {
    PartialStats {
        lifts: lifts_open(html),
        trails: trails_open(html),
        base_depth: BASE.captures(html).and_then(|c| c[1].parse().ok()),
        ..PartialStats::default()
    }
}

/// Parses the full page.
pub fn parse_sunvalley(html: &str) -> PartialStats {
    let parts = TABS
        .iter()
        .filter_map(|tab| {
            let stats = parse_panel(panel(html, tab)?);
            debug!(tab = %tab, lifts = ?stats.lifts, trails = ?stats.trails, base = ?stats.base_depth, "Panel parsed");
            Some(stats)
        })
        .collect::<Vec<_>>();

    let mut stats = AreaAggregator::new()
        .base_depth(BaseDepthRule::Deepest)
        .combine(parts);
    if stats.lifts.is_some() || stats.trails.is_some() {
        stats.groomed.get_or_insert(0);
    }
    stats
}

/// Sun Valley mountain report strategy.
#[derive(Debug, Clone)]
pub struct SunValleyStrategy {
    url: String,
}

impl SunValleyStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(REPORT_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for SunValleyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for SunValleyStrategy {
    fn id(&self) -> &str {
        "sunvalley.mountain_report"
    }

    fn source(&self) -> SourceKind {
        SourceKind::MultiArea
    }

    #[instrument(skip(self, _resort, ctx), fields(url = %self.url))]
    async fn fetch(
        &self,
        _resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let html = fetch_page(&self.url, ctx).await?;
        into_record("sunvalley", parse_sunvalley(&html))
    }
}
