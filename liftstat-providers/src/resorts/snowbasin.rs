//! Snowbasin.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::instrument;

use super::mountain_report::{lifts_open, trails_open};
use super::{fetch_page, into_record};

/// Mountain report page.
pub const REPORT_URL: &str = "https://www.snowbasin.com/the-mountain/mountain-report/";

/// Pattern for the "Base" depth heading.
static BASE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<p[^>]*class="[^"]*mc__h4[^"]*"[^>]*>\s*Base\s*</p>"#).expect("Invalid regex")
});

/// Pattern for an element whose class list contains `mc__num`, and its number.
static DEPTH_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="(?:[^"]*\s)?mc__num(?:\s[^"]*)?"[^>]*>\s*(\d+)"#).expect("Invalid regex")
});

/// Base depth: the last `mc__num` figure before the "Base" heading.
pub fn base_depth(html: &str) -> Option<u32> {
    let heading = BASE_HEADING.find(html)?;
    DEPTH_NUMBER
        .captures_iter(&html[..heading.start()])
        .last()
        .and_then(|c| c[1].parse().ok())
}

/// Parses the mountain report page.
pub fn parse_snowbasin(html: &str) -> PartialStats {
    PartialStats {
        lifts: lifts_open(html),
        trails: trails_open(html),
        base_depth: base_depth(html),
        ..PartialStats::default()
    }
}

/// Snowbasin mountain report strategy.
#[derive(Debug, Clone)]
pub struct SnowbasinStrategy {
    url: String,
}

impl SnowbasinStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(REPORT_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for SnowbasinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for SnowbasinStrategy {
    fn id(&self) -> &str {
        "snowbasin.mountain_report"
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
        into_record("snowbasin", parse_snowbasin(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftstat_core::Counts;

    const PAGE: &str = r#"
        <p class="mc__heading mc__h3">Trails Open</p>
        <div><span class="mc__num-lg">71 /</span> 115</div>
        <p class="mc__heading mc__h3">Lifts Open</p>
        <div><span class="mc__num-lg">12 /</span> 13</div>
        <div class="mc__col">
            <p class="mc__num">12"</p>
            <p class="mc__heading mc__h4">24 Hours</p>
        </div>
        <div class="mc__col">
            <p class="mc__num mc__num--depth">61"</p>
            <p class="mc__heading mc__h4">Base</p>
        </div>
    "#;

    #[test]
    fn test_parse_snowbasin() {
        let stats = parse_snowbasin(PAGE);
        assert_eq!(stats.trails, Some(Counts::new(71, 115)));
        assert_eq!(stats.lifts, Some(Counts::new(12, 13)));
        assert_eq!(stats.base_depth, Some(61));
        assert!(stats.groomed.is_none());
    }

    #[test]
    fn test_large_figures_are_not_depths() {
        let html = r#"<span class="mc__num-lg">71 /</span><p class="mc__heading mc__h4">Base</p>"#;
        assert_eq!(base_depth(html), None);
    }

    #[test]
    fn test_missing_base_heading() {
        assert_eq!(base_depth(r#"<p class="mc__num">40"</p>"#), None);
    }
}
