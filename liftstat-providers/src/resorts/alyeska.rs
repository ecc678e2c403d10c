//! Alyeska.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::instrument;

use super::{fetch_page, into_record};

/// Winter mountain report page.
pub const REPORT_URL: &str = "https://www.alyeskaresort.com/mountain-report-winter";

/// Trail total used when the page has lift markers but no trail figure.
const TRAIL_TOTAL: u32 = 76;

/// Lift total used when the page has a trail figure but no lift markers.
const LIFT_TOTAL: u32 = 8;

/// Pattern for the `open / total` divider preceding "Trails Open".
static TRAILS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class="divider">(\d+)\s*/\s*(\d+)<[\s\S]*?Trails Open"#)
        .expect("Invalid regex")
});

/// Pattern for the heading figure preceding "Groomed".
static GROOMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)elementor-heading-title[^>]*>\s*(\d+)\s*<[\s\S]*?Groomed")
        .expect("Invalid regex")
});

/// Pattern for the first inch figure after the "Snow Depth" heading.
static BASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)Snow Depth[\s\S]*?elementor-heading-title[^>]*>\s*(\d+)["″]"#)
        .expect("Invalid regex")
});

/// Pattern for the case-insensitive hold marker.
static HOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)● HOLD").expect("Invalid regex"));

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Lift status markers as open / total. Held lifts count as not open.
pub fn lift_markers(html: &str) -> Counts {
    let open = count(html.matches("● OPEN").count());
    let closed = count(html.matches("● CLOSED").count());
    let held = count(HOLD.find_iter(html).count());
    Counts::new(open, open.saturating_add(closed).saturating_add(held))
}

/// Parses the mountain report page.
///
/// A page with neither a trail figure nor any lift marker yields nothing.
pub fn parse_alyeska(html: &str) -> PartialStats {
    let trails = TRAILS
        .captures(html)
        .and_then(|c| Some(Counts::new(c[1].parse().ok()?, c[2].parse().ok()?)));
    let lifts = lift_markers(html);
    if trails.is_none() && lifts.total == 0 {
        return PartialStats::default();
    }

    let lifts = if lifts.total == 0 {
        Counts::new(0, LIFT_TOTAL)
    } else {
        lifts
    };
    PartialStats {
        lifts: Some(lifts),
        trails: Some(trails.unwrap_or(Counts::new(0, TRAIL_TOTAL))),
        groomed: Some(
            GROOMED
                .captures(html)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0),
        ),
        base_depth: Some(
            BASE.captures(html)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0),
        ),
        ..PartialStats::default()
    }
}

/// Alyeska mountain report strategy.
#[derive(Debug, Clone)]
pub struct AlyeskaStrategy {
    url: String,
}

impl AlyeskaStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(REPORT_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for AlyeskaStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for AlyeskaStrategy {
    fn id(&self) -> &str {
        "alyeska.mountain_report"
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
        into_record("alyeska", parse_alyeska(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="elementor-widget-container">
            <h2 class="elementor-heading-title elementor-size-default">23</h2>
        </div>
        <p>Groomed Runs</p>
        <span class="divider">52 / 76</span>
        <p>Trails Open</p>
        <h3>*Snow Depth</h3>
        <h2 class="elementor-heading-title elementor-size-default">15″</h2>
        <h2 class="elementor-heading-title elementor-size-default">58″</h2>
        <h2 class="elementor-heading-title elementor-size-default">109″</h2>
        <p>Base</p><p>Middle</p><p>Top</p>
        <ul>
            <li>Aerial Tram ● OPEN</li>
            <li>Chair 6 ● OPEN</li>
            <li>Ty Chair ● OPEN</li>
            <li>Chair 4 ● CLOSED</li>
            <li>Glacier Bowl ● Hold</li>
        </ul>
    "#;

    #[test]
    fn test_parse_alyeska() {
        let record = parse_alyeska(PAGE).into_record().unwrap();
        assert_eq!(record.trails, Counts::new(52, 76));
        assert_eq!(record.lifts, Counts::new(3, 5));
        assert_eq!(record.groomed, 23);
        assert_eq!(record.base_depth, 15);
    }

    #[test]
    fn test_trails_without_lift_markers() {
        let html = r#"<span class="divider">10 / 76</span><p>Trails Open</p>"#;
        let record = parse_alyeska(html).into_record().unwrap();
        assert_eq!(record.lifts, Counts::new(0, LIFT_TOTAL));
        assert_eq!(record.trails, Counts::new(10, 76));
        assert_eq!(record.base_depth, 0);
    }

    #[test]
    fn test_markers_without_trail_figure() {
        let stats = parse_alyeska("<li>Chair 6 ● OPEN</li><li>Chair 4 ● CLOSED</li>");
        assert_eq!(stats.lifts, Some(Counts::new(1, 2)));
        assert_eq!(stats.trails, Some(Counts::new(0, TRAIL_TOTAL)));
    }

    #[test]
    fn test_unrelated_page() {
        assert!(parse_alyeska("<html>Summer operations</html>").is_empty());
    }
}
