//! Alta.
//!
//! The lift and terrain status page assigns its data to `window.Alta` in an
//! inline script.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{fetch_page, into_record};
use crate::lenient;

/// Lift and terrain status page.
pub const STATUS_URL: &str = "https://www.alta.com/lift-terrain-status";

/// Pattern for the embedded data object.
static WINDOW_ALTA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.Alta\s*=\s*(\{[\s\S]*?\});\s*</script>").expect("Invalid regex")
});

fn pair(node: Option<&Value>) -> Counts {
    let field = |key: &str| node.and_then(|n| n.get(key)).and_then(lenient::value_u32);
    Counts::new(field("open").unwrap_or(0), field("total").unwrap_or(0))
}

/// Parses the status page.
///
/// # Errors
///
/// Returns `FetchError::InvalidResponse` when the page has no data object
/// and `FetchError::Json` when the object does not decode.
pub fn parse_alta(html: &str) -> Result<PartialStats, FetchError> {
    let caps = WINDOW_ALTA
        .captures(html)
        .ok_or_else(|| FetchError::InvalidResponse("window.Alta not found".to_string()))?;
    let data: Value = serde_json::from_str(&caps[1])?;
    debug!(len = caps[1].len(), "Decoded window.Alta");

    let operations = data.get("operations");
    Ok(PartialStats {
        lifts: Some(pair(operations.and_then(|o| o.get("lifts")))),
        trails: Some(pair(operations.and_then(|o| o.get("runs")))),
        groomed: Some(0),
        base_depth: Some(
            data.pointer("/conditions/base_depth")
                .and_then(lenient::value_rounded)
                .unwrap_or(0),
        ),
        ..PartialStats::default()
    })
}

/// Alta status page strategy.
#[derive(Debug, Clone)]
pub struct AltaStrategy {
    url: String,
}

impl AltaStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(STATUS_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for AltaStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for AltaStrategy {
    fn id(&self) -> &str {
        "alta.status_page"
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
        into_record("alta", parse_alta(&html)?)
    }
}
