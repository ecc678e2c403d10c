//! Strategy traits and types.
//!
//! A strategy is one way of getting stats for a resort: a resort's own
//! status page, a provider family's feed, or a generic fetch of whatever
//! endpoint the resort declares.
//!
//! Implementations return `Result` from `fetch` so they can use `?`
//! internally. Callers go through the provided `extract` method instead,
//! which is the boundary where every failure becomes "no data".

use async_trait::async_trait;
use liftstat_core::{ResortDescriptor, StatsRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use crate::context::FetchContext;
use crate::error::{FailureKind, FetchError};

// ============================================================================
// Source Kind
// ============================================================================

/// The kind of upstream a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A JSON API or feed.
    JsonFeed,
    /// An HTML page scraped with patterns.
    HtmlPage,
    /// Several per-area or per-mountain sources aggregated together.
    MultiArea,
}

impl SourceKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::JsonFeed => "JSON feed",
            Self::HtmlPage => "HTML page",
            Self::MultiArea => "multi-area",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Extraction Boundary
// ============================================================================

/// Converts a strategy result into "record or no data".
///
/// Errors are logged with their failure category. Records whose lift and
/// trail totals are both zero count as empty. Surviving records are
/// sanitized so `open <= total` holds.
pub fn settle_extraction(
    strategy_id: &str,
    result: Result<StatsRecord, FetchError>,
) -> Option<StatsRecord> {
    match result {
        Ok(record) if record.is_unavailable() => {
            warn!(
                strategy = %strategy_id,
                category = %FailureKind::Empty,
                "Strategy returned zero lift and trail totals"
            );
            None
        }
        Ok(mut record) => {
            record.sanitize();
            debug!(
                strategy = %strategy_id,
                lifts = %record.lifts,
                trails = %record.trails,
                groomed = record.groomed,
                base_depth = record.base_depth,
                "Strategy produced stats"
            );
            Some(record)
        }
        Err(error) => {
            warn!(
                strategy = %strategy_id,
                category = %error.category(),
                error = %error,
                "Strategy produced no data"
            );
            None
        }
    }
}

// ============================================================================
// Stats Strategy Trait
// ============================================================================

/// A way of producing stats for a resort.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct AltaStrategy;
///
/// #[async_trait]
/// impl StatsStrategy for AltaStrategy {
///     fn id(&self) -> &str {
///         "alta.page"
///     }
///
///     fn source(&self) -> SourceKind {
///         SourceKind::HtmlPage
///     }
///
///     async fn fetch(
///         &self,
///         _resort: &ResortDescriptor,
///         ctx: &FetchContext,
///     ) -> Result<StatsRecord, FetchError> {
///         let html = ctx.http.get_text(&ALTA_URL, HeaderMap::new()).await?;
///         parse_alta(&html)
///     }
/// }
/// ```
#[async_trait]
pub trait StatsStrategy: Send + Sync {
    /// Unique identifier (e.g., "alta.page", "reportpal.summary").
    fn id(&self) -> &str;

    /// The kind of upstream this strategy reads.
    fn source(&self) -> SourceKind;

    /// Human-readable name for this strategy.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.source())
    }

    /// Fetches and normalizes stats.
    async fn fetch(
        &self,
        resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError>;

    /// Fetches stats, turning every failure into `None`.
    async fn extract(&self, resort: &ResortDescriptor, ctx: &FetchContext) -> Option<StatsRecord> {
        settle_extraction(self.id(), self.fetch(resort, ctx).await)
    }
}

// ============================================================================
// Provider Family Trait
// ============================================================================

/// A third-party feed provider shared by many resorts.
///
/// The dispatcher recognizes a family from the shape of a resort's endpoint
/// and calls it with the feed id taken from that endpoint.
#[async_trait]
pub trait ProviderFamily: Send + Sync {
    /// Unique identifier (e.g., "mtnpowder").
    fn id(&self) -> &str;

    /// Returns the feed id if the endpoint belongs to this family.
    fn match_endpoint(&self, endpoint: &Url) -> Option<String>;

    /// Fetches and normalizes one feed.
    async fn fetch_feed(&self, feed_id: &str, ctx: &FetchContext)
    -> Result<StatsRecord, FetchError>;

    /// Fetches one feed, turning every failure into `None`.
    async fn extract_feed(&self, feed_id: &str, ctx: &FetchContext) -> Option<StatsRecord> {
        settle_extraction(self.id(), self.fetch_feed(feed_id, ctx).await)
    }
}

// ============================================================================
// Tests
// ============================================================================
