//! mtnpowder strategies.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{ResortDescriptor, StatsProvider, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, ProviderFamily, SourceKind, StatsStrategy};
use regex::Regex;
use tracing::instrument;
use url::Url;

use super::api::MtnPowderClient;
use super::parser::MtnPowderFeed;

/// Pattern for a numeric feed id path segment.
static FEED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/feed/(\d+)(?:/|$)").expect("Invalid regex"));

fn single_record(feed: &MtnPowderFeed, feed_id: Option<u32>) -> Result<StatsRecord, FetchError> {
    let report = feed
        .report_for(feed_id)
        .ok_or_else(|| FetchError::NoData("feed has no snow report".to_string()))?;
    report
        .to_stats()
        .into_record()
        .ok_or_else(|| FetchError::NoData("snow report has no lifts or trails".to_string()))
}

// ============================================================================
// Family
// ============================================================================

/// The mtnpowder feed family, matched from `/feed/<id>/` endpoints.
#[derive(Debug, Clone, Default)]
pub struct MtnPowderFamily {
    client: MtnPowderClient,
}

impl MtnPowderFamily {
    /// Creates the family with the public feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the family with a custom client.
    pub fn with_client(client: MtnPowderClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderFamily for MtnPowderFamily {
    fn id(&self) -> &str {
        "mtnpowder"
    }

    fn match_endpoint(&self, endpoint: &Url) -> Option<String> {
        FEED_ID
            .captures(endpoint.path())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    #[instrument(skip(self, ctx))]
    async fn fetch_feed(
        &self,
        feed_id: &str,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let id: u32 = feed_id
            .parse()
            .map_err(|_| FetchError::InvalidResponse(format!("feed id {feed_id:?}")))?;
        let feed = self.client.fetch(&[id], ctx).await?;
        single_record(&feed, Some(id))
    }
}

// ============================================================================
// Resort Strategies
// ============================================================================

/// Reads the feed at a resort's `statsUrl`.
#[derive(Debug, Clone, Default)]
pub struct MtnPowderFeedStrategy {
    client: MtnPowderClient,
}

impl MtnPowderFeedStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStrategy for MtnPowderFeedStrategy {
    fn id(&self) -> &str {
        "mtnpowder.stats_url"
    }

    fn source(&self) -> SourceKind {
        SourceKind::JsonFeed
    }

    async fn fetch(
        &self,
        resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let url = StatsProvider::MtnPowder
            .endpoint(resort)
            .ok_or_else(|| FetchError::MissingEndpoint(resort.id.clone()))?;
        let feed = self.client.fetch_url(url, ctx).await?;
        single_record(&feed, None)
    }
}

/// Reads one fixed feed id through the token-protected feed.
#[derive(Debug, Clone)]
pub struct MtnPowderResortStrategy {
    id: String,
    feed_id: u32,
    client: MtnPowderClient,
}

impl MtnPowderResortStrategy {
    /// Creates a strategy for a feed id.
    pub fn new(feed_id: u32) -> Self {
        Self::with_client(feed_id, MtnPowderClient::new())
    }

    /// Creates a strategy with a custom client.
    pub fn with_client(feed_id: u32, client: MtnPowderClient) -> Self {
        Self {
            id: format!("mtnpowder.resort#{feed_id}"),
            feed_id,
            client,
        }
    }
}

#[async_trait]
impl StatsStrategy for MtnPowderResortStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> SourceKind {
        SourceKind::JsonFeed
    }

    async fn fetch(
        &self,
        _resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let feed = self.client.fetch(&[self.feed_id], ctx).await?;
        single_record(&feed, Some(self.feed_id))
    }
}

/// Sums several feed ids fetched in one request, keeping the deepest base.
#[derive(Debug, Clone)]
pub struct MtnPowderGroupStrategy {
    id: String,
    feed_ids: Vec<u32>,
    client: MtnPowderClient,
}

impl MtnPowderGroupStrategy {
    /// Creates a group strategy.
    pub fn new(name: &str, feed_ids: Vec<u32>) -> Self {
        Self::with_client(name, feed_ids, MtnPowderClient::new())
    }

    /// Creates a group strategy with a custom client.
    pub fn with_client(name: &str, feed_ids: Vec<u32>, client: MtnPowderClient) -> Self {
        Self {
            id: format!("mtnpowder.group#{name}"),
            feed_ids,
            client,
        }
    }

    /// Feed ids in request order.
    pub fn feed_ids(&self) -> &[u32] {
        &self.feed_ids
    }
}

#[async_trait]
impl StatsStrategy for MtnPowderGroupStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> SourceKind {
        SourceKind::MultiArea
    }

    async fn fetch(
        &self,
        _resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let feed = self.client.fetch(&self.feed_ids, ctx).await?;
        feed.combined_stats()
            .into_record()
            .ok_or_else(|| FetchError::NoData("group feed has no lifts or trails".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_matches_feed_paths() {
        let family = MtnPowderFamily::new();
        let url = |s: &str| Url::parse(s).unwrap();

        assert_eq!(
            family.match_endpoint(&url("https://api.example/feed/57/")),
            Some("57".to_string())
        );
        assert_eq!(
            family.match_endpoint(&url("https://api.example/v2/feed/173")),
            Some("173".to_string())
        );
        assert_eq!(
            family.match_endpoint(&url("https://api.example/feed/v3.json")),
            None
        );
        assert_eq!(
            family.match_endpoint(&url("https://api.example/feed/12abc/")),
            None
        );
        assert_eq!(family.match_endpoint(&url("https://api.example/")), None);
    }

    #[test]
    fn test_strategy_ids() {
        assert_eq!(MtnPowderFamily::new().id(), "mtnpowder");
        assert_eq!(MtnPowderFeedStrategy::new().id(), "mtnpowder.stats_url");
        assert_eq!(MtnPowderResortStrategy::new(57).id(), "mtnpowder.resort#57");

        let group = MtnPowderGroupStrategy::new("bear-mountain", vec![173, 58, 57]);
        assert_eq!(group.id(), "mtnpowder.group#bear-mountain");
        assert_eq!(group.feed_ids(), &[173, 58, 57]);
        assert_eq!(group.source(), SourceKind::MultiArea);
    }
}
