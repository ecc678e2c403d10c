//! Aspen Snowmass.
//!
//! Four mountains, one feed each. The feeds are fetched concurrently and
//! summed; base depth is the deepest of the four.

use async_trait::async_trait;
use liftstat_core::{AreaAggregator, BaseDepthRule, Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy, all_failed, settle_all};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{fetch_json, into_record};
use crate::lenient;

/// Feed URL; the mountain name is appended.
pub const FEED_URL: &str = "https://www.aspensnowmass.com/AspenSnowmass/SnowReport/Feed?mountain=";

/// Mountains in feed order.
pub const MOUNTAINS: [&str; 4] = ["Snowmass", "AspenMountain", "AspenHighlands", "Buttermilk"];

fn pair(node: Option<&Value>) -> Counts {
    // `openCount`/`totalCount` win over `open`/`total` when non-zero.
    let field = |counted: &str, plain: &str| {
        let n = node?;
        n.get(counted)
            .and_then(lenient::value_u32)
            .filter(|v| *v > 0)
            .or_else(|| n.get(plain).and_then(lenient::value_u32))
    };
    Counts::new(
        field("openCount", "open").unwrap_or(0),
        field("totalCount", "total").unwrap_or(0),
    )
}

/// Parses one mountain's feed.
pub fn parse_mountain(feed: &Value) -> PartialStats {
    PartialStats {
        lifts: Some(pair(feed.get("lifts"))),
        trails: Some(pair(feed.get("trails"))),
        base_depth: Some(
            feed.pointer("/snowBase/inches")
                .and_then(lenient::value_u32)
                .unwrap_or(0),
        ),
        ..PartialStats::default()
    }
}

/// Sums the mountains that answered.
pub fn combine_mountains(feeds: &[Option<Value>]) -> PartialStats {
    let mut stats = AreaAggregator::new()
        .base_depth(BaseDepthRule::Deepest)
        .combine(feeds.iter().flatten().map(parse_mountain));
    stats.groomed = Some(0);
    stats
}

/// Aspen Snowmass multi-mountain strategy.
#[derive(Debug, Clone)]
pub struct SnowmassStrategy {
    feed_url: String,
}

impl SnowmassStrategy {
    /// Creates the strategy for the public feeds.
    pub fn new() -> Self {
        Self::with_feed_url(FEED_URL)
    }

    /// Creates the strategy for another feed location.
    pub fn with_feed_url(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
        }
    }
}

impl Default for SnowmassStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for SnowmassStrategy {
    fn id(&self) -> &str {
        "snowmass.feeds"
    }

    fn source(&self) -> SourceKind {
        SourceKind::MultiArea
    }

    #[instrument(skip(self, _resort, ctx))]
    async fn fetch(
        &self,
        _resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let urls = MOUNTAINS.map(|mountain| format!("{}{mountain}", self.feed_url));
        let feeds = settle_all(
            MOUNTAINS
                .iter()
                .zip(urls.iter())
                .map(|(mountain, url)| (*mountain, fetch_json::<Value>(url, ctx))),
        )
        .await;

        if all_failed(&feeds) {
            return Err(FetchError::NoData("every mountain feed failed".to_string()));
        }

        let stats = combine_mountains(&feeds);
        debug!(lifts = ?stats.lifts, trails = ?stats.trails, base = ?stats.base_depth, "Mountains combined");
        into_record("snowmass", stats)
    }
}
