//! mtnpowder feed client.

use std::sync::Arc;

use liftstat_fetch::{FetchContext, FetchError, redact_url};
use tracing::{debug, instrument};
use url::Url;

use super::handshake::BigBearHandshake;
use super::parser::{MtnPowderFeed, parse_feed};
use crate::request::{endpoint, json_headers_with_referer};

/// Default feed endpoint.
pub const FEED_URL: &str = "https://mtnpowder.com/feed/v3.json";

/// Referer the feed expects.
pub const FEED_REFERER: &str = "https://www.bigbearmountainresort.com/";

/// Client for the token-protected feed.
#[derive(Debug, Clone)]
pub struct MtnPowderClient {
    feed_url: String,
    referer: String,
    handshake: Arc<BigBearHandshake>,
}

impl MtnPowderClient {
    /// Creates a client for the public feed.
    pub fn new() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            referer: FEED_REFERER.to_string(),
            handshake: Arc::new(BigBearHandshake::new()),
        }
    }

    /// Points the client at a different feed endpoint.
    pub fn with_feed_url(mut self, feed_url: impl Into<String>) -> Self {
        self.feed_url = feed_url.into();
        self
    }

    /// Replaces the token handshake.
    pub fn with_handshake(mut self, handshake: BigBearHandshake) -> Self {
        self.handshake = Arc::new(handshake);
        self
    }

    /// Builds the feed request URL for a set of feed ids.
    pub fn feed_request(&self, token: &str, feed_ids: &[u32]) -> Result<Url, FetchError> {
        let mut url = endpoint(&self.feed_url)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("bearer_token", token);
            for id in feed_ids {
                query.append_pair("resortId[]", &id.to_string());
            }
        }
        Ok(url)
    }

    /// Fetches the feed for one or more ids with a cached token.
    #[instrument(skip(self, ctx))]
    pub async fn fetch(
        &self,
        feed_ids: &[u32],
        ctx: &FetchContext,
    ) -> Result<MtnPowderFeed, FetchError> {
        let token = ctx
            .credentials
            .get_or_refresh(self.handshake.as_ref(), &ctx.http)
            .await?;
        let url = self.feed_request(&token, feed_ids)?;

        let body = ctx
            .http
            .get_text(&url, json_headers_with_referer(&self.referer))
            .await?;
        let feed = parse_feed(&body)?;
        debug!(resorts = feed.resorts.len(), "Feed fetched");
        Ok(feed)
    }

    /// Fetches a feed URL that already carries its token.
    #[instrument(skip_all, fields(url = %redact_url(url)))]
    pub async fn fetch_url(&self, url: &Url, ctx: &FetchContext) -> Result<MtnPowderFeed, FetchError> {
        let body = ctx
            .http
            .get_text(url, json_headers_with_referer(&self.referer))
            .await?;
        parse_feed(&body)
    }
}

impl Default for MtnPowderClient {
    fn default() -> Self {
        Self::new()
    }
}
