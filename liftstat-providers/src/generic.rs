//! Generic fallback strategy.
//!
//! Last resort of the dispatcher: fetch the resort's declared stats
//! endpoint (or its status page) and normalize whatever known payload shape
//! comes back.

use async_trait::async_trait;
use liftstat_core::{ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use tracing::{debug, instrument};

use crate::payload::RawPayload;
use crate::request::json_headers;

/// Fetches `statsUrl` (else `url`) and detects the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFeedStrategy;

impl GenericFeedStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatsStrategy for GenericFeedStrategy {
    fn id(&self) -> &str {
        "generic.feed"
    }

    fn source(&self) -> SourceKind {
        SourceKind::JsonFeed
    }

    #[instrument(skip(self, ctx), fields(resort = %resort.id))]
    async fn fetch(
        &self,
        resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let url = resort
            .feed_url()
            .ok_or_else(|| FetchError::MissingEndpoint(resort.id.clone()))?;
        let body = ctx.http.get_text(url, json_headers()).await?;

        let payload = RawPayload::parse(&body)?;
        let stats = payload.normalize();
        debug!(kind = payload.kind(), lifts = ?stats.lifts, trails = ?stats.trails, "Normalized payload");
        stats
            .into_record()
            .ok_or_else(|| FetchError::NoData(format!("{} payload has no lifts or trails", payload.kind())))
    }
}
