//! POWDR strategy.

use async_trait::async_trait;
use liftstat_core::{ResortDescriptor, StatsProvider, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::parser::{PowdrLift, PowdrSnowReport, PowdrTrail, combine};
use crate::request::json_headers;

const TRAILS_PATH: &str = "/api/v1/dor/drupal/trails";
const SNOW_PATH: &str = "/api/v1/dor/drupal/snow-reports";
const LIFTS_PATH: &str = "/api/v1/dor/drupal/lifts";

async fn fetch_list<T: DeserializeOwned>(
    api: &Url,
    path: &str,
    ctx: &FetchContext,
) -> Result<Vec<T>, FetchError> {
    let url = api
        .join(path)
        .map_err(|e| FetchError::InvalidResponse(format!("{api}{path}: {e}")))?;
    ctx.http.get_json(&url, json_headers()).await
}

fn settled<T>(label: &str, result: Result<Vec<T>, FetchError>) -> Option<Vec<T>> {
    match result {
        Ok(list) => Some(list),
        Err(error) => {
            warn!(list = label, category = %error.category(), error = %error, "POWDR list failed");
            None
        }
    }
}

/// Reads trails, snow reports and lifts from the resort's `api` host.
///
/// The three lists are fetched concurrently; the strategy only fails when
/// all three do.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowdrStrategy;

impl PowdrStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatsStrategy for PowdrStrategy {
    fn id(&self) -> &str {
        "powdr.dor"
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
        let api = StatsProvider::Powdr
            .endpoint(resort)
            .ok_or_else(|| FetchError::MissingEndpoint(resort.id.clone()))?;

        let (trails, snow, lifts) = tokio::join!(
            fetch_list::<PowdrTrail>(api, TRAILS_PATH, ctx),
            fetch_list::<PowdrSnowReport>(api, SNOW_PATH, ctx),
            fetch_list::<PowdrLift>(api, LIFTS_PATH, ctx),
        );
        let trails = settled("trails", trails);
        let snow = settled("snow-reports", snow);
        let lifts = settled("lifts", lifts);

        if trails.is_none() && snow.is_none() && lifts.is_none() {
            return Err(FetchError::NoData("every POWDR list failed".to_string()));
        }

        let stats = combine(trails.as_deref(), lifts.as_deref(), snow.as_deref());
        debug!(trails = ?stats.trails, lifts = ?stats.lifts, base = ?stats.base_depth, "POWDR totals");
        stats
            .into_record()
            .ok_or_else(|| FetchError::NoData("no winter lifts or trails".to_string()))
    }
}
