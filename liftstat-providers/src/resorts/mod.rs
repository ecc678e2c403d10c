//! Resort-specific extractors.
//!
//! Each resort here publishes its numbers in a shape no provider family
//! covers: an HTML status page, a JSON blob embedded in a page, or a
//! resort-run API. Every extractor keeps its fetch separate from a pure
//! `parse_*` function so page fixtures can be tested without a network.

pub mod abasin;
pub mod alta;
pub mod alyeska;
pub mod camelback;
pub mod jackson_hole;
pub mod mountain_report;
pub mod sierra;
pub mod snowbasin;
pub mod snowmass;
pub mod sunvalley;
pub mod taos;

pub use abasin::AbasinStrategy;
pub use alta::AltaStrategy;
pub use alyeska::AlyeskaStrategy;
pub use camelback::CamelbackStrategy;
pub use jackson_hole::JacksonHoleStrategy;
pub use sierra::SierraStrategy;
pub use snowbasin::SnowbasinStrategy;
pub use snowmass::SnowmassStrategy;
pub use sunvalley::SunValleyStrategy;
pub use taos::TaosStrategy;

use liftstat_core::{PartialStats, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError};

use crate::request::{endpoint, html_headers, json_headers};

/// Fetches an HTML page.
pub(crate) async fn fetch_page(url: &str, ctx: &FetchContext) -> Result<String, FetchError> {
    let url = endpoint(url)?;
    Ok(ctx.http.get_text(&url, html_headers()).await?)
}

/// Fetches and decodes a JSON document.
pub(crate) async fn fetch_json<T: serde::de::DeserializeOwned>(
    url: &str,
    ctx: &FetchContext,
) -> Result<T, FetchError> {
    let url = endpoint(url)?;
    ctx.http.get_json(&url, json_headers()).await
}

/// Turns parsed stats into a record, naming the resort when it is empty.
pub(crate) fn into_record(resort: &str, stats: PartialStats) -> Result<StatsRecord, FetchError> {
    stats
        .into_record()
        .ok_or_else(|| FetchError::NoData(format!("{resort} reports no lifts or trails")))
}
