//! Printable report strategy.

use async_trait::async_trait;
use liftstat_core::{ResortDescriptor, StatsProvider, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use tracing::instrument;

use super::parser::parse_printable;
use crate::request::html_headers;

/// Reads the printable conditions report at the resort's `statsUrl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoyneReportStrategy;

impl BoyneReportStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatsStrategy for BoyneReportStrategy {
    fn id(&self) -> &str {
        "boyne.printable"
    }

    fn source(&self) -> SourceKind {
        SourceKind::HtmlPage
    }

    #[instrument(skip(self, ctx), fields(resort = %resort.id))]
    async fn fetch(
        &self,
        resort: &ResortDescriptor,
        ctx: &FetchContext,
    ) -> Result<StatsRecord, FetchError> {
        let url = StatsProvider::Boyne
            .endpoint(resort)
            .ok_or_else(|| FetchError::MissingEndpoint(resort.id.clone()))?;
        let html = ctx.http.get_text(url, html_headers()).await?;

        let stats = parse_printable(&html);
        if stats.is_empty() {
            return Err(FetchError::InvalidResponse(
                "no report figures on page".to_string(),
            ));
        }
        stats
            .into_record()
            .ok_or_else(|| FetchError::NoData("report lists no lifts or trails".to_string()))
    }
}
