//! Taos Ski Valley.
//!
//! The lifts page is a Next.js app that ships its data as flight chunks
//! (`self.__next_f.push([1,"..."])`). The chunks are decoded and joined,
//! then the snowfall, lift and slope sections are read from the stream.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_core::{Counts, PartialStats, ResortDescriptor, StatsRecord};
use liftstat_fetch::{FetchContext, FetchError, SourceKind, StatsStrategy};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{fetch_page, into_record};
use crate::lenient;

/// Lifts page.
pub const LIFTS_URL: &str = "https://www.skitaos.com/lifts";

/// Pattern for one flight data chunk.
static CHUNK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"self\.__next_f\.push\(\[1,"((?:[^"\\]|\\.)*)"\]\)"#).expect("Invalid regex")
});

/// Pattern for the snowfall object.
static SNOWFALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""snowfallData":(\{[^}]+\})"#).expect("Invalid regex"));

/// Pattern for the head of a winter list.
static WINTER_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""winter":\{"total":(\d+),"limit":\d+,"skip":\d+,"data":\["#)
        .expect("Invalid regex")
});

/// Decodes and joins the flight chunks of a page.
pub fn flight_stream(html: &str) -> String {
    CHUNK
        .captures_iter(html)
        .filter_map(|c| serde_json::from_str::<String>(&format!("\"{}\"", &c[1])).ok())
        .collect()
}

/// Returns the body of the array that starts at the beginning of `s`,
/// without its closing bracket.
fn array_body(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' if depth == 0 => return Some(&s[..i]),
            b']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Finds the winter list of a section, returning its declared total and
/// its array body.
pub fn winter_list<'a>(stream: &'a str, section: &str) -> Option<(u32, &'a str)> {
    let key = format!("\"{section}\":");
    let rest = &stream[stream.find(&key)?..];
    let caps = WINTER_LIST.captures(rest)?;
    let total = caps[1].parse().ok()?;
    let body_start = caps.get(0)?.end();
    Some((total, array_body(&rest[body_start..]).unwrap_or("")))
}

/// Base depth from the snowfall object.
pub fn snowfall_base(stream: &str) -> Option<u32> {
    let caps = SNOWFALL.captures(stream)?;
    let snowfall: Value = serde_json::from_str(&caps[1]).ok()?;
    snowfall.get("base").and_then(lenient::value_u32)
}

fn count(haystack: &str, needle: &str) -> u32 {
    u32::try_from(haystack.matches(needle).count()).unwrap_or(u32::MAX)
}

/// Parses the lifts page.
pub fn parse_taos(html: &str) -> PartialStats {
    let stream = flight_stream(html);
    debug!(stream_len = stream.len(), "Flight stream decoded");
    if stream.is_empty() {
        return PartialStats::default();
    }

    let lifts = winter_list(&stream, "liftData")
        .map(|(total, body)| Counts::new(count(body, r#""status":"open""#), total));
    let trails = winter_list(&stream, "slopeData")
        .map(|(total, body)| Counts::new(count(body, r#""open":true"#), total));

    PartialStats {
        lifts,
        trails,
        groomed: Some(0),
        base_depth: Some(snowfall_base(&stream).unwrap_or(0)),
        ..PartialStats::default()
    }
}

/// Taos flight data strategy.
#[derive(Debug, Clone)]
pub struct TaosStrategy {
    url: String,
}

impl TaosStrategy {
    /// Creates the strategy for the public page.
    pub fn new() -> Self {
        Self::with_url(LIFTS_URL)
    }

    /// Creates the strategy for another page location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for TaosStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStrategy for TaosStrategy {
    fn id(&self) -> &str {
        "taos.flight_data"
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
        into_record("taos", parse_taos(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(chunk: &str) -> String {
        let escaped = serde_json::to_string(chunk).unwrap();
        format!(
            "<script>self.__next_f.push([1,{escaped}])</script>"
        )
    }

    fn page() -> String {
        let stream = concat!(
            r#"{"snowfallData":{"base":48,"last24":3},"#,
            r#""liftData":{"winter":{"total":3,"limit":100,"skip":0,"data":["#,
            r#"{"name":"Chair 1","status":"open","tags":["a","b"]},"#,
            r#"{"name":"Chair 2","status":"closed"},"#,
            r#"{"name":"Chair 4","status":"open"}]}},"#,
            r#""slopeData":{"winter":{"total":4,"limit":100,"skip":0,"data":["#,
            r#"{"name":"Al's Run","open":true},{"name":"Longhorn","open":false},"#,
            r#"{"name":"Porcupine","open":true},{"name":"Lorelei","open":false}]}}}"#,
        );
        let (a, b) = stream.split_at(40);
        format!("<html>{}{}</html>", push(a), push(b))
    }

    #[test]
    fn test_flight_stream_joins_chunks() {
        let stream = flight_stream(&page());
        assert!(stream.starts_with(r#"{"snowfallData""#));
        assert!(stream.ends_with("]}}}"));
    }

    #[test]
    fn test_parse_taos() {
        let record = parse_taos(&page()).into_record().unwrap();
        assert_eq!(record.lifts, Counts::new(2, 3));
        assert_eq!(record.trails, Counts::new(2, 4));
        assert_eq!(record.base_depth, 48);
    }

    #[test]
    fn test_array_body_respects_nesting() {
        assert_eq!(array_body(r#"[1,[2]],3]"#), Some("[1,[2]],3"));
        assert_eq!(array_body("1,2]"), Some("1,2"));
        assert_eq!(array_body("1,2"), None);
    }

    #[test]
    fn test_page_without_chunks() {
        assert!(parse_taos("<html>static</html>").is_empty());
    }
}
