//! Printable report parser.
//!
//! Each figure sits in a table cell keyed by id, with the total in a
//! caption below it:
//!
//! ```text
//! <td id="openTrails">55<br/><div id="trails_caption">TRAILS OF 61</div></td>
//! ```

use std::sync::LazyLock;

use liftstat_core::{Counts, PartialStats};
use regex::Regex;
use tracing::debug;

/// Pattern for the number after an opening tag, skipping nested tags.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^>]*>(?:\s*<[^>/][^>]*>)*\s*(\d+)").expect("Invalid regex")
});

/// Pattern for the text directly after an opening tag.
static LEADING_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^>]*>([^<]*)").expect("Invalid regex"));

/// Pattern for "OF <n>" in a caption.
static CAPTION_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOF\s+(\d+)").expect("Invalid regex"));

/// Returns the markup following the `id="..."` attribute.
fn after_id<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let marker = format!(r#"id="{id}""#);
    html.find(&marker).map(|at| &html[at + marker.len()..])
}

fn number_for(html: &str, id: &str) -> Option<u32> {
    LEADING_NUMBER
        .captures(after_id(html, id)?)
        .and_then(|c| c[1].parse().ok())
}

fn caption_total(html: &str, caption_id: &str) -> Option<u32> {
    let text = LEADING_TEXT.captures(after_id(html, caption_id)?)?;
    CAPTION_TOTAL
        .captures(&text[1])
        .and_then(|t| t[1].parse().ok())
}

/// Reads an open figure and its caption total. A missing total is taken
/// to equal the open figure.
fn figure(html: &str, id: &str, caption_id: &str) -> Option<Counts> {
    let open = number_for(html, id)?;
    let total = caption_total(html, caption_id).unwrap_or(open);
    Some(Counts::new(open, total))
}

/// Parses a printable report page.
pub fn parse_printable(html: &str) -> PartialStats {
    debug!(len = html.len(), "Parsing printable report");
    PartialStats {
        trails: figure(html, "openTrails", "trails_caption"),
        lifts: figure(html, "openLifts", "lifts_caption"),
        acres: figure(html, "acres", "acres_caption"),
        base_depth: number_for(html, "base_total"),
        ..PartialStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"
        <table>
          <tr>
            <td id="openTrails">55<br/><div id="trails_caption">TRAILS OF 61</div></td>
            <td id="openLifts">8<br/><div id="lifts_caption">LIFTS OF 10</div></td>
            <td id="base"><span id="base_total"><text>44''</text></span></td>
            <td id="acres">435<br/><div id="acres_caption">ACRES OF 500</div></td>
          </tr>
        </table>
    "#;

    #[test]
    fn test_parse_printable() {
        let stats = parse_printable(REPORT);
        assert_eq!(stats.trails, Some(Counts::new(55, 61)));
        assert_eq!(stats.lifts, Some(Counts::new(8, 10)));
        assert_eq!(stats.acres, Some(Counts::new(435, 500)));
        assert_eq!(stats.base_depth, Some(44));
        assert!(stats.groomed.is_none());
    }

    #[test]
    fn test_missing_caption_total() {
        let stats = parse_printable(r#"<td id="openLifts">6<br/><div id="lifts_caption">LIFTS</div></td>"#);
        assert_eq!(stats.lifts, Some(Counts::new(6, 6)));
        assert!(stats.trails.is_none());
    }

    #[test]
    fn test_unrelated_page() {
        assert!(parse_printable("<html><body>Maintenance</body></html>").is_empty());
    }
}
