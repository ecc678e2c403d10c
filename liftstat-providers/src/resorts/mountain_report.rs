//! Shared parsing for `mc__` mountain report pages.
//!
//! Several resorts run the same mountain report template. Counts appear as
//!
//! ```text
//! <p class="mc__heading mc__h3">Trails Open</p>
//! ... <span class="mc__num-lg">71 /</span> 115
//! ```
//!
//! and multi-mountain pages wrap each mountain in a `mc__tab` panel keyed by
//! `data-tab`.

use std::sync::LazyLock;

use liftstat_core::Counts;
use regex::Regex;

/// Pattern for the trails open figure.
static TRAILS_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Trails Open<[\s\S]*?mc__num-lg[^>]*>\s*(\d+)\s*/</span>\s*(\d+)")
        .expect("Invalid regex")
});

/// Pattern for the lifts open figure.
static LIFTS_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Lifts Open<[\s\S]*?mc__num-lg[^>]*>\s*(\d+)\s*/</span>\s*(\d+)")
        .expect("Invalid regex")
});

/// Pattern for the opening tag of a tab panel.
static PANEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class="mc__tab[^"]*"[^>]*data-tab="([^"]+)">"#).expect("Invalid regex")
});

fn counts(pattern: &Regex, html: &str) -> Option<Counts> {
    let caps = pattern.captures(html)?;
    Some(Counts::new(caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Trails open / total.
pub fn trails_open(html: &str) -> Option<Counts> {
    counts(&TRAILS_OPEN, html)
}

/// Lifts open / total.
pub fn lifts_open(html: &str) -> Option<Counts> {
    counts(&LIFTS_OPEN, html)
}

/// Splits a page into its tab panels.
///
/// Each panel runs from its opening tag to the next panel's opening tag, or
/// to the end of the page.
pub fn panels(html: &str) -> Vec<(&str, &str)> {
    let starts = PANEL
        .captures_iter(html)
        .filter_map(|c| Some((c.get(0)?.start(), c.get(1)?.as_str())))
        .collect::<Vec<_>>();

    starts
        .iter()
        .enumerate()
        .map(|(i, (start, tab))| {
            let end = starts.get(i + 1).map_or(html.len(), |(next, _)| *next);
            (*tab, &html[*start..end])
        })
        .collect()
}

/// Returns the panel for a tab.
pub fn panel<'a>(html: &'a str, tab: &str) -> Option<&'a str> {
    panels(html)
        .into_iter()
        .find(|(name, _)| *name == tab)
        .map(|(_, body)| body)
}
