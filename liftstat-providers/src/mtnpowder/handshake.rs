//! Bearer token discovery for the mtnpowder feed.
//!
//! The feed wants a `bearer_token` query parameter. The token is published
//! by a partner resort's public site, either inline on its mountain
//! information page or inside the page's main script bundle. Discovery
//! walks those two places and falls back to a known token when neither
//! yields one.

use std::sync::LazyLock;

use async_trait::async_trait;
use liftstat_fetch::{Credential, CredentialError, CredentialOrigin, CredentialSource, HttpClient};
use regex::Regex;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::request::{endpoint, html_headers};

/// Page that embeds the token.
pub const LANDING_URL: &str = "https://www.bigbearmountainresort.com/mountain-information";

/// Token used when discovery finds nothing.
pub const FALLBACK_TOKEN: &str = "5pGMqUcRBEG4kmDJyHBPJA9kcynwUrQoGKDxlOLfVdQ";

/// Pattern for a token in the page markup.
static PAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bearer_token=([a-zA-Z0-9_-]{32,})").expect("Invalid regex"));

/// Pattern for main bundle script tags.
static MAIN_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"src="([^"]+/static/js/main\.[^"]+\.js)""#).expect("Invalid regex")
});

/// Pattern for a token assignment inside a script.
static SCRIPT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"bearer_token[:=]\s*["']?([a-zA-Z0-9_-]{32,})["']?"#).expect("Invalid regex")
});

/// Finds a token in landing page markup.
pub fn token_in_page(html: &str) -> Option<&str> {
    PAGE_TOKEN
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Finds a token in script source.
pub fn token_in_script(source: &str) -> Option<&str> {
    SCRIPT_TOKEN
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Lists the main bundle scripts referenced by a page, resolved against it.
pub fn main_scripts(html: &str, page: &Url) -> Vec<Url> {
    MAIN_SCRIPT
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .filter_map(|m| page.join(m.as_str()).ok())
        .collect()
}

/// Discovers the feed token from the partner resort's site.
#[derive(Debug, Clone)]
pub struct BigBearHandshake {
    landing: String,
    fallback: String,
}

impl BigBearHandshake {
    /// Creates a handshake against the public site.
    pub fn new() -> Self {
        Self::with_landing(LANDING_URL)
    }

    /// Creates a handshake against a different landing page.
    pub fn with_landing(landing: impl Into<String>) -> Self {
        Self {
            landing: landing.into(),
            fallback: FALLBACK_TOKEN.to_string(),
        }
    }

    /// Replaces the fallback token.
    pub fn with_fallback(mut self, token: impl Into<String>) -> Self {
        self.fallback = token.into();
        self
    }

    async fn discover(&self, http: &HttpClient) -> Result<Option<Credential>, CredentialError> {
        let landing = endpoint(&self.landing)?;
        let html = http.get_text(&landing, html_headers()).await?;

        if let Some(token) = token_in_page(&html) {
            debug!("Token found in landing page");
            return Ok(Some(Credential::new(token, CredentialOrigin::LandingPage)));
        }

        for script in main_scripts(&html, &landing) {
            match http.get_text(&script, html_headers()).await {
                Ok(source) => {
                    if let Some(token) = token_in_script(&source) {
                        debug!(script = %script, "Token found in script bundle");
                        return Ok(Some(Credential::new(token, CredentialOrigin::ScriptBundle)));
                    }
                }
                Err(e) => debug!(script = %script, error = %e, "Script fetch failed"),
            }
        }

        Ok(None)
    }
}

impl Default for BigBearHandshake {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialSource for BigBearHandshake {
    fn name(&self) -> &str {
        "mtnpowder.handshake"
    }

    #[instrument(skip(self, http), fields(landing = %self.landing))]
    async fn acquire(&self, http: &HttpClient) -> Result<Credential, CredentialError> {
        match self.discover(http).await {
            Ok(Some(credential)) => Ok(credential),
            Ok(None) => {
                warn!("No token on landing page or in script bundles");
                Ok(Credential::new(&self.fallback, CredentialOrigin::StaticFallback))
            }
            Err(e) => {
                warn!(error = %e, "Token discovery failed");
                Ok(Credential::new(&self.fallback, CredentialOrigin::StaticFallback))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "AbCdEfGhIjKlMnOpQrStUvWxYz0123456789_-";

    #[test]
    fn test_token_in_page() {
        let html = format!(r#"<iframe src="https://x/feed?bearer_token={TOKEN}&id=1">"#);
        assert_eq!(token_in_page(&html), Some(TOKEN));
        assert_eq!(token_in_page("bearer_token=short"), None);
    }

    #[test]
    fn test_token_in_script() {
        let js = format!(r#"var c={{bearer_token:"{TOKEN}",other:1}}"#);
        assert_eq!(token_in_script(&js), Some(TOKEN));
        let js = format!("bearer_token= '{TOKEN}'");
        assert_eq!(token_in_script(&js), Some(TOKEN));
    }

    #[test]
    fn test_main_scripts_resolve_against_page() {
        let page = Url::parse("https://resort.example/mountain-information").unwrap();
        let html = r#"
            <script src="/static/js/vendor.1.js"></script>
            <script src="/site/static/js/main.abc123.js"></script>
            <script src="https://cdn.example/app/static/js/main.def.js"></script>
        "#;
        let scripts = main_scripts(html, &page);
        assert_eq!(
            scripts.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec![
                "https://resort.example/site/static/js/main.abc123.js",
                "https://cdn.example/app/static/js/main.def.js",
            ]
        );
    }

    #[test]
    fn test_name() {
        assert_eq!(BigBearHandshake::new().name(), "mtnpowder.handshake");
    }
}
