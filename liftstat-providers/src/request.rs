//! Request helpers shared by the extractors.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use url::Url;

use liftstat_fetch::HttpError;

/// Parses a configured endpoint.
///
/// # Errors
///
/// Returns `HttpError::InvalidUrl` if the string is not an absolute URL.
pub fn endpoint(raw: &str) -> Result<Url, HttpError> {
    Url::parse(raw).map_err(|e| HttpError::InvalidUrl(format!("{raw}: {e}")))
}

/// Headers for JSON APIs.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Headers for HTML pages.
pub fn html_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
    headers
}

/// JSON headers plus a referer, for feeds that check where requests come from.
pub fn json_headers_with_referer(referer: &str) -> HeaderMap {
    let mut headers = json_headers();
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        assert!(endpoint("https://www.alta.com/lift-terrain-status").is_ok());
        assert!(matches!(
            endpoint("/relative/path"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_referer_header() {
        let headers = json_headers_with_referer("https://example.com/");
        assert_eq!(headers[REFERER], "https://example.com/");
        assert_eq!(headers[ACCEPT], "application/json");
    }
}
