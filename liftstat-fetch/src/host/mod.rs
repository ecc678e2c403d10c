//! Host APIs for liftstat fetch strategies.
//!
//! - [`http`] - HTTP client with tracing, retries and status checking

pub mod http;

pub use http::{BROWSER_USER_AGENT, HttpClient, redact_url};
