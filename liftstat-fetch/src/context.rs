//! Fetch context shared by all strategies.
//!
//! The context bundles the HTTP client, the credential cache and the fetch
//! settings. One context serves every resolution in a process run.

use std::sync::Arc;
use std::time::Duration;

use crate::credential::{CredentialCache, DEFAULT_CREDENTIAL_TTL};
use crate::host::http::{BROWSER_USER_AGENT, HttpClient};
use crate::retry::RetryStrategy;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries on connect errors and timeouts.
    pub max_retries: u32,
    /// User agent sent with every request.
    pub user_agent: String,
    /// How long a discovered credential is served from memory.
    pub credential_ttl: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            user_agent: BROWSER_USER_AGENT.to_string(),
            credential_ttl: DEFAULT_CREDENTIAL_TTL,
        }
    }
}

impl FetchSettings {
    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry count.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the credential lifetime.
    pub fn with_credential_ttl(mut self, ttl: Duration) -> Self {
        self.credential_ttl = ttl;
        self
    }

    /// Returns the retry policy these settings describe.
    pub fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::with_retries(self.max_retries)
    }

    /// Builds an HTTP client from these settings.
    pub fn http_client(&self) -> HttpClient {
        HttpClient::with_options(self.timeout, &self.user_agent, self.retry_strategy())
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to fetch strategies.
pub struct FetchContext {
    /// HTTP client with tracing and retries.
    pub http: Arc<HttpClient>,
    /// Shared bearer token cache.
    pub credentials: Arc<CredentialCache>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default settings.
    pub fn new() -> Self {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with custom settings.
    pub fn with_settings(settings: FetchSettings) -> Self {
        Self::builder().settings(settings).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    http: Option<Arc<HttpClient>>,
    credentials: Option<Arc<CredentialCache>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP client.
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the credential cache.
    pub fn credentials(mut self, credentials: Arc<CredentialCache>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the retry count.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.settings.max_retries = retries;
        self
    }

    /// Builds the fetch context. Missing parts are created from the settings.
    pub fn build(self) -> FetchContext {
        let settings = self.settings;
        FetchContext {
            http: self
                .http
                .unwrap_or_else(|| Arc::new(settings.http_client())),
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(CredentialCache::new(settings.credential_ttl))),
            settings,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.max_retries, 2);
        assert_eq!(settings.credential_ttl, Duration::from_secs(3600));
        assert!(settings.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(settings.retry_strategy().max_attempts, 3);
    }

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .timeout(Duration::from_secs(5))
            .max_retries(0)
            .build();

        assert_eq!(ctx.timeout(), Duration::from_secs(5));
        assert_eq!(ctx.http.retry().max_attempts, 1);
        assert_eq!(ctx.credentials.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_credential_ttl_flows_into_cache() {
        let settings = FetchSettings::default().with_credential_ttl(Duration::from_secs(60));
        let ctx = FetchContext::with_settings(settings);
        assert_eq!(ctx.credentials.ttl(), Duration::from_secs(60));
    }
}
