//! Time-limited credential cache.
//!
//! One provider family needs a short-lived bearer token scraped from a
//! public page. [`CredentialCache`] keeps the most recent token in memory
//! and asks a [`CredentialSource`] for a new one once it expires.
//!
//! The cache is process-wide in practice (one instance lives in the
//! [`FetchContext`](crate::FetchContext)) but is an ordinary value, so tests
//! create their own with a [`ManualClock`].
//!
//! There is no single-flight guard: concurrent callers that all see a stale
//! entry each acquire, and the last write wins.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::CredentialError;
use crate::host::http::HttpClient;

/// Default credential lifetime.
pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::from_secs(3600);

// ============================================================================
// Clock
// ============================================================================

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = add_saturating(*now, by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn add_saturating(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ============================================================================
// Credential
// ============================================================================

/// Where an acquired credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialOrigin {
    /// Found in the landing page markup.
    LandingPage,
    /// Found in a script bundle the landing page references.
    ScriptBundle,
    /// The last known static token.
    StaticFallback,
}

impl CredentialOrigin {
    /// Returns true for tokens discovered live (these are cached).
    pub fn is_discovered(self) -> bool {
        !matches!(self, Self::StaticFallback)
    }

    /// Returns a label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LandingPage => "landing_page",
            Self::ScriptBundle => "script_bundle",
            Self::StaticFallback => "static_fallback",
        }
    }
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly acquired token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Token value.
    pub value: String,
    /// How it was obtained.
    pub origin: CredentialOrigin,
}

impl Credential {
    /// Creates a credential.
    pub fn new(value: impl Into<String>, origin: CredentialOrigin) -> Self {
        Self {
            value: value.into(),
            origin,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &redact(&self.value))
            .field("origin", &self.origin)
            .finish()
    }
}

/// A cached token and its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedCredential {
    /// Token value.
    pub value: String,
    /// When the token stops being served from memory.
    pub expires_at: DateTime<Utc>,
}

impl CachedCredential {
    /// Returns true while `now` is before the expiry.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for CachedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCredential")
            .field("value", &redact(&self.value))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}…")
}

/// Acquires a new token.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &str;

    /// Runs the acquisition protocol.
    async fn acquire(&self, http: &HttpClient) -> Result<Credential, CredentialError>;
}

// ============================================================================
// Credential Cache
// ============================================================================

/// In-memory cache of one short-lived token.
pub struct CredentialCache {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<CachedCredential>>,
}

impl CredentialCache {
    /// Creates an empty cache on the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache on the given clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns the configured lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached entry, fresh or not.
    pub async fn peek(&self) -> Option<CachedCredential> {
        self.slot.read().await.clone()
    }

    /// Drops the cached entry.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }

    /// Returns the cached token if it is fresh, otherwise acquires a new one.
    ///
    /// Discovered tokens replace the cached entry with a new expiry. A static
    /// fallback token is returned without being cached, so the next call
    /// tries discovery again.
    ///
    /// # Errors
    ///
    /// Returns the source's error when acquisition fails; the cached entry is
    /// left untouched.
    #[instrument(skip(self, source, http), fields(source = source.name()))]
    pub async fn get_or_refresh(
        &self,
        source: &dyn CredentialSource,
        http: &HttpClient,
    ) -> Result<String, CredentialError> {
        {
            let slot = self.slot.read().await;
            if let Some(cached) = slot.as_ref().filter(|c| c.is_fresh(self.clock.now())) {
                debug!(expires_at = %cached.expires_at, "Serving cached credential");
                return Ok(cached.value.clone());
            }
        }

        let credential = source.acquire(http).await?;

        if credential.origin.is_discovered() {
            let expires_at = add_saturating(self.clock.now(), self.ttl);
            *self.slot.write().await = Some(CachedCredential {
                value: credential.value.clone(),
                expires_at,
            });
            info!(origin = %credential.origin, expires_at = %expires_at, "Credential refreshed");
        } else {
            warn!("Token discovery failed, using static fallback token");
        }

        Ok(credential.value)
    }
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_TTL)
    }
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("clock", &self.clock)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        calls: AtomicUsize,
        origin: CredentialOrigin,
        fail: bool,
    }

    impl StubSource {
        fn new(origin: CredentialOrigin) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                origin,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(CredentialOrigin::LandingPage)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn acquire(&self, _http: &HttpClient) -> Result<Credential, CredentialError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(CredentialError::NotFound("stub".into()));
            }
            Ok(Credential::new(format!("token-{n}"), self.origin))
        }
    }

    fn cache(clock: &Arc<ManualClock>) -> CredentialCache {
        CredentialCache::with_clock(DEFAULT_CREDENTIAL_TTL, clock.clone())
    }

    #[tokio::test]
    async fn test_fresh_token_served_from_memory() {
        let clock = Arc::new(ManualClock::default());
        let cache = cache(&clock);
        let source = StubSource::new(CredentialOrigin::LandingPage);
        let http = HttpClient::new();

        let first = cache.get_or_refresh(&source, &http).await.unwrap();
        clock.advance(Duration::from_secs(1800));
        let second = cache.get_or_refresh(&source, &http).await.unwrap();

        assert_eq!(first, "token-1");
        assert_eq!(second, "token-1");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_triggers_one_acquisition() {
        let clock = Arc::new(ManualClock::default());
        let cache = cache(&clock);
        let source = StubSource::new(CredentialOrigin::ScriptBundle);
        let http = HttpClient::new();

        cache.get_or_refresh(&source, &http).await.unwrap();
        clock.advance(Duration::from_secs(3600));

        let refreshed = cache.get_or_refresh(&source, &http).await.unwrap();
        let again = cache.get_or_refresh(&source, &http).await.unwrap();

        assert_eq!(refreshed, "token-2");
        assert_eq!(again, "token-2");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_static_fallback_is_not_cached() {
        let clock = Arc::new(ManualClock::default());
        let cache = cache(&clock);
        let source = StubSource::new(CredentialOrigin::StaticFallback);
        let http = HttpClient::new();

        cache.get_or_refresh(&source, &http).await.unwrap();
        cache.get_or_refresh(&source, &http).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert!(cache.peek().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_acquisition_leaves_cache_empty() {
        let clock = Arc::new(ManualClock::default());
        let cache = cache(&clock);
        let http = HttpClient::new();

        let err = cache
            .get_or_refresh(&StubSource::failing(), &http)
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::NotFound(_)));
        assert!(cache.peek().await.is_none());
    }

    #[tokio::test]
    async fn test_peek_reports_expiry() {
        let start = Utc::now();
        let clock = Arc::new(ManualClock::new(start));
        let cache = cache(&clock);
        let source = StubSource::new(CredentialOrigin::LandingPage);

        cache
            .get_or_refresh(&source, &HttpClient::new())
            .await
            .unwrap();
        let cached = cache.peek().await.unwrap();
        assert_eq!(cached.expires_at, start + TimeDelta::hours(1));
        assert!(cached.is_fresh(start));
        assert!(!cached.is_fresh(start + TimeDelta::hours(1)));

        cache.clear().await;
        assert!(cache.peek().await.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("abcdefghijkl", CredentialOrigin::LandingPage);
        let debug = format!("{credential:?}");
        assert!(debug.contains("abcd"));
        assert!(!debug.contains("abcdefghijkl"));
    }
}
