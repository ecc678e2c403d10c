// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # liftstat Fetch
//!
//! Fetch infrastructure for liftstat: everything between "a resort id" and
//! "a canonical record or nothing".
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with tracing, retries and status checks
//!
//! ## Resolution
//!
//! - [`strategy::StatsStrategy`] - One way of producing stats for a resort
//! - [`strategy::ProviderFamily`] - A feed provider recognized from an endpoint
//! - [`dispatcher::Dispatcher`] - Plans and runs strategies by tier
//! - [`context::FetchContext`] - HTTP client, credential cache and settings
//!
//! ## Shared State
//!
//! - [`credential::CredentialCache`] - Time-limited bearer token cache
//! - [`settle`] - Concurrent per-area fetches that all settle
//!
//! ## Example
//!
//! ```ignore
//! use liftstat_fetch::{Dispatcher, FetchContext};
//!
//! let ctx = FetchContext::new();
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .register_resort("alta", Arc::new(AltaStrategy::new()))
//!     .set_fallback(Arc::new(GenericFeedStrategy::new()));
//!
//! let resolution = dispatcher.resolve(&resort, &ctx).await;
//! ```

pub mod context;
pub mod credential;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod retry;
pub mod settle;
pub mod strategy;

// Errors
pub use error::{CredentialError, FailureKind, FetchError, HttpError};

// Host APIs
pub use host::http::{BROWSER_USER_AGENT, HttpClient, redact_url};

// Context
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use retry::RetryStrategy;

// Credentials
pub use credential::{
    CachedCredential, Clock, Credential, CredentialCache, CredentialOrigin, CredentialSource,
    DEFAULT_CREDENTIAL_TTL, ManualClock, SystemClock,
};

// Strategy & Dispatch
pub use dispatcher::{
    Dispatcher, PlannedStep, Resolution, ResolutionPlan, ResolvedStats, StrategyAttempt, Tier,
};
pub use settle::{all_failed, settle_all};
pub use strategy::{ProviderFamily, SourceKind, StatsStrategy, settle_extraction};
