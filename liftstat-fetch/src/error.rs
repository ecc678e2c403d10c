//! Fetch error types.
//!
//! Every variant of [`FetchError`] maps onto one [`FailureKind`]; strategies
//! never let these escape, they are logged by category at the extractor
//! boundary and turned into "no data".

use thiserror::Error;

// ============================================================================
// Failure Kind
// ============================================================================

/// Why a strategy produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network error, timeout or non-success status.
    Transport,
    /// The payload did not have the expected structure.
    Shape,
    /// The payload parsed but carried nothing usable.
    Empty,
}

impl FailureKind {
    /// Returns a lowercase label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Shape => "shape",
            Self::Empty => "empty",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid response from the source.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The resort has no endpoint this strategy can use.
    #[error("Missing endpoint: {0}")]
    MissingEndpoint(String),

    /// The source responded but reported nothing usable.
    #[error("No data: {0}")]
    NoData(String),

    /// Credential acquisition failed.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] liftstat_core::CoreError),
}

impl FetchError {
    /// Maps the error onto the transport / shape / empty taxonomy.
    pub fn category(&self) -> FailureKind {
        match self {
            Self::Http(_) | Self::Credential(_) => FailureKind::Transport,
            Self::Json(_) | Self::InvalidResponse(_) | Self::Core(_) => FailureKind::Shape,
            Self::MissingEndpoint(_) | Self::NoData(_) => FailureKind::Empty,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpError::from(err))
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status code.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout.
    #[error("Request timed out")]
    Timeout,
}

impl HttpError {
    /// Returns the status code for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ============================================================================
// Credential Error
// ============================================================================

/// Error type for credential acquisition.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No token could be discovered.
    #[error("Credential not found: {0}")]
    NotFound(String),

    /// The discovery request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}
