//! Resort descriptors.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

// ============================================================================
// Stats Provider
// ============================================================================

/// A provider family a resort declares for its stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsProvider {
    /// mtnpowder.com snow report feeds.
    MtnPowder,
    /// ReportPal condition reports.
    ReportPal,
    /// POWDR "dor" drupal API.
    Powdr,
    /// Boyne printable snow reports.
    Boyne,
}

impl StatsProvider {
    /// Returns all provider families.
    pub fn all() -> &'static [StatsProvider] {
        &[Self::MtnPowder, Self::ReportPal, Self::Powdr, Self::Boyne]
    }

    /// Returns the configuration key of the endpoint this provider reads.
    pub fn endpoint_key(self) -> &'static str {
        match self {
            Self::Powdr => "api",
            Self::MtnPowder | Self::ReportPal | Self::Boyne => "statsUrl",
        }
    }

    /// Returns the endpoint this provider reads from a resort.
    pub fn endpoint(self, resort: &ResortDescriptor) -> Option<&Url> {
        match self {
            Self::Powdr => resort.api.as_ref(),
            Self::MtnPowder | Self::ReportPal | Self::Boyne => resort.stats_url.as_ref(),
        }
    }

    /// Returns the identifier used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MtnPowder => "mtnpowder",
            Self::ReportPal => "reportpal",
            Self::Powdr => "powdr",
            Self::Boyne => "boyne",
        }
    }
}

impl std::fmt::Display for StatsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatsProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidConfig(format!("unknown stats provider: {s}")))
    }
}

// ============================================================================
// Resort Descriptor
// ============================================================================

/// Identifies a resort and the endpoints known for it.
///
/// Read-only for the duration of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortDescriptor {
    /// Stable identifier ("alta", "bear-mountain").
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Public status page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    /// General-purpose status endpoint, inspected for provider patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<Url>,
    /// Dedicated stats endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_url: Option<Url>,
    /// Declared provider family for `stats_url` / `api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_provider: Option<StatsProvider>,
}

impl ResortDescriptor {
    /// Creates a descriptor with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            url: None,
            api: None,
            stats_url: None,
            stats_provider: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the status page URL.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Sets the general-purpose status endpoint.
    pub fn with_api(mut self, api: Url) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the dedicated stats endpoint.
    pub fn with_stats_url(mut self, url: Url) -> Self {
        self.stats_url = Some(url);
        self
    }

    /// Declares the provider family.
    pub fn with_stats_provider(mut self, provider: StatsProvider) -> Self {
        self.stats_provider = Some(provider);
        self
    }

    /// Returns the display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Returns the endpoint a generic fetch should use: `stats_url`, else `url`.
    pub fn feed_url(&self) -> Option<&Url> {
        self.stats_url.as_ref().or(self.url.as_ref())
    }

    /// Validates the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` for an empty id, or a declared
    /// provider without the endpoint it reads (`api` for powdr, `statsUrl`
    /// for the others).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidConfig("resort id is empty".to_string()));
        }
        if let Some(provider) = self.stats_provider {
            if provider.endpoint(self).is_none() {
                return Err(CoreError::InvalidConfig(format!(
                    "{}: statsProvider {provider} requires {}",
                    self.id,
                    provider.endpoint_key()
                )));
            }
        }
        Ok(())
    }
}
