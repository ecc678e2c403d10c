//! Resort configuration file.
//!
//! ```json
//! {
//!   "settings": { "timeoutSecs": 20, "maxRetries": 1 },
//!   "resorts": [
//!     { "id": "crystal", "statsUrl": "https://…/reportpal", "statsProvider": "reportpal" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use liftstat_core::ResortDescriptor;
use liftstat_fetch::FetchSettings;
use liftstat_providers::StatsRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Directory name under the platform config dir.
const APP_DIR: &str = "liftstat";

/// Configuration file name.
const CONFIG_FILE: &str = "resorts.json";

/// Returns `<config_dir>/liftstat`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns `<config_dir>/liftstat/resorts.json`.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE)
}

// ============================================================================
// Settings
// ============================================================================

/// Fetch settings overrides. Absent fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_ttl_secs: Option<u64>,
}

impl ConfigSettings {
    /// Applies the overrides to the default fetch settings.
    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(secs) = self.timeout_secs {
            settings = settings.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.max_retries {
            settings = settings.with_max_retries(retries);
        }
        if let Some(agent) = &self.user_agent {
            settings = settings.with_user_agent(agent.clone());
        }
        if let Some(secs) = self.credential_ttl_secs {
            settings = settings.with_credential_ttl(Duration::from_secs(secs));
        }
        settings
    }
}

// ============================================================================
// Resort Config
// ============================================================================

/// The parsed configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortConfig {
    #[serde(default)]
    pub settings: ConfigSettings,
    #[serde(default)]
    pub resorts: Vec<ResortDescriptor>,
}

impl ResortConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Malformed resort configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config =
            Self::from_json(&json).with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(path = %path.display(), resorts = config.resorts.len(), "Loaded resort config");
        Ok(config)
    }

    /// Loads the explicit path, or the default path when it exists.
    ///
    /// Without a config file only the built-in resorts are known.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            debug!(path = %path.display(), "No config file, using built-in resorts");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for resort in &self.resorts {
            resort.validate()?;
            if !seen.insert(resort.id.as_str()) {
                bail!("Duplicate resort id: {}", resort.id);
            }
        }
        Ok(())
    }

    /// Configured resorts followed by built-in resorts not configured.
    pub fn catalog(&self) -> Vec<ResortDescriptor> {
        let configured: HashSet<&str> = self.resorts.iter().map(|r| r.id.as_str()).collect();
        let mut resorts = self.resorts.clone();
        resorts.extend(
            StatsRegistry::all()
                .iter()
                .filter(|b| !configured.contains(b.resort_id))
                .map(|b| ResortDescriptor::new(b.resort_id).with_name(b.name)),
        );
        resorts
    }

    /// Picks resorts by id from the catalog, in the order given. An empty
    /// selection means the whole catalog.
    pub fn select(&self, ids: &[String]) -> Result<Vec<ResortDescriptor>> {
        let catalog = self.catalog();
        if ids.is_empty() {
            return Ok(catalog);
        }
        ids.iter()
            .map(|id| {
                catalog
                    .iter()
                    .find(|r| r.id == *id)
                    .cloned()
                    .with_context(|| format!("Unknown resort: {id}"))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"{
        "settings": {"timeoutSecs": 5, "maxRetries": 0, "credentialTtlSecs": 600},
        "resorts": [
            {"id": "crystal", "name": "Crystal Mountain",
             "statsUrl": "https://example.com/api/reportpal", "statsProvider": "reportpal"},
            {"id": "taos", "name": "Taos (custom)", "url": "https://example.com/taos"}
        ]
    }"#;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_file() {
        let file = write_config(CONFIG);
        let config = ResortConfig::load(file.path()).unwrap();

        assert_eq!(config.resorts.len(), 2);
        let settings = config.settings.fetch_settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.credential_ttl, Duration::from_secs(600));
        assert!(settings.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = ResortConfig::load_or_default(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ResortConfig::from_json(r#"{"resorts": [{"id": "alta"}, {"id": "alta"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate resort id: alta"));
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        assert!(ResortConfig::from_json(r#"{"resorts": [{"id": "x", "statsProvider": "powdr"}]}"#).is_err());
        assert!(ResortConfig::from_json(r#"{"resorts": [{"id": "x", "statsProvider": "skiapi"}]}"#).is_err());
        let err = ResortConfig::from_json(
            r#"{"resorts": [{"id": "snowbird", "statsProvider": "powdr",
                             "statsUrl": "https://example.com/api/dor"}]}"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("requires api"));
        assert!(ResortConfig::from_json(r#"{"settings": {"timeout": 3}}"#).is_err());
    }

    #[test]
    fn test_catalog_prefers_configured_entries() {
        let config = ResortConfig::from_json(CONFIG).unwrap();
        let catalog = config.catalog();

        assert_eq!(catalog[0].id, "crystal");
        assert_eq!(catalog[1].display_name(), "Taos (custom)");
        assert_eq!(catalog.iter().filter(|r| r.id == "taos").count(), 1);
        assert_eq!(catalog.len(), 2 + StatsRegistry::count() - 1);
    }

    #[test]
    fn test_select() {
        let config = ResortConfig::from_json(CONFIG).unwrap();

        let picked = config
            .select(&["alta".to_string(), "crystal".to_string()])
            .unwrap();
        assert_eq!(
            picked.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["alta", "crystal"]
        );
        assert_eq!(picked[0].display_name(), "Alta");

        assert!(config.select(&["atlantis".to_string()]).is_err());
        assert_eq!(config.select(&[]).unwrap().len(), config.catalog().len());
    }

    #[test]
    fn test_empty_config() {
        let config = ResortConfig::from_json("{}").unwrap();
        assert!(config.resorts.is_empty());
        assert_eq!(config.settings.fetch_settings(), FetchSettings::default());
    }
}
