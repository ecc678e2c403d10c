//! JSON output formatting.

use anyhow::Result;
use liftstat_core::{ResortDescriptor, StatsRecord};
use liftstat_fetch::{Resolution, ResolutionPlan, Tier};
use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// Output Types
// ============================================================================

/// One planned step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutput {
    pub strategy: String,
    pub tier: Tier,
}

/// A resort with its resolution plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortOutput {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    pub plan: Vec<StepOutput>,
}

impl ResortOutput {
    fn new(resort: &ResortDescriptor, plan: &ResolutionPlan) -> Self {
        Self {
            id: resort.id.clone(),
            name: resort.display_name().to_string(),
            stats_url: resort.stats_url.as_ref().map(ToString::to_string),
            api: resort.api.as_ref().map(ToString::to_string),
            plan: plan
                .steps
                .iter()
                .map(|s| StepOutput {
                    strategy: s.strategy_id(),
                    tier: s.tier(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats resolutions as an object keyed by resort id. Unavailable
    /// resorts map to `null`.
    pub fn format_resolutions(&self, resolutions: &[Resolution]) -> Result<String> {
        let mut object = Map::new();
        for resolution in resolutions {
            let value = match resolution.record() {
                Some(record) => record_value(record)?,
                None => Value::Null,
            };
            object.insert(resolution.resort_id.clone(), value);
        }
        self.format(&object)
    }

    /// Formats resorts with their plans as an array.
    pub fn format_resorts(&self, resorts: &[(ResortDescriptor, ResolutionPlan)]) -> Result<String> {
        let outputs = resorts
            .iter()
            .map(|(resort, plan)| ResortOutput::new(resort, plan))
            .collect::<Vec<_>>();
        self.format(&outputs)
    }
}

fn record_value(record: &StatsRecord) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}
