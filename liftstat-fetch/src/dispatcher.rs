//! Resolution dispatcher.
//!
//! For each resort the dispatcher builds a [`ResolutionPlan`] of up to three
//! tagged steps and runs them strictly in order, stopping at the first one
//! that produces a record:
//!
//! 1. the resort-specific strategy registered for the resort id,
//! 2. a provider family recognized from the resort's endpoint,
//! 3. the generic fallback.
//!
//! At most one strategy runs per tier. Running out of steps yields an
//! unavailable [`Resolution`], never an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use liftstat_core::{ResortDescriptor, StatsRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use crate::context::FetchContext;
use crate::strategy::{ProviderFamily, StatsStrategy};

// ============================================================================
// Tier
// ============================================================================

/// Priority tier of a plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// A strategy written for this resort.
    ResortSpecific,
    /// A provider family recognized from the resort's endpoint.
    ProviderFamily,
    /// The catch-all strategy.
    GenericFallback,
}

impl Tier {
    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ResortSpecific => "resort-specific",
            Self::ProviderFamily => "provider family",
            Self::GenericFallback => "generic fallback",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Plan
// ============================================================================

/// One step of a resolution plan.
#[derive(Clone)]
pub enum PlannedStep {
    /// Run the resort's own strategy.
    ResortSpecific(Arc<dyn StatsStrategy>),
    /// Fetch a feed from a provider family.
    ProviderFamily {
        /// The family.
        family: Arc<dyn ProviderFamily>,
        /// Feed id taken from the resort's endpoint.
        feed_id: String,
    },
    /// Run the generic fallback.
    GenericFallback(Arc<dyn StatsStrategy>),
}

impl PlannedStep {
    /// Returns the step's tier.
    pub fn tier(&self) -> Tier {
        match self {
            Self::ResortSpecific(_) => Tier::ResortSpecific,
            Self::ProviderFamily { .. } => Tier::ProviderFamily,
            Self::GenericFallback(_) => Tier::GenericFallback,
        }
    }

    /// Returns the id of the strategy or family the step runs.
    pub fn strategy_id(&self) -> String {
        match self {
            Self::ResortSpecific(s) | Self::GenericFallback(s) => s.id().to_string(),
            Self::ProviderFamily { family, feed_id } => format!("{}#{feed_id}", family.id()),
        }
    }

    async fn run(&self, resort: &ResortDescriptor, ctx: &FetchContext) -> Option<StatsRecord> {
        match self {
            Self::ResortSpecific(s) | Self::GenericFallback(s) => s.extract(resort, ctx).await,
            Self::ProviderFamily { family, feed_id } => family.extract_feed(feed_id, ctx).await,
        }
    }
}

impl fmt::Debug for PlannedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedStep")
            .field("tier", &self.tier())
            .field("strategy", &self.strategy_id())
            .finish()
    }
}

impl fmt::Display for PlannedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.strategy_id(), self.tier())
    }
}

/// The ordered steps the dispatcher will try for one resort.
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    /// Resort the plan was built for.
    pub resort_id: String,
    /// Steps in priority order.
    pub steps: Vec<PlannedStep>,
}

impl ResolutionPlan {
    /// Returns true if there is nothing to try.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step for a tier, if planned.
    pub fn step(&self, tier: Tier) -> Option<&PlannedStep> {
        self.steps.iter().find(|s| s.tier() == tier)
    }

    /// Runs the steps in order until one produces a record.
    #[instrument(skip(self, resort, ctx), fields(resort = %self.resort_id, steps = self.steps.len()))]
    pub async fn execute(&self, resort: &ResortDescriptor, ctx: &FetchContext) -> Resolution {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let strategy_id = step.strategy_id();
            let tier = step.tier();
            debug!(strategy = %strategy_id, tier = %tier, "Trying strategy");

            let attempt_start = Instant::now();
            let record = step.run(resort, ctx).await;
            let duration = attempt_start.elapsed();

            attempts.push(StrategyAttempt {
                strategy_id: strategy_id.clone(),
                tier,
                success: record.is_some(),
                duration,
            });

            if let Some(record) = record {
                info!(
                    strategy = %strategy_id,
                    tier = %tier,
                    duration = ?duration,
                    "Resolved stats"
                );
                return Resolution {
                    resort_id: self.resort_id.clone(),
                    outcome: Some(ResolvedStats {
                        record,
                        strategy_id,
                        tier,
                    }),
                    attempts,
                    duration: start.elapsed(),
                };
            }
        }

        info!(attempts = attempts.len(), "No strategy produced stats");
        Resolution {
            resort_id: self.resort_id.clone(),
            outcome: None,
            attempts,
            duration: start.elapsed(),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Record of one strategy invocation.
#[derive(Debug, Clone)]
pub struct StrategyAttempt {
    /// Strategy (or family#feed) that ran.
    pub strategy_id: String,
    /// Its tier.
    pub tier: Tier,
    /// Whether it produced a record.
    pub success: bool,
    /// How long it took.
    pub duration: Duration,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStats {
    /// The record.
    pub record: StatsRecord,
    /// Strategy that produced it.
    pub strategy_id: String,
    /// Tier of that strategy.
    pub tier: Tier,
}

/// The outcome of resolving one resort.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Resort id.
    pub resort_id: String,
    /// The winning record, or `None` when unavailable.
    pub outcome: Option<ResolvedStats>,
    /// Every strategy invocation, in order.
    pub attempts: Vec<StrategyAttempt>,
    /// Total duration.
    pub duration: Duration,
}

impl Resolution {
    /// Returns the record, if any strategy produced one.
    pub fn record(&self) -> Option<&StatsRecord> {
        self.outcome.as_ref().map(|o| &o.record)
    }

    /// Consumes the resolution and returns the record.
    pub fn into_record(self) -> Option<StatsRecord> {
        self.outcome.map(|o| o.record)
    }

    /// Returns true if the resort has stats.
    pub fn is_available(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the winning strategy id.
    pub fn winning_strategy(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.strategy_id.as_str())
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Selects and runs strategies for resorts.
#[derive(Default, Clone)]
pub struct Dispatcher {
    resort_strategies: HashMap<String, Arc<dyn StatsStrategy>>,
    families: Vec<Arc<dyn ProviderFamily>>,
    fallback: Option<Arc<dyn StatsStrategy>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the resort-specific strategy for a resort id, replacing any
    /// previous one.
    pub fn register_resort(
        &mut self,
        resort_id: impl Into<String>,
        strategy: Arc<dyn StatsStrategy>,
    ) -> &mut Self {
        self.resort_strategies.insert(resort_id.into(), strategy);
        self
    }

    /// Adds a provider family. Families are matched in registration order.
    pub fn register_family(&mut self, family: Arc<dyn ProviderFamily>) -> &mut Self {
        self.families.push(family);
        self
    }

    /// Sets the generic fallback.
    pub fn set_fallback(&mut self, strategy: Arc<dyn StatsStrategy>) -> &mut Self {
        self.fallback = Some(strategy);
        self
    }

    /// Returns the resort-specific strategy for a resort id.
    pub fn resort_strategy(&self, resort_id: &str) -> Option<&Arc<dyn StatsStrategy>> {
        self.resort_strategies.get(resort_id)
    }

    /// Returns the ids with a resort-specific strategy, sorted.
    pub fn registered_resorts(&self) -> Vec<&str> {
        let mut ids = self
            .resort_strategies
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    fn match_family(&self, endpoint: &Url) -> Option<PlannedStep> {
        self.families.iter().find_map(|family| {
            family
                .match_endpoint(endpoint)
                .map(|feed_id| PlannedStep::ProviderFamily {
                    family: family.clone(),
                    feed_id,
                })
        })
    }

    /// Builds the plan for a resort.
    ///
    /// The family step is inferred from `api`, then `statsUrl`.
    pub fn plan(&self, resort: &ResortDescriptor) -> ResolutionPlan {
        let mut steps = Vec::with_capacity(3);

        if let Some(strategy) = self.resort_strategy(&resort.id) {
            steps.push(PlannedStep::ResortSpecific(strategy.clone()));
        }

        if let Some(step) = [resort.api.as_ref(), resort.stats_url.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|endpoint| self.match_family(endpoint))
        {
            steps.push(step);
        }

        if let Some(fallback) = &self.fallback {
            steps.push(PlannedStep::GenericFallback(fallback.clone()));
        }

        ResolutionPlan {
            resort_id: resort.id.clone(),
            steps,
        }
    }

    /// Resolves stats for a resort.
    pub async fn resolve(&self, resort: &ResortDescriptor, ctx: &FetchContext) -> Resolution {
        self.plan(resort).execute(resort, ctx).await
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("resorts", &self.registered_resorts())
            .field(
                "families",
                &self.families.iter().map(|f| f.id()).collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback.as_ref().map(|s| s.id()))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::strategy::SourceKind;
    use async_trait::async_trait;
    use liftstat_core::Counts;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct StubStrategy {
        id: String,
        record: Option<StatsRecord>,
        calls: AtomicUsize,
        log: CallLog,
    }

    impl StubStrategy {
        fn new(id: &str, record: Option<StatsRecord>, log: &CallLog) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                record,
                calls: AtomicUsize::new(0),
                log: log.clone(),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatsStrategy for StubStrategy {
        fn id(&self) -> &str {
            &self.id
        }

        fn source(&self) -> SourceKind {
            SourceKind::JsonFeed
        }

        async fn fetch(
            &self,
            _resort: &ResortDescriptor,
            _ctx: &FetchContext,
        ) -> Result<StatsRecord, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(self.id.clone());
            self.record
                .clone()
                .ok_or_else(|| FetchError::NoData(self.id.clone()))
        }
    }

    struct StubFamily {
        record: Option<StatsRecord>,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
        log: CallLog,
    }

    impl StubFamily {
        fn new(record: Option<StatsRecord>, log: &CallLog) -> Arc<Self> {
            Arc::new(Self {
                record,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                log: log.clone(),
            })
        }
    }

    #[async_trait]
    impl ProviderFamily for StubFamily {
        fn id(&self) -> &str {
            "stubfeed"
        }

        fn match_endpoint(&self, endpoint: &Url) -> Option<String> {
            let mut segments = endpoint.path_segments()?;
            (segments.next()? == "feed")
                .then(|| segments.next().map(str::to_string))
                .flatten()
        }

        async fn fetch_feed(
            &self,
            feed_id: &str,
            _ctx: &FetchContext,
        ) -> Result<StatsRecord, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(feed_id.to_string());
            self.log.lock().unwrap().push("family".to_string());
            self.record
                .clone()
                .ok_or_else(|| FetchError::NoData(feed_id.to_string()))
        }
    }

    fn record() -> StatsRecord {
        StatsRecord::new(Counts::new(4, 5), Counts::new(30, 40))
    }

    fn resort_with_feed() -> ResortDescriptor {
        ResortDescriptor::new("peak").with_api(Url::parse("https://feeds.example/feed/57/").unwrap())
    }

    #[tokio::test]
    async fn test_short_circuits_on_resort_specific_success() {
        let log = CallLog::default();
        let specific = StubStrategy::new("peak.page", Some(record()), &log);
        let family = StubFamily::new(Some(record()), &log);
        let fallback = StubStrategy::new("generic", Some(record()), &log);

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register_resort("peak", specific.clone())
            .register_family(family.clone())
            .set_fallback(fallback.clone());

        let resolution = dispatcher
            .resolve(&resort_with_feed(), &FetchContext::new())
            .await;

        assert_eq!(resolution.record(), Some(&record()));
        assert_eq!(resolution.winning_strategy(), Some("peak.page"));
        assert_eq!(specific.calls(), 1);
        assert_eq!(family.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fallback.calls(), 0);
        assert_eq!(resolution.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_invokes_each_tier_once_in_order() {
        let log = CallLog::default();
        let specific = StubStrategy::new("peak.page", None, &log);
        let family = StubFamily::new(None, &log);
        let fallback = StubStrategy::new("generic", None, &log);

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register_resort("peak", specific.clone())
            .register_family(family.clone())
            .set_fallback(fallback.clone());

        let resolution = dispatcher
            .resolve(&resort_with_feed(), &FetchContext::new())
            .await;

        assert!(!resolution.is_available());
        assert_eq!(specific.calls(), 1);
        assert_eq!(family.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["peak.page", "family", "generic"]);

        let tiers = resolution
            .attempts
            .iter()
            .map(|a| a.tier)
            .collect::<Vec<_>>();
        assert_eq!(
            tiers,
            vec![Tier::ResortSpecific, Tier::ProviderFamily, Tier::GenericFallback]
        );
        assert!(resolution.attempts.iter().all(|a| !a.success));
    }

    #[tokio::test]
    async fn test_family_receives_feed_id() {
        let log = CallLog::default();
        let family = StubFamily::new(Some(record()), &log);
        let fallback = StubStrategy::new("generic", Some(record()), &log);

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register_family(family.clone())
            .set_fallback(fallback.clone());

        let resolution = dispatcher
            .resolve(&resort_with_feed(), &FetchContext::new())
            .await;

        assert_eq!(resolution.winning_strategy(), Some("stubfeed#57"));
        assert_eq!(*family.seen.lock().unwrap(), vec!["57"]);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_record_advances_tier() {
        let log = CallLog::default();
        let zero = StubStrategy::new("peak.page", Some(StatsRecord::default()), &log);
        let fallback = StubStrategy::new("generic", Some(record()), &log);

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register_resort("peak", zero.clone())
            .set_fallback(fallback.clone());

        let resolution = dispatcher
            .resolve(&ResortDescriptor::new("peak"), &FetchContext::new())
            .await;

        assert_eq!(resolution.winning_strategy(), Some("generic"));
        assert_eq!(resolution.outcome.unwrap().tier, Tier::GenericFallback);
    }

    #[test]
    fn test_plan_skips_absent_tiers() {
        let log = CallLog::default();
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register_family(StubFamily::new(None, &log))
            .set_fallback(StubStrategy::new("generic", None, &log));

        let plain = ResortDescriptor::new("plain")
            .with_api(Url::parse("https://example.com/api/status").unwrap());
        let plan = dispatcher.plan(&plain);
        assert_eq!(plan.steps.len(), 1);
        assert!(plan.step(Tier::GenericFallback).is_some());
        assert!(plan.step(Tier::ProviderFamily).is_none());

        let empty = Dispatcher::new().plan(&plain);
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_empty_plan_is_unavailable() {
        let resolution = Dispatcher::new()
            .resolve(&ResortDescriptor::new("nowhere"), &FetchContext::new())
            .await;
        assert!(!resolution.is_available());
        assert!(resolution.attempts.is_empty());
    }
}
