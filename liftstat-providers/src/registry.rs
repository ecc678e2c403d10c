//! Strategy registry.
//!
//! Holds the built-in resort-specific strategies and assembles the
//! [`Dispatcher`] for a resort configuration.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use liftstat_core::{ResortDescriptor, StatsProvider};
use liftstat_fetch::{Dispatcher, StatsStrategy};
use tracing::debug;

use crate::boyne::BoyneReportStrategy;
use crate::generic::GenericFeedStrategy;
use crate::mtnpowder::{
    MtnPowderFamily, MtnPowderFeedStrategy, MtnPowderGroupStrategy, MtnPowderResortStrategy,
};
use crate::powdr::PowdrStrategy;
use crate::reportpal::{ReportPalAreasStrategy, ReportPalStrategy};
use crate::resorts::{
    AbasinStrategy, AltaStrategy, AlyeskaStrategy, CamelbackStrategy, JacksonHoleStrategy,
    SierraStrategy, SnowbasinStrategy, SnowmassStrategy, SunValleyStrategy, TaosStrategy,
};

/// Feed ids of the Big Bear group (Snow Valley, Bear Mountain, Snow Summit).
pub const BEAR_MOUNTAIN_FEEDS: [u32; 3] = [173, 58, 57];

/// Snow Summit's feed id.
pub const SNOW_SUMMIT_FEED: u32 = 57;

/// Snow Valley's feed id.
pub const SNOW_VALLEY_FEED: u32 = 173;

// ============================================================================
// Built-in Strategies
// ============================================================================

/// A resort with a built-in strategy.
pub struct BuiltIn {
    /// Resort id.
    pub resort_id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// The resort-specific strategy.
    pub strategy: Arc<dyn StatsStrategy>,
}

impl std::fmt::Debug for BuiltIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltIn")
            .field("resort_id", &self.resort_id)
            .field("strategy", &self.strategy.id())
            .finish()
    }
}

fn built_in(
    resort_id: &'static str,
    name: &'static str,
    strategy: impl StatsStrategy + 'static,
) -> BuiltIn {
    BuiltIn {
        resort_id,
        name,
        strategy: Arc::new(strategy),
    }
}

/// Static storage for the built-in strategies.
static BUILT_INS: OnceLock<Vec<BuiltIn>> = OnceLock::new();

/// Static storage for the resort id index.
static BY_ID: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();

/// Built-in strategies, alphabetical by resort id.
fn init_built_ins() -> Vec<BuiltIn> {
    vec![
        built_in("abasin", "Arapahoe Basin", AbasinStrategy::new()),
        built_in("alta", "Alta", AltaStrategy::new()),
        built_in("alyeska", "Alyeska", AlyeskaStrategy::new()),
        built_in(
            "bear-mountain",
            "Bear Mountain",
            MtnPowderGroupStrategy::new("bear-mountain", BEAR_MOUNTAIN_FEEDS.to_vec()),
        ),
        built_in("big-sky", "Big Sky", ReportPalStrategy::big_sky()),
        built_in("camelback", "Camelback", CamelbackStrategy::new()),
        built_in("jackson-hole", "Jackson Hole", JacksonHoleStrategy::new()),
        built_in(
            "schweitzer",
            "Schweitzer",
            MtnPowderFeedStrategy::new(),
        ),
        built_in("sierra", "Sierra-at-Tahoe", SierraStrategy::new()),
        built_in(
            "snow-summit",
            "Snow Summit",
            MtnPowderResortStrategy::new(SNOW_SUMMIT_FEED),
        ),
        built_in(
            "snow-valley",
            "Snow Valley",
            MtnPowderResortStrategy::new(SNOW_VALLEY_FEED),
        ),
        built_in("snowbasin", "Snowbasin", SnowbasinStrategy::new()),
        built_in("snowbird", "Snowbird", PowdrStrategy::new()),
        built_in("snowmass", "Aspen Snowmass", SnowmassStrategy::new()),
        built_in(
            "summit-at-snoqualmie",
            "Summit at Snoqualmie",
            ReportPalAreasStrategy::snoqualmie(),
        ),
        built_in("sunvalley", "Sun Valley", SunValleyStrategy::new()),
        built_in("taos", "Taos Ski Valley", TaosStrategy::new()),
    ]
}

// ============================================================================
// Stats Registry
// ============================================================================

/// Registry of built-in strategies.
pub struct StatsRegistry;

impl StatsRegistry {
    /// Returns every built-in strategy.
    pub fn all() -> &'static [BuiltIn] {
        BUILT_INS.get_or_init(init_built_ins)
    }

    /// Looks up the built-in strategy for a resort id.
    pub fn get(resort_id: &str) -> Option<&'static BuiltIn> {
        let index = BY_ID.get_or_init(|| {
            Self::all()
                .iter()
                .enumerate()
                .map(|(i, b)| (b.resort_id, i))
                .collect()
        });
        index.get(resort_id).map(|i| &Self::all()[*i])
    }

    /// Returns the number of built-in strategies.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns the resort ids with a built-in strategy.
    pub fn resort_ids() -> Vec<&'static str> {
        Self::all().iter().map(|b| b.resort_id).collect()
    }

    /// Returns the strategy for a declared provider family.
    pub fn for_provider(provider: StatsProvider) -> Arc<dyn StatsStrategy> {
        match provider {
            StatsProvider::MtnPowder => Arc::new(MtnPowderFeedStrategy::new()),
            StatsProvider::ReportPal => Arc::new(ReportPalStrategy::new()),
            StatsProvider::Powdr => Arc::new(PowdrStrategy::new()),
            StatsProvider::Boyne => Arc::new(BoyneReportStrategy::new()),
        }
    }

    /// Builds a dispatcher for a resort configuration.
    ///
    /// Built-in strategies are registered first. A resort that declares a
    /// `statsProvider` gets that provider's strategy instead of any
    /// built-in one. The mtnpowder family and the generic fallback complete
    /// the tiers.
    pub fn dispatcher(resorts: &[ResortDescriptor]) -> Dispatcher {
        let mut dispatcher = Dispatcher::new();

        for entry in Self::all() {
            dispatcher.register_resort(entry.resort_id, entry.strategy.clone());
        }

        for resort in resorts {
            if let Some(provider) = resort.stats_provider {
                debug!(resort = %resort.id, provider = %provider, "Registering declared provider");
                dispatcher.register_resort(resort.id.clone(), Self::for_provider(provider));
            }
        }

        dispatcher
            .register_family(Arc::new(MtnPowderFamily::new()))
            .set_fallback(Arc::new(GenericFeedStrategy::new()));
        dispatcher
    }
}

// ============================================================================
// Tests
// ============================================================================
