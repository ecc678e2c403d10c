// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # liftstat Providers
//!
//! Concrete extraction strategies for ski resort stats.
//!
//! Provider families are third-party feeds shared by many resorts; resort
//! extractors read one resort's own pages or API. Each module keeps a pure
//! parser next to the strategy that fetches for it.
//!
//! ## Provider Families
//!
//! | Module | Upstream | Tier |
//! |--------|----------|------|
//! | `mtnpowder` | token-protected snow report feed | family, resort-specific |
//! | `reportpal` | conditions API, resort-wide or per area | resort-specific |
//! | `powdr` | `dor/drupal` trail, lift and snow lists | resort-specific |
//! | `boyne` | printable conditions report | resort-specific |
//! | `generic` | any known payload at `statsUrl`/`url` | fallback |
//!
//! ## Usage
//!
//! ```ignore
//! use liftstat_fetch::FetchContext;
//! use liftstat_providers::StatsRegistry;
//!
//! let dispatcher = StatsRegistry::dispatcher(&resorts);
//! let ctx = FetchContext::new();
//! let resolution = dispatcher.resolve(&resorts[0], &ctx).await;
//! ```

pub mod lenient;
pub mod payload;
pub mod registry;
pub mod request;

// Provider families
pub mod boyne;
pub mod generic;
pub mod mtnpowder;
pub mod powdr;
pub mod reportpal;

// Resort-specific extractors
pub mod resorts;

pub use payload::RawPayload;
pub use registry::{BuiltIn, StatsRegistry};

// Re-export strategy types for convenience
pub use boyne::BoyneReportStrategy;
pub use generic::GenericFeedStrategy;
pub use mtnpowder::{
    BigBearHandshake, MtnPowderClient, MtnPowderFamily, MtnPowderFeedStrategy,
    MtnPowderGroupStrategy, MtnPowderResortStrategy,
};
pub use powdr::PowdrStrategy;
pub use reportpal::{ReportPalAreasStrategy, ReportPalStrategy};
pub use resorts::{
    AbasinStrategy, AltaStrategy, AlyeskaStrategy, CamelbackStrategy, JacksonHoleStrategy,
    SierraStrategy, SnowbasinStrategy, SnowmassStrategy, SunValleyStrategy, TaosStrategy,
};
