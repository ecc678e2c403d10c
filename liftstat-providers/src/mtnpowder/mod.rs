//! mtnpowder feed family.
//!
//! A third-party snow report feed used by several resorts. Requests carry a
//! bearer token discovered from a partner resort's public site and cached
//! for an hour.

mod api;
mod handshake;
mod parser;
mod strategies;

pub use api::{FEED_REFERER, FEED_URL, MtnPowderClient};
pub use handshake::{
    BigBearHandshake, FALLBACK_TOKEN, LANDING_URL, main_scripts, token_in_page, token_in_script,
};
pub use parser::{DepthArea, FeedResort, MtnPowderFeed, SnowReport, parse_feed};
pub use strategies::{
    MtnPowderFamily, MtnPowderFeedStrategy, MtnPowderGroupStrategy, MtnPowderResortStrategy,
};
