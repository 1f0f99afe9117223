//! Statguard - batting statistic validation with tiered fallback
//!
//! This library turns noisy per-player (or per-team) batting averages into
//! guaranteed-valid values tagged with where they came from and how much
//! they can be trusted.
//!
//! Resolution order for a value that is missing or outside `[0, 1]`:
//! previous known-good value from the validation cache, then the season
//! aggregate, then the league default.

pub mod cache;
pub mod clock;
pub mod config;
pub mod facade;
pub mod hitting;
pub mod ingest;
pub mod logging;
pub mod profile;
pub mod quality;
pub mod record;
pub mod resolver;
pub mod season;
pub mod telemetry;

pub use facade::{BatchOutcome, BatchSummary, IntegrationFacade, ValidationStats};
pub use quality::{classify, Quality};
pub use record::{SourceTier, StatKey, StatRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
