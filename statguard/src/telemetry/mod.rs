//! Resolver telemetry.
//!
//! Lock-free counters record which fallback tier served each row and how
//! the season collaborator behaved. A snapshot is a plain copy that can be
//! logged or printed.
//!
//! # Architecture
//!
//! ```text
//! FallbackResolver ─────► ResolverMetrics ─────► ResolverSnapshot ─────► Views
//!                         (atomic counters)      (point-in-time copy)    (CLI, logs)
//! ```
//!
//! # Example
//!
//! ```
//! use statguard::record::SourceTier;
//! use statguard::telemetry::ResolverMetrics;
//!
//! let metrics = ResolverMetrics::new();
//! metrics.record_tier(SourceTier::Raw);
//! metrics.record_tier(SourceTier::LeagueDefault);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.total(), 2);
//! assert_eq!(snapshot.league_default, 1);
//! ```

mod metrics;
mod snapshot;

pub use metrics::ResolverMetrics;
pub use snapshot::ResolverSnapshot;
