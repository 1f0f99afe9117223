//! Season-aggregate collaborators.
//!
//! The resolver's second fallback tier asks a [`SeasonAggregate`] for a
//! player's (or team's) season-to-date average. Sources are untrusted and
//! may be slow, so the resolver only talks to them through a
//! [`SeasonAggregateClient`], which enforces a deadline and turns every
//! failure into "no data".
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use statguard::record::StatKey;
//! use statguard::season::{SeasonAggregateClient, StaticSeasonSource};
//!
//! let table = StaticSeasonSource::new().with_average(StatKey::player("545361"), 0.301);
//! let client = SeasonAggregateClient::new(Arc::new(table), Duration::from_secs(2));
//! assert_eq!(client.source_name(), "static-table");
//! ```

mod client;
mod http;
mod table;
mod types;

pub use client::{SeasonAggregateClient, SeasonLookup};
pub use http::HttpSeasonSource;
pub use table::StaticSeasonSource;
pub use types::{BoxFuture, NoSeasonData, SeasonAggregate, SeasonQueryError};

#[cfg(test)]
pub(crate) use client::tests::ScriptedSeason;
