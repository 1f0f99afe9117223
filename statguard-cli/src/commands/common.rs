//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use statguard::config::SeasonSettings;
use statguard::season::{HttpSeasonSource, NoSeasonData, SeasonAggregate, StaticSeasonSource};
use statguard::SourceTier;

use crate::error::CliError;

/// Transport-level bound for HTTP season requests; the resolver's own
/// deadline is normally much shorter.
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Output format for validated records.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned text table followed by a summary
    #[default]
    Table,
    /// Single JSON document
    Json,
}

/// Where season aggregates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonChoice {
    File(PathBuf),
    Url(String),
    None,
}

/// Resolve the season source from CLI args and config.
///
/// CLI takes precedence over config; within each, a table file wins over a
/// URL.
pub fn choose_season(
    cli_file: Option<PathBuf>,
    cli_url: Option<String>,
    settings: &SeasonSettings,
) -> SeasonChoice {
    if let Some(file) = cli_file {
        return SeasonChoice::File(file);
    }
    if let Some(url) = cli_url {
        return SeasonChoice::Url(url);
    }
    if let Some(file) = &settings.source_file {
        return SeasonChoice::File(file.clone());
    }
    if let Some(url) = &settings.url {
        return SeasonChoice::Url(url.clone());
    }
    SeasonChoice::None
}

/// Build the season source for `choice`.
pub fn build_season(choice: &SeasonChoice) -> Result<Arc<dyn SeasonAggregate>, CliError> {
    Ok(match choice {
        SeasonChoice::File(path) => Arc::new(StaticSeasonSource::load(path)?),
        SeasonChoice::Url(url) => Arc::new(HttpSeasonSource::new(url.clone(), HTTP_REQUEST_TIMEOUT)?),
        SeasonChoice::None => Arc::new(NoSeasonData),
    })
}

/// clap value parser for tier labels (`raw`, `previous-game`, ...).
pub fn parse_tier(s: &str) -> Result<SourceTier, String> {
    SourceTier::from_label(s).ok_or_else(|| {
        let known: Vec<&str> = SourceTier::ALL.iter().map(|t| t.label()).collect();
        format!("unknown tier '{}', expected one of {}", s, known.join(", "))
    })
}
