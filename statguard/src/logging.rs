//! Tracing subscriber setup.
//!
//! Logs go to stderr with local timestamps. When a log directory is
//! configured, a daily-rotated file receives the same events through a
//! non-blocking writer. `RUST_LOG` overrides the configured level.

use std::path::PathBuf;

use thiserror::Error;
use time::macros::format_description;
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::{FormatTime, LocalTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// File name prefix for rotated log files.
pub const LOG_FILE_PREFIX: &str = "statguard.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to create log directory {path}: {reason}")]
    Directory { path: PathBuf, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// # Returns
///
/// The file writer's guard when file logging is enabled. Keep it alive for
/// the life of the process; dropping it flushes and stops the writer.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&settings.level)?,
    };

    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| LoggingError::Directory {
                path: dir.clone(),
                reason: e.to_string(),
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(timer())
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(timer())
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

/// Parse a level or directive list such as `info` or `statguard=debug,warn`.
pub fn build_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

fn timer() -> impl FormatTime {
    LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ))
}
