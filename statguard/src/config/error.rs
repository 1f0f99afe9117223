//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Setup mistakes detected before any row is validated.
///
/// These are the only errors that reach callers as hard failures; data
/// quality problems are absorbed by the fallback chain.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cache TTL must be a positive duration.
    #[error("invalid cache TTL: {0} (must be greater than zero)")]
    InvalidTtl(String),

    /// League default must be a finite number inside [0, 1].
    #[error("invalid league default: {0} (must be a number between 0 and 1)")]
    InvalidLeagueDefault(String),

    /// Season query timeout must be a positive duration.
    #[error("invalid season query timeout: {0} (must be greater than zero)")]
    InvalidTimeout(String),

    /// Batch concurrency must be at least one.
    #[error("invalid batch concurrency: {0} (must be at least 1)")]
    InvalidConcurrency(String),

    /// Cache capacity, when set, must be at least one.
    #[error("invalid cache capacity: {0} (must be at least 1)")]
    InvalidCapacity(String),

    /// A config file value could not be parsed.
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// The config file could not be read or parsed.
    #[error("failed to read config file {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// The config file could not be written.
    #[error("failed to write config file {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}
