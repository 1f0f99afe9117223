//! INI configuration file.
//!
//! ```ini
//! [cache]
//! ttl_hours = 24
//! max_entries = 5000
//!
//! [resolver]
//! league_default = 0.244
//! season_timeout_ms = 2000
//!
//! [batch]
//! concurrency = 16
//!
//! [season]
//! url = https://stats.example.com/season/{id}?as_of={date}
//! source_file = /var/lib/statguard/season.json
//!
//! [logging]
//! level = info
//! directory = /var/log/statguard
//! ```
//!
//! `ttl_seconds` may be given instead of `ttl_hours` and wins when both are
//! set; TTLs that are not a whole number of hours are saved that way.
//!
//! Every key is optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use super::{ConfigError, ValidatorConfig};

const SECONDS_PER_HOUR: u64 = 60 * 60;

/// Where season aggregates come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonSettings {
    /// URL template for the HTTP season source.
    pub url: Option<String>,
    /// JSON file with a static season table.
    pub source_file: Option<PathBuf>,
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default level filter, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for rolling log files; stderr only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Fallback chain settings.
    pub validator: ValidatorConfig,
    /// Season collaborator settings.
    pub season: SeasonSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Default location of the configuration file.
///
/// `$XDG_CONFIG_HOME/statguard/config.ini` on Linux, falling back to the
/// working directory when no config directory is known.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("statguard")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    ///
    /// The validator settings are checked before returning.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    /// Parse from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::ReadFailed {
            path: PathBuf::from("<inline>"),
            reason: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(hours) = parse_opt::<u64>(section, "cache", "ttl_hours")? {
                config.validator.cache_ttl =
                    Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR));
            }
            if let Some(seconds) = parse_opt::<u64>(section, "cache", "ttl_seconds")? {
                config.validator.cache_ttl = Duration::from_secs(seconds);
            }
            config.validator.cache_max_entries = parse_opt(section, "cache", "max_entries")?;
        }

        if let Some(section) = ini.section(Some("resolver")) {
            if let Some(raw) = non_empty(section, "league_default") {
                config.validator.league_default = raw
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidLeagueDefault(raw.to_string()))?;
            }
            if let Some(ms) = parse_opt::<u64>(section, "resolver", "season_timeout_ms")? {
                config.validator.season_timeout = Duration::from_millis(ms);
            }
        }

        if let Some(section) = ini.section(Some("batch")) {
            if let Some(concurrency) = parse_opt(section, "batch", "concurrency")? {
                config.validator.batch_concurrency = concurrency;
            }
        }

        if let Some(section) = ini.section(Some("season")) {
            config.season.url = non_empty(section, "url").map(str::to_string);
            config.season.source_file = non_empty(section, "source_file").map(PathBuf::from);
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = non_empty(section, "level") {
                config.logging.level = level.to_string();
            }
            config.logging.directory = non_empty(section, "directory").map(PathBuf::from);
        }

        config.validator.validate()?;
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let v = &self.validator;
        let ttl_secs = v.cache_ttl.as_secs();
        let (ttl_key, ttl_value) = if ttl_secs % SECONDS_PER_HOUR == 0 {
            ("ttl_hours", ttl_secs / SECONDS_PER_HOUR)
        } else {
            ("ttl_seconds", ttl_secs)
        };

        let mut ini = Ini::new();
        ini.with_section(Some("cache"))
            .set(ttl_key, ttl_value.to_string())
            .set(
                "max_entries",
                v.cache_max_entries.map(|m| m.to_string()).unwrap_or_default(),
            );
        ini.with_section(Some("resolver"))
            .set("league_default", v.league_default.to_string())
            .set("season_timeout_ms", v.season_timeout.as_millis().to_string());
        ini.with_section(Some("batch"))
            .set("concurrency", v.batch_concurrency.to_string());
        ini.with_section(Some("season"))
            .set("url", self.season.url.clone().unwrap_or_default())
            .set(
                "source_file",
                self.season
                    .source_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            );
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.clone())
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            );

        ini.write_to_file(path).map_err(|e| write_err(e.to_string()))
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_opt<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match non_empty(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: format!("{}.{}", section_name, key),
                value: raw.to_string(),
            }),
    }
}
