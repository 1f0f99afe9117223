//! Configuration management CLI commands.
//!
//! Provides `config check`, `config path` and `config init`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Subcommand;
use statguard::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Load and validate the configuration file, then print the effective settings
    Check,

    /// Show the configuration file path
    Path,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand against `path` (default location when `None`).
pub fn run(command: ConfigCommands, path: Option<&Path>) -> Result<(), CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Check => run_check(&path),
        ConfigCommands::Path => run_path(&path),
        ConfigCommands::Init { force } => run_init(&path, force),
    }
}

/// Validate the configuration file.
fn run_check(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        println!("{} not found, using defaults", path.display());
    }
    let config = ConfigFile::load_from(path)?;
    print!("{}", describe(&config));
    println!("Configuration OK");
    Ok(())
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

/// Write the default configuration.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    ConfigFile::default().save_to(path)?;
    println!("Configuration file: {}", path.display());
    Ok(())
}

fn describe(config: &ConfigFile) -> String {
    let v = &config.validator;
    let or_unset = |p: Option<&PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    };

    let mut lines = vec![
        "[cache]".to_string(),
        format!("  ttl = {}", ttl_text(v.cache_ttl)),
        format!(
            "  max_entries = {}",
            v.cache_max_entries
                .map(|m| m.to_string())
                .unwrap_or_else(|| "unbounded".to_string())
        ),
        "[resolver]".to_string(),
        format!("  league_default = {:.3}", v.league_default),
        format!("  season_timeout = {}ms", v.season_timeout.as_millis()),
        "[batch]".to_string(),
        format!("  concurrency = {}", v.batch_concurrency),
        "[season]".to_string(),
        format!(
            "  url = {}",
            config.season.url.as_deref().unwrap_or("(not set)")
        ),
        format!("  source_file = {}", or_unset(config.season.source_file.as_ref())),
        "[logging]".to_string(),
        format!("  level = {}", config.logging.level),
        format!("  directory = {}", or_unset(config.logging.directory.as_ref())),
    ];
    lines.push(String::new());
    lines.join("\n")
}

/// Whole hours as `24h`, anything else in seconds.
fn ttl_text(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    if secs > 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statguard::config::ConfigError;

    #[test]
    fn test_init_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statguard").join("config.ini");

        run_init(&path, false).unwrap();
        assert!(path.exists());
        run_check(&path).unwrap();
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[batch]\nconcurrency = 4\n").unwrap();

        assert!(matches!(run_init(&path, false), Err(CliError::Config(_))));
        run_init(&path, true).unwrap();
    }

    #[test]
    fn test_check_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[resolver]\nleague_default = 1.7\n").unwrap();

        let err = run_check(&path).unwrap_err();
        assert!(matches!(
            err,
            CliError::ConfigFile(ConfigError::InvalidLeagueDefault(_))
        ));
    }

    #[test]
    fn test_describe_defaults() {
        let text = describe(&ConfigFile::default());
        assert!(text.contains("ttl = 24h"));
        assert!(text.contains("league_default = 0.244"));
        assert!(text.contains("max_entries = unbounded"));
    }

    #[test]
    fn test_describe_sub_hour_ttl() {
        let mut config = ConfigFile::default();
        config.validator = config.validator.with_cache_ttl(Duration::from_secs(30 * 60));

        let text = describe(&config);
        assert!(text.contains("ttl = 1800s"));
        assert!(!text.contains("ttl = 0h"));
    }
}
