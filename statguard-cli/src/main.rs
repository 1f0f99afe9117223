//! Statguard CLI - Command-line interface
//!
//! Validates batting-average feeds with tiered fallback and inspects the
//! configuration.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use statguard::SourceTier;

use commands::common::{parse_tier, OutputFormat};
use commands::config::ConfigCommands;
use commands::validate::ValidateArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "statguard")]
#[command(version = statguard::VERSION)]
#[command(about = "Validated batting averages with tiered fallback", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate every row of a JSON feed file
    Validate {
        /// Feed file: JSON array of rows with player_id/team, game_date and a raw average
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Season table JSON file (overrides config)
        #[arg(long, value_name = "FILE", conflicts_with = "season_url")]
        season_file: Option<PathBuf>,

        /// Season service URL template with {id}, {namespace}, {key}, {date} (overrides config)
        #[arg(long, value_name = "URL")]
        season_url: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the quality grade for a source tier and data age
    Classify {
        /// Source tier: raw, previous-game, season-average, league-default
        #[arg(long, value_parser = parse_tier)]
        tier: SourceTier,

        /// Age of the underlying data in hours
        #[arg(long, default_value_t = 0.0)]
        age_hours: f64,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Validate {
            input,
            season_file,
            season_url,
            format,
        } => {
            let runner = CliRunner::new(cli.config.as_deref())?;
            commands::validate::run(
                ValidateArgs {
                    input,
                    season_file,
                    season_url,
                    format,
                },
                &runner,
            )
        }
        Commands::Classify { tier, age_hours } => commands::classify::run(tier, age_hours),
        Commands::Config { command } => commands::config::run(command, cli.config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "statguard",
            "validate",
            "--input",
            "feed.json",
            "--format",
            "json",
            "--config",
            "/tmp/c.ini",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.ini")));
        match cli.command {
            Commands::Validate { input, format, .. } => {
                assert_eq!(input, PathBuf::from("feed.json"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_classify() {
        let cli =
            Cli::try_parse_from(["statguard", "classify", "--tier", "previous-game", "--age-hours", "50"])
                .unwrap();
        match cli.command {
            Commands::Classify { tier, age_hours } => {
                assert_eq!(tier, SourceTier::PreviousGame);
                assert_eq!(age_hours, 50.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_season_sources_conflict() {
        let result = Cli::try_parse_from([
            "statguard",
            "validate",
            "--input",
            "f.json",
            "--season-file",
            "s.json",
            "--season-url",
            "http://x/{id}",
        ]);
        assert!(result.is_err());
    }
}
