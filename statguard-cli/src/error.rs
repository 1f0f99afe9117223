//! CLI error type.

use statguard::config::ConfigError;
use statguard::ingest::IngestError;
use statguard::logging::LoggingError;
use statguard::season::SeasonQueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Season source error: {0}")]
    Season(#[from] SeasonQueryError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to install signal handler: {0}")]
    Signal(String),

    #[error("Failed to start async runtime: {0}")]
    Runtime(String),

    #[error("Failed to write output: {0}")]
    Output(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_and_signal_errors_are_not_config_errors() {
        let arg = CliError::InvalidArgument("age must be non-negative".into());
        let signal = CliError::Signal("handler already registered".into());

        assert_eq!(arg.to_string(), "Invalid argument: age must be non-negative");
        assert_eq!(
            signal.to_string(),
            "Failed to install signal handler: handler already registered"
        );
        assert!(!arg.to_string().starts_with("Configuration error"));
    }
}
