//! Shared setup for commands that run the validation pipeline.

use std::future::Future;
use std::path::{Path, PathBuf};

use statguard::config::{config_file_path, ConfigFile};
use statguard::logging::{init_logging, WorkerGuard};
use tracing::info;

use crate::error::CliError;

/// Loaded configuration plus installed logging.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
    /// Flushes the log file on drop.
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Load the configuration (default location unless `config_path` is
    /// given) and install logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&config_path)?;
        let log_guard = init_logging(&config.logging)?;

        Ok(Self {
            config,
            config_path,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log the command being run and where its settings came from.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = statguard::VERSION,
            command,
            config = %self.config_path.display(),
            "statguard starting"
        );
    }

    /// Run `future` to completion on a fresh multi-threaded runtime.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))?;
        Ok(runtime.block_on(future))
    }
}
