//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, boundary loading and
//! engine creation to reduce duplication across command handlers.

use crate::commands::common::load_boundaries;
use crate::error::CliError;
use regionlayer::cache::DiskTileStore;
use regionlayer::config::ConfigFile;
use regionlayer::logging::{init_logging, split_log_path, LoggingGuard};
use regionlayer::service::TileEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path`, or the default location) and start
    /// logging to the configured log file.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("RegionLayer v{}", regionlayer::VERSION);
        info!("RegionLayer CLI: {} command", command);
    }

    /// Build a multi-threaded Tokio runtime.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        Runtime::new().map_err(CliError::Runtime)
    }

    /// Open the configured base tile store.
    pub fn open_store(&self) -> Result<Arc<DiskTileStore>, CliError> {
        let store = DiskTileStore::new(self.config.cache.directory.clone())?;
        Ok(Arc::new(store))
    }

    /// Load boundaries and create an engine backed by the disk store.
    ///
    /// The store is cleared first if its data version differs from the
    /// boundary file's.
    pub fn create_engine(&self, boundaries: Option<&PathBuf>) -> Result<Arc<TileEngine>, CliError> {
        let path = boundaries.ok_or_else(|| {
            CliError::InvalidArgument("--boundaries <FILE> is required for this command".to_string())
        })?;
        let store = load_boundaries(path, self.config.boundaries.max_polygon_points)?;
        println!(
            "Loaded {} regions ({} polygons), data version {}",
            store.len(),
            store.polygon_count(),
            store.version()
        );

        let engine = TileEngine::new(
            Arc::new(store),
            self.open_store()?,
            self.config.engine_config(),
        )
        .map_err(CliError::EngineCreation)?;
        info!("Tile engine created");
        Ok(Arc::new(engine))
    }
}
