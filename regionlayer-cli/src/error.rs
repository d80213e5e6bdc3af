//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use regionlayer::cache::CacheError;
use regionlayer::config::ConfigFileError;
use regionlayer::raster::RenderError;
use regionlayer::service::ServiceError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Boundary file missing or malformed
    Boundaries { path: String, reason: String },
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to create the tile engine
    EngineCreation(ServiceError),
    /// Tile request produced no image
    Render(String),
    /// Failed to encode a tile
    Encode(RenderError),
    /// Base tile store error
    Cache(CacheError),
    /// Pre-warm failed
    Prewarm(ServiceError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Boundaries { .. } => {
                eprintln!();
                eprintln!("Expected a JSON boundary file of the form:");
                eprintln!(r#"  {{ "version": "2024.1", "regions": {{ "us-ca": [[[lon, lat], ...]] }} }}"#);
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run `regionlayer init` to write a commented default config.ini");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Boundaries { path, reason } => {
                write!(f, "Failed to load boundaries from '{}': {}", path, reason)
            }
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::EngineCreation(e) => write!(f, "Failed to create tile engine: {}", e),
            CliError::Render(msg) => write!(f, "Failed to render tile: {}", msg),
            CliError::Encode(e) => write!(f, "Failed to encode tile: {}", e),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::Prewarm(e) => write!(f, "Prewarm failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::EngineCreation(e) => Some(e),
            CliError::Encode(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Prewarm(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Encode(e)
    }
}
