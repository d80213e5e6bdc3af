//! User configuration loaded from `~/.regionlayer/config.ini`.
//!
//! # Example
//!
//! ```
//! use regionlayer::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let engine_config = config.engine_config();
//! assert_eq!(engine_config.composed_entries, config.cache.memory_entries);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_cache_directory, DEFAULT_CONCURRENCY, DEFAULT_LOG_FILE, DEFAULT_MAX_POINTS,
    DEFAULT_MEMORY_ENTRIES, MAX_BORDER_WIDTH,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    BoundarySettings, CacheSettings, ConfigFile, LoggingSettings, PrewarmSettings,
    RenderSettings,
};
