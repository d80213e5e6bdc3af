//! Configuration file handling for ~/.regionlayer/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;
use crate::raster::RenderStyle;
use crate::service::{EngineConfig, PrewarmConfig};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.regionlayer/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.regionlayer/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// The render style described by `[render]`.
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            base_fill: self.render.base_fill,
            highlight_fill: self.render.highlight_fill,
            border_color: self.render.border_color,
            border_width: self.render.border_width,
            anti_alias: self.render.anti_alias,
        }
    }

    /// Engine parameters built from `[render]` and `[cache]`.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            style: self.render_style(),
            composed_entries: self.cache.memory_entries,
        }
    }

    /// Pre-warm parameters for a zoom range, with `[prewarm]` concurrency.
    pub fn prewarm_config(&self, min_zoom: u8, max_zoom: u8) -> PrewarmConfig {
        PrewarmConfig::new(min_zoom, max_zoom).with_concurrency(self.prewarm.concurrency)
    }
}

/// Get the path to the config directory (~/.regionlayer).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".regionlayer")
}

/// Get the path to the config file (~/.regionlayer/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::raster::Rgba;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.cache.memory_entries, DEFAULT_MEMORY_ENTRIES);
        assert!(config.cache.directory.ends_with("regionlayer"));
        assert_eq!(config.boundaries.max_polygon_points, DEFAULT_MAX_POINTS);
        assert_eq!(config.prewarm.concurrency, DEFAULT_CONCURRENCY);
        assert!(config.logging.file.ends_with(DEFAULT_LOG_FILE));
        assert_eq!(config.render_style(), RenderStyle::default());
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_engine_config() {
        let mut config = ConfigFile::default();
        config.cache.memory_entries = 64;
        config.render.highlight_fill = Rgba::opaque(255, 0, 0);

        let engine = config.engine_config();
        assert_eq!(engine.composed_entries, 64);
        assert_eq!(engine.style.highlight_fill, Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn test_prewarm_config() {
        let mut config = ConfigFile::default();
        config.prewarm.concurrency = 3;

        let prewarm = config.prewarm_config(2, 5);
        assert_eq!(prewarm.min_zoom, 2);
        assert_eq!(prewarm.max_zoom, 5);
        assert_eq!(prewarm.concurrency, 3);
        assert!(prewarm.bounds.is_none());
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".regionlayer/config.ini"));
    }
}
