//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::raster::Rgba;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Tile cache settings
    pub cache: CacheSettings,
    /// Colours and border style
    pub render: RenderSettings,
    /// Boundary loading limits
    pub boundaries: BoundarySettings,
    /// Bulk base-tile rendering
    pub prewarm: PrewarmSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Base tile store directory. Tiles live in `<directory>/tiles/`
    pub directory: PathBuf,
    /// Maximum composed tiles kept in memory
    pub memory_entries: usize,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub base_fill: Rgba,
    pub highlight_fill: Rgba,
    pub border_color: Rgba,
    /// Border stroke width in pixels; 0 disables borders
    pub border_width: f32,
    pub anti_alias: bool,
}

/// Boundary configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySettings {
    /// Rings longer than this are decimated
    pub max_polygon_points: usize,
}

/// Prewarm configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PrewarmSettings {
    /// Concurrent base-tile renders
    pub concurrency: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
