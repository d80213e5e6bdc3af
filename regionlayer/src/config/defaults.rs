//! Default values and constants for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::boundary::DEFAULT_MAX_POLYGON_POINTS;
use crate::cache::DEFAULT_COMPOSED_ENTRIES;
use crate::raster::RenderStyle;
use crate::service::DEFAULT_PREWARM_CONCURRENCY;

/// Default composed tiles kept in memory.
pub const DEFAULT_MEMORY_ENTRIES: usize = DEFAULT_COMPOSED_ENTRIES;

/// Smallest accepted composed-cache capacity.
pub const MIN_MEMORY_ENTRIES: usize = 1;

/// Default decimation threshold for boundary rings.
pub const DEFAULT_MAX_POINTS: usize = DEFAULT_MAX_POLYGON_POINTS;

/// Smallest accepted decimation threshold. A ring needs 3 points to draw.
pub const MIN_MAX_POINTS: usize = 3;

/// Default concurrent pre-warm renders.
pub const DEFAULT_CONCURRENCY: usize = DEFAULT_PREWARM_CONCURRENCY;

/// Upper bound for border widths, in pixels.
pub const MAX_BORDER_WIDTH: f32 = 32.0;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "regionlayer.log";

/// Default base tile store directory (`<platform cache dir>/regionlayer`).
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("regionlayer")
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();
        let style = RenderStyle::default();

        Self {
            cache: CacheSettings {
                directory: default_cache_directory(),
                memory_entries: DEFAULT_MEMORY_ENTRIES,
            },
            render: RenderSettings {
                base_fill: style.base_fill,
                highlight_fill: style.highlight_fill,
                border_color: style.border_color,
                border_width: style.border_width,
                anti_alias: style.anti_alias,
            },
            boundaries: BoundarySettings {
                max_polygon_points: DEFAULT_MAX_POINTS,
            },
            prewarm: PrewarmSettings {
                concurrency: DEFAULT_CONCURRENCY,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE),
            },
        }
    }
}
