//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::{DEFAULT_CONCURRENCY, DEFAULT_MAX_POINTS, DEFAULT_MEMORY_ENTRIES};
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[cache]
; Base tile store directory. Tiles are stored in <directory>/tiles/<z>/<x>/<y>.png
; Base tiles are cleared automatically when the boundary data version changes
directory = {}
; Composed (highlighted) tiles kept in memory, least recently used evicted first
; (default: {})
memory_entries = {}

[render]
; Colours are #RRGGBB or #RRGGBBAA
; Fill for regions that are not highlighted
base_fill = {}
; Fill for highlighted regions
highlight_fill = {}
; Outline colour for every region
border_color = {}
; Outline width in pixels, 0 disables outlines (default: 1.0)
border_width = {}
; Anti-aliased edges: true or false (default: false)
anti_alias = {}

[boundaries]
; Polygon rings with more points than this are decimated (default: {})
max_polygon_points = {}

[prewarm]
; Base tiles rendered concurrently by `regionlayer prewarm` (default: {})
concurrency = {}

[logging]
; Log file path, cleared at the start of every run
file = {}
"#,
        path_to_string(&config.cache.directory),
        DEFAULT_MEMORY_ENTRIES,
        config.cache.memory_entries,
        config.render.base_fill,
        config.render.highlight_fill,
        config.render.border_color,
        config.render.border_width,
        config.render.anti_alias,
        DEFAULT_MAX_POINTS,
        config.boundaries.max_polygon_points,
        DEFAULT_CONCURRENCY,
        config.prewarm.concurrency,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to display string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use super::*;
    use crate::raster::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.cache.directory = temp_dir.path().join("tiles-cache");
        config.cache.memory_entries = 2000;
        config.render.highlight_fill = Rgba::new(255, 64, 0, 200);
        config.render.border_width = 0.5;
        config.render.anti_alias = true;
        config.boundaries.max_polygon_points = 250;
        config.prewarm.concurrency = 2;

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();
        assert_eq!(
            ConfigFile::load_from(&config_path).unwrap(),
            ConfigFile::default()
        );
    }

    #[test]
    fn test_output_is_commented() {
        let content = to_config_string(&ConfigFile::default());
        for section in ["[cache]", "[render]", "[boundaries]", "[prewarm]", "[logging]"] {
            assert!(content.contains(section), "missing {}", section);
        }
        assert!(content.contains("highlight_fill = #4caf50"));
        assert!(content.lines().any(|l| l.starts_with(';')));
    }

    #[test]
    fn test_path_to_string_collapses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("x/y")), "~/x/y");
        }
        assert_eq!(path_to_string(Path::new("/tmp/tiles")), "/tmp/tiles");
    }
}
