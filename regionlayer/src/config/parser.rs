//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::{MAX_BORDER_WIDTH, MIN_MAX_POINTS, MIN_MEMORY_ENTRIES};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::raster::Rgba;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("memory_entries") {
            config.cache.memory_entries = parse_at_least(
                "cache",
                "memory_entries",
                v,
                MIN_MEMORY_ENTRIES,
            )?;
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("base_fill") {
            config.render.base_fill = parse_color("base_fill", v)?;
        }
        if let Some(v) = section.get("highlight_fill") {
            config.render.highlight_fill = parse_color("highlight_fill", v)?;
        }
        if let Some(v) = section.get("border_color") {
            config.render.border_color = parse_color("border_color", v)?;
        }
        if let Some(v) = section.get("border_width") {
            config.render.border_width = v
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|w| w.is_finite() && (0.0..=MAX_BORDER_WIDTH).contains(w))
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "render".to_string(),
                    key: "border_width".to_string(),
                    value: v.to_string(),
                    reason: format!("must be a number between 0 and {}", MAX_BORDER_WIDTH),
                })?;
        }
        if let Some(v) = section.get("anti_alias") {
            config.render.anti_alias = parse_bool(v);
        }
    }

    // [boundaries] section
    if let Some(section) = ini.section(Some("boundaries")) {
        if let Some(v) = section.get("max_polygon_points") {
            config.boundaries.max_polygon_points =
                parse_at_least("boundaries", "max_polygon_points", v, MIN_MAX_POINTS)?;
        }
    }

    // [prewarm] section
    if let Some(section) = ini.section(Some("prewarm")) {
        if let Some(v) = section.get("concurrency") {
            config.prewarm.concurrency = parse_at_least("prewarm", "concurrency", v, 1)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_at_least(
    section: &str,
    key: &str,
    value: &str,
    min: usize,
) -> Result<usize, ConfigFileError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= min)
        .ok_or_else(|| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be an integer of at least {}", min),
        })
}

fn parse_color(key: &str, value: &str) -> Result<Rgba, ConfigFileError> {
    Rgba::from_str(value).map_err(|_| ConfigFileError::InvalidValue {
        section: "render".to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a colour like '#4caf50' or '#4caf5080'".to_string(),
    })
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
