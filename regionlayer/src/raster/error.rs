//! Rendering errors.

use crate::coord::CoordError;
use thiserror::Error;

/// Errors produced while rendering or encoding a tile.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The tile key is outside the grid of its zoom level
    #[error("Invalid tile: {0}")]
    InvalidTile(#[from] CoordError),

    /// The raster surface could not be allocated
    #[error("Failed to allocate {width}x{height} raster surface")]
    Allocation { width: u32, height: u32 },

    /// Image data has the wrong size for a tile
    #[error("Unexpected image size {width}x{height}, expected {expected}x{expected}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: u32,
    },

    /// PNG encoding or decoding failed
    #[error("PNG codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// A colour string that is not `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid colour '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ColorParseError(pub String);
