//! Colours and drawing style.

use super::error::ColorParseError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tiny_skia::Color;

/// Straight-alpha 8-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub(crate) fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// How regions are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    /// Fill for regions that are not highlighted
    pub base_fill: Rgba,
    /// Fill for highlighted regions
    pub highlight_fill: Rgba,
    /// Outline colour for every region
    pub border_color: Rgba,
    /// Outline width in pixels; 0 disables outlines
    pub border_width: f32,
    /// Anti-aliased edges (off by default)
    pub anti_alias: bool,
}

impl RenderStyle {
    /// Stable digest of the fields that show up in base tiles.
    ///
    /// The highlight fill is left out: base tiles never draw it.
    pub fn base_digest(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.base_fill.to_array());
        hasher.update(self.border_color.to_array());
        hasher.update(self.border_width.to_bits().to_be_bytes());
        hasher.update([u8::from(self.anti_alias)]);
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            base_fill: Rgba::opaque(217, 217, 217),
            highlight_fill: Rgba::opaque(76, 175, 80),
            border_color: Rgba::opaque(64, 64, 64),
            border_width: 1.0,
            anti_alias: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_digest_tracks_base_fields_only() {
        let style = RenderStyle::default();
        assert_eq!(style.base_digest(), RenderStyle::default().base_digest());

        let recoloured = RenderStyle {
            base_fill: Rgba::opaque(255, 0, 0),
            ..style
        };
        assert_ne!(recoloured.base_digest(), style.base_digest());

        let thicker = RenderStyle {
            border_width: 2.0,
            ..style
        };
        assert_ne!(thicker.base_digest(), style.base_digest());

        let highlight_only = RenderStyle {
            highlight_fill: Rgba::opaque(0, 0, 255),
            ..style
        };
        assert_eq!(highlight_only.base_digest(), style.base_digest());
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!("#4caf50".parse::<Rgba>(), Ok(Rgba::opaque(76, 175, 80)));
        assert_eq!("#FFFFFF".parse::<Rgba>(), Ok(Rgba::opaque(255, 255, 255)));
    }

    #[test]
    fn test_parse_rgba() {
        assert_eq!("#10203040".parse::<Rgba>(), Ok(Rgba::new(16, 32, 48, 64)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "4caf50", "#4caf5", "#4caf5000ff", "#gggggg", "#éé0000"] {
            assert!(bad.parse::<Rgba>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgba::opaque(76, 175, 80).to_string(), "#4caf50");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_default_style() {
        let style = RenderStyle::default();
        assert!(!style.anti_alias);
        assert_eq!(style.base_fill.a, 255);
        assert_ne!(style.base_fill, style.highlight_fill);
    }
}
