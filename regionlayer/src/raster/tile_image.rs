//! Immutable tile images and their PNG codec.

use super::error::RenderError;
use crate::coord::TILE_SIZE;
use image::{ImageFormat, Rgba, RgbaImage};
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::{ColorU8, Pixmap};

/// A rendered 256x256 RGBA tile.
///
/// Pixels are stored with straight (non-premultiplied) alpha. Cloning is
/// cheap: the pixel buffer is shared.
#[derive(Clone)]
pub struct TileImage {
    pixels: Arc<RgbaImage>,
}

impl TileImage {
    /// Wrap an RGBA buffer, checking that it has tile dimensions.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, RenderError> {
        if pixels.width() != TILE_SIZE || pixels.height() != TILE_SIZE {
            return Err(RenderError::InvalidDimensions {
                width: pixels.width(),
                height: pixels.height(),
                expected: TILE_SIZE,
            });
        }
        Ok(Self {
            pixels: Arc::new(pixels),
        })
    }

    /// A fully transparent tile.
    pub fn transparent() -> Self {
        Self {
            pixels: Arc::new(RgbaImage::new(TILE_SIZE, TILE_SIZE)),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The `[r, g, b, a]` value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the tile.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    #[inline]
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Raw pixel bytes in row-major RGBA order.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// True when both handles share the same pixel buffer.
    #[inline]
    pub fn ptr_eq(&self, other: &TileImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Encode as PNG. RGBA8 PNG is lossless.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Decode PNG bytes produced by [`TileImage::encode_png`].
    pub fn decode_png(bytes: &[u8]) -> Result<Self, RenderError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
        Self::from_rgba(decoded.into_rgba8())
    }

    pub(crate) fn from_pixmap(pixmap: &Pixmap) -> Result<Self, RenderError> {
        let mut pixels = RgbaImage::new(pixmap.width(), pixmap.height());
        for (dst, src) in pixels.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self::from_rgba(pixels)
    }

    pub(crate) fn to_pixmap(&self) -> Result<Pixmap, RenderError> {
        let mut pixmap = Pixmap::new(self.width(), self.height()).ok_or(RenderError::Allocation {
            width: self.width(),
            height: self.height(),
        })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.pixels.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(pixmap)
    }
}

impl PartialEq for TileImage {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_raw() == other.as_raw()
    }
}

impl Eq for TileImage {}

impl fmt::Debug for TileImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> TileImage {
        let pixels = RgbaImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| {
            Rgba([x as u8, y as u8, (x ^ y) as u8, 255])
        });
        TileImage::from_rgba(pixels).unwrap()
    }

    #[test]
    fn test_png_is_lossless() {
        let image = gradient();
        let bytes = image.encode_png().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = TileImage::decode_png(&bytes).unwrap();
        assert_eq!(decoded, image);
        assert!(!decoded.ptr_eq(&image));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let result = TileImage::from_rgba(RgbaImage::new(128, 256));
        assert!(matches!(
            result,
            Err(RenderError::InvalidDimensions { width: 128, .. })
        ));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            TileImage::decode_png(b"not a png"),
            Err(RenderError::Codec(_))
        ));
    }

    #[test]
    fn test_pixmap_conversion_keeps_opaque_pixels() {
        let image = gradient();
        let pixmap = image.to_pixmap().unwrap();
        let back = TileImage::from_pixmap(&pixmap).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_transparent() {
        let image = TileImage::transparent();
        assert_eq!(image.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(image.pixel(255, 255), [0, 0, 0, 0]);
    }

    #[test]
    fn test_clone_shares_buffer() {
        let image = gradient();
        let clone = image.clone();
        assert!(image.ptr_eq(&clone));
    }
}
