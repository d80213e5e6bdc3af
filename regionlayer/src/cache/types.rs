//! Core types for the cache system.

use super::fingerprint::Fingerprint;
use crate::coord::TileKey;
use crate::raster::RenderError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Key of a composed tile: the tile plus the overlay it was drawn with.
///
/// Two requests for the same tile share an entry only when the highlighted
/// regions intersecting that tile are the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComposedKey {
    pub tile: TileKey,
    pub fingerprint: Fingerprint,
}

impl ComposedKey {
    pub fn new(tile: TileKey, fingerprint: Fingerprint) -> Self {
        Self { tile, fingerprint }
    }
}

impl fmt::Display for ComposedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tile, self.fingerprint)
    }
}

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error on a cache file or directory
    #[error("Cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tile could not be encoded for storage
    #[error("Failed to encode tile {tile}: {source}")]
    Encode {
        tile: TileKey,
        #[source]
        source: RenderError,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composed_key_equality() {
        let tile = TileKey::new(4, 3, 6);
        let a = ComposedKey::new(tile, Fingerprint::None);
        let b = ComposedKey::new(tile, Fingerprint::None);
        let c = ComposedKey::new(tile, Fingerprint::of(["us-ca"]));
        let d = ComposedKey::new(TileKey::new(4, 3, 7), Fingerprint::None);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_composed_key_display() {
        let key = ComposedKey::new(TileKey::new(4, 3, 6), Fingerprint::None);
        assert_eq!(key.to_string(), "4/3/6#none");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = CacheError::io(
            "/tmp/tiles",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/tiles"));
        assert!(message.contains("disk full"));
    }
}
