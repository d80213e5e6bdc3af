//! Base tile store trait for dependency injection.

use crate::cache::types::CacheError;
use crate::cache::CacheStats;
use crate::coord::TileKey;
use crate::raster::TileImage;
use tracing::info;

/// Persistent storage for base tiles (all regions, no highlight overlay).
///
/// Base tiles depend only on the boundary data, never on the highlighted
/// set, so they can outlive the process. The data version marker records
/// which boundary data the stored tiles were rendered from.
///
/// Implementations are internally synchronized and shared behind `Arc`.
pub trait BaseTileStore: Send + Sync {
    /// Whether a tile is stored.
    fn contains(&self, key: &TileKey) -> bool;

    /// Load a stored tile.
    ///
    /// Unreadable or corrupt entries are removed and reported as a miss.
    fn load(&self, key: &TileKey) -> Option<TileImage>;

    /// Store a tile, replacing any previous entry.
    fn store(&self, key: &TileKey, image: &TileImage) -> Result<(), CacheError>;

    /// Remove every stored tile. The version marker is left untouched.
    fn clear_all(&self) -> Result<(), CacheError>;

    /// The stored data version, `None` when no marker exists.
    fn data_version(&self) -> Option<String>;

    /// Record the data version of the stored tiles.
    fn set_data_version(&self, version: &str) -> Result<(), CacheError>;

    /// Number of stored tiles.
    fn entry_count(&self) -> usize;

    /// Statistics snapshot (base-store fields only).
    fn stats(&self) -> CacheStats;

    /// Make the store consistent with `current`.
    ///
    /// When the stored marker differs from `current`, or is missing, every
    /// tile is cleared and the new marker written. Returns whether a clear
    /// happened.
    fn sync_version(&self, current: &str) -> Result<bool, CacheError> {
        let stored = self.data_version();
        if stored.as_deref() == Some(current) {
            return Ok(false);
        }

        self.clear_all()?;
        self.set_data_version(current)?;
        info!(
            previous = stored.as_deref().unwrap_or("<none>"),
            current, "Base tile store cleared for new data version"
        );
        Ok(true)
    }
}

/// Store that never keeps anything.
///
/// Every load misses, so every base tile is rendered. Useful for one-shot
/// rendering and for measuring render cost.
#[derive(Debug, Clone, Default)]
pub struct NoOpTileStore;

impl NoOpTileStore {
    pub fn new() -> Self {
        Self
    }
}

impl BaseTileStore for NoOpTileStore {
    fn contains(&self, _key: &TileKey) -> bool {
        false
    }

    fn load(&self, _key: &TileKey) -> Option<TileImage> {
        None
    }

    fn store(&self, _key: &TileKey, _image: &TileImage) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear_all(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn data_version(&self) -> Option<String> {
        None
    }

    fn set_data_version(&self, _version: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn entry_count(&self) -> usize {
        0
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new()
    }
}
