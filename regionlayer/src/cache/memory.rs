//! Process-lifetime base tile store.

use crate::cache::r#trait::BaseTileStore;
use crate::cache::types::CacheError;
use crate::cache::CacheStats;
use crate::coord::TileKey;
use crate::raster::TileImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::warn;

/// Base tile store kept in memory for the life of the process.
///
/// Tiles are held as PNG bytes, the same representation the disk store
/// writes, so both stores behave identically for corrupt entries.
pub struct MemoryTileStore {
    tiles: Mutex<HashMap<TileKey, Vec<u8>>>,
    version: Mutex<Option<String>>,
    stats: Mutex<CacheStats>,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self {
            tiles: Mutex::new(HashMap::new()),
            version: Mutex::new(None),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Total bytes of encoded tiles held.
    pub fn size_bytes(&self) -> u64 {
        self.tiles.lock().values().map(|b| b.len() as u64).sum()
    }

    /// Replace a stored entry with raw bytes.
    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: TileKey, bytes: Vec<u8>) {
        self.tiles.lock().insert(key, bytes);
    }

    fn refresh_size(&self, tiles: &HashMap<TileKey, Vec<u8>>) {
        let bytes = tiles.values().map(|b| b.len() as u64).sum();
        self.stats.lock().update_base_size(bytes, tiles.len());
    }
}

impl Default for MemoryTileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseTileStore for MemoryTileStore {
    fn contains(&self, key: &TileKey) -> bool {
        self.tiles.lock().contains_key(key)
    }

    fn load(&self, key: &TileKey) -> Option<TileImage> {
        let bytes = self.tiles.lock().get(key).cloned();
        let Some(bytes) = bytes else {
            self.stats.lock().record_base_miss();
            return None;
        };

        match TileImage::decode_png(&bytes) {
            Ok(image) => {
                self.stats.lock().record_base_hit();
                Some(image)
            }
            Err(e) => {
                warn!(tile = %key, error = %e, "Removing corrupt base tile");
                let mut tiles = self.tiles.lock();
                tiles.remove(key);
                self.refresh_size(&tiles);
                let mut stats = self.stats.lock();
                stats.record_base_corrupt_entry();
                stats.record_base_miss();
                None
            }
        }
    }

    fn store(&self, key: &TileKey, image: &TileImage) -> Result<(), CacheError> {
        let bytes = match image.encode_png() {
            Ok(bytes) => bytes,
            Err(source) => {
                self.stats.lock().record_base_write_failure();
                return Err(CacheError::Encode { tile: *key, source });
            }
        };

        let mut tiles = self.tiles.lock();
        tiles.insert(*key, bytes);
        self.refresh_size(&tiles);
        self.stats.lock().record_base_write();
        Ok(())
    }

    fn clear_all(&self) -> Result<(), CacheError> {
        let mut tiles = self.tiles.lock();
        tiles.clear();
        self.refresh_size(&tiles);
        self.stats.lock().record_base_clear();
        Ok(())
    }

    fn data_version(&self) -> Option<String> {
        self.version.lock().clone()
    }

    fn set_data_version(&self, version: &str) -> Result<(), CacheError> {
        *self.version.lock() = Some(version.to_string());
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.tiles.lock().len()
    }

    fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn create_test_key(x: u32) -> TileKey {
        TileKey::new(10, x, 400)
    }

    fn solid(value: u8) -> TileImage {
        TileImage::from_rgba(RgbaImage::from_pixel(256, 256, image::Rgba([value, 0, 0, 255])))
            .unwrap()
    }

    #[test]
    fn test_store_and_load() {
        let store = MemoryTileStore::new();
        let key = create_test_key(1);

        assert!(store.load(&key).is_none());
        store.store(&key, &solid(9)).unwrap();

        assert!(store.contains(&key));
        assert_eq!(store.load(&key), Some(solid(9)));
        assert_eq!(store.entry_count(), 1);
        assert!(store.size_bytes() > 0);

        let stats = store.stats();
        assert_eq!(stats.base_hits, 1);
        assert_eq!(stats.base_misses, 1);
        assert_eq!(stats.base_writes, 1);
        assert_eq!(stats.base_entry_count, 1);
    }

    #[test]
    fn test_corrupt_entry_removed() {
        let store = MemoryTileStore::new();
        let key = create_test_key(2);
        store.put_raw(key, b"garbage".to_vec());

        assert!(store.load(&key).is_none());
        assert!(!store.contains(&key));
        assert_eq!(store.stats().base_corrupt_entries, 1);
    }

    #[test]
    fn test_sync_version() {
        let store = MemoryTileStore::new();
        let key = create_test_key(3);

        // First sync on an unmarked store clears (nothing) and records the marker
        assert!(store.sync_version("v1").unwrap());
        store.store(&key, &solid(1)).unwrap();

        assert!(!store.sync_version("v1").unwrap());
        assert!(store.contains(&key));

        assert!(store.sync_version("v2").unwrap());
        assert!(!store.contains(&key));
        assert_eq!(store.data_version().as_deref(), Some("v2"));
    }
}
