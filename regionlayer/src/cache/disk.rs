//! Disk-backed base tile store.

use crate::cache::path::{parse_tile_path, tile_path, tiles_directory, version_path};
use crate::cache::r#trait::BaseTileStore;
use crate::cache::types::CacheError;
use crate::cache::CacheStats;
use crate::coord::TileKey;
use crate::raster::TileImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Extension of in-progress writes; never parsed as tiles.
const TEMP_EXTENSION: &str = "tmp";

/// Base tile store writing PNG files below a root directory.
///
/// The index of stored tiles (key → file size) is rebuilt by scanning the
/// directory when the store is opened. Writes go to a temporary file in the
/// target directory and are renamed into place, so readers never observe a
/// partially written tile.
pub struct DiskTileStore {
    root: PathBuf,
    index: Mutex<HashMap<TileKey, u64>>,
    stats: Mutex<CacheStats>,
    temp_counter: AtomicU64,
}

impl DiskTileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        let tiles_dir = tiles_directory(&root);
        fs::create_dir_all(&tiles_dir).map_err(|e| CacheError::io(&tiles_dir, e))?;

        let store = Self {
            root,
            index: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::new()),
            temp_counter: AtomicU64::new(0),
        };
        store.scan()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total bytes of stored tiles.
    pub fn size_bytes(&self) -> u64 {
        self.index.lock().values().sum()
    }

    /// Rebuild the index from the files on disk.
    fn scan(&self) -> Result<(), CacheError> {
        let tiles_dir = tiles_directory(&self.root);
        let mut found = HashMap::new();
        scan_directory(&tiles_dir, &tiles_dir, &mut found)?;

        let mut index = self.index.lock();
        *index = found;
        self.refresh_size(&index);

        debug!(
            root = %self.root.display(),
            entries = index.len(),
            "Scanned base tile store"
        );
        Ok(())
    }

    fn refresh_size(&self, index: &HashMap<TileKey, u64>) {
        let bytes = index.values().sum();
        self.stats.lock().update_base_size(bytes, index.len());
    }

    /// Remove an entry whose file could not be read back.
    fn discard(&self, key: &TileKey, path: &Path, reason: &str) {
        warn!(tile = %key, path = %path.display(), reason = %reason, "Removing corrupt base tile");
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to delete corrupt base tile");
            }
        }

        let mut index = self.index.lock();
        index.remove(key);
        self.refresh_size(&index);
        self.stats.lock().record_base_corrupt_entry();
    }

    fn temp_path(&self, target: &Path) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let mut name = target
            .file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.{}", n, TEMP_EXTENSION));
        target.with_file_name(name)
    }

    fn write_atomic(&self, target: &Path, bytes: &[u8]) -> Result<(), CacheError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
        }
        let temp = self.temp_path(target);
        fs::write(&temp, bytes).map_err(|e| CacheError::io(&temp, e))?;
        fs::rename(&temp, target).map_err(|e| {
            let _ = fs::remove_file(&temp);
            CacheError::io(target, e)
        })
    }
}

/// Walk `dir` collecting tile files; stale temporary files are deleted.
fn scan_directory(
    tiles_dir: &Path,
    dir: &Path,
    found: &mut HashMap<TileKey, u64>,
) -> Result<(), CacheError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(CacheError::io(dir, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| CacheError::io(dir, e))?;
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            scan_directory(tiles_dir, &path, found)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some(TEMP_EXTENSION) {
            let _ = fs::remove_file(&path);
        } else if let Some(key) = parse_tile_path(tiles_dir, &path) {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            found.insert(key, size);
        }
    }
    Ok(())
}

impl BaseTileStore for DiskTileStore {
    fn contains(&self, key: &TileKey) -> bool {
        self.index.lock().contains_key(key)
    }

    fn load(&self, key: &TileKey) -> Option<TileImage> {
        if !self.contains(key) {
            self.stats.lock().record_base_miss();
            return None;
        }

        let path = tile_path(&self.root, key);
        let decoded = match fs::read(&path) {
            Ok(bytes) => TileImage::decode_png(&bytes).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match decoded {
            Ok(image) => {
                self.stats.lock().record_base_hit();
                Some(image)
            }
            Err(reason) => {
                self.discard(key, &path, &reason);
                self.stats.lock().record_base_miss();
                None
            }
        }
    }

    fn store(&self, key: &TileKey, image: &TileImage) -> Result<(), CacheError> {
        let result = image
            .encode_png()
            .map_err(|source| CacheError::Encode { tile: *key, source })
            .and_then(|bytes| {
                let path = tile_path(&self.root, key);
                self.write_atomic(&path, &bytes)?;
                Ok(bytes.len() as u64)
            });

        match result {
            Ok(size) => {
                let mut index = self.index.lock();
                index.insert(*key, size);
                self.refresh_size(&index);
                self.stats.lock().record_base_write();
                Ok(())
            }
            Err(e) => {
                self.stats.lock().record_base_write_failure();
                Err(e)
            }
        }
    }

    fn clear_all(&self) -> Result<(), CacheError> {
        let mut index = self.index.lock();
        let tiles_dir = tiles_directory(&self.root);

        match fs::remove_dir_all(&tiles_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io(&tiles_dir, e)),
        }
        fs::create_dir_all(&tiles_dir).map_err(|e| CacheError::io(&tiles_dir, e))?;

        index.clear();
        self.refresh_size(&index);
        self.stats.lock().record_base_clear();
        Ok(())
    }

    fn data_version(&self) -> Option<String> {
        fs::read_to_string(version_path(&self.root))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn set_data_version(&self, version: &str) -> Result<(), CacheError> {
        self.write_atomic(&version_path(&self.root), format!("{}\n", version).as_bytes())
    }

    fn entry_count(&self) -> usize {
        self.index.lock().len()
    }

    fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}
