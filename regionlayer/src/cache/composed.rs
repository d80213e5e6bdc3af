//! In-memory cache of composed (base + overlay) tiles.

use crate::boundary::BoundaryStore;
use crate::cache::fingerprint::Fingerprint;
use crate::cache::types::ComposedKey;
use crate::cache::CacheStats;
use crate::coord::{GeoBounds, TileKey};
use crate::raster::TileImage;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Default number of composed tiles kept in memory.
pub const DEFAULT_COMPOSED_ENTRIES: usize = 512;

/// Entry in the composed cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    image: TileImage,
    /// Position in the recency order
    tick: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<ComposedKey, CacheEntry>,
    /// Recency order, oldest tick first
    order: BTreeMap<u64, ComposedKey>,
    next_tick: u64,
    stats: CacheStats,
}

impl Inner {
    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn remove(&mut self, key: &ComposedKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.tick);
        Some(entry)
    }

    fn evict_to(&mut self, max_entries: usize) -> u64 {
        let mut evicted = 0;
        while self.entries.len() > max_entries {
            let Some((_, key)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&key);
            evicted += 1;
        }
        evicted
    }
}

/// Bounded, strictly LRU cache of composed tiles.
///
/// Keys carry the overlay fingerprint, so an entry is valid for exactly the
/// highlight overlay it was drawn with. [`ComposedTileCache::invalidate`]
/// frees the entries a highlight change made unreachable, limited to the
/// tiles the changed regions touch.
///
/// All methods take `&self`; the cache is internally synchronized.
pub struct ComposedTileCache {
    inner: Mutex<Inner>,
    max_entries: usize,
}

impl ComposedTileCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries,
        }
    }

    /// Look up a composed tile, marking it most recently used on a hit.
    pub fn get(&self, tile: &TileKey, fingerprint: Fingerprint) -> Option<TileImage> {
        let key = ComposedKey::new(*tile, fingerprint);
        let mut inner = self.inner.lock();

        let Some(old_tick) = inner.entries.get(&key).map(|e| e.tick) else {
            inner.stats.record_composed_miss();
            return None;
        };

        let tick = inner.bump();
        inner.order.remove(&old_tick);
        inner.order.insert(tick, key);
        inner.stats.record_composed_hit();

        let entry = inner.entries.get_mut(&key)?;
        entry.tick = tick;
        Some(entry.image.clone())
    }

    /// Insert or replace a composed tile as most recently used, then evict
    /// least recently used entries beyond the capacity.
    pub fn put(&self, tile: &TileKey, fingerprint: Fingerprint, image: TileImage) {
        let key = ComposedKey::new(*tile, fingerprint);
        let mut inner = self.inner.lock();

        inner.remove(&key);
        let tick = inner.bump();
        inner.order.insert(tick, key);
        inner.entries.insert(key, CacheEntry { image, tick });
        inner.stats.record_composed_insertion();

        let evicted = inner.evict_to(self.max_entries);
        if evicted > 0 {
            inner.stats.record_composed_eviction(evicted);
        }
        let len = inner.entries.len();
        inner.stats.update_composed_size(len);
    }

    /// Presence check that leaves the recency order alone.
    pub fn contains(&self, tile: &TileKey, fingerprint: Fingerprint) -> bool {
        self.inner
            .lock()
            .entries
            .contains_key(&ComposedKey::new(*tile, fingerprint))
    }

    pub fn remove(&self, tile: &TileKey, fingerprint: Fingerprint) -> Option<TileImage> {
        let mut inner = self.inner.lock();
        let removed = inner.remove(&ComposedKey::new(*tile, fingerprint));
        let len = inner.entries.len();
        inner.stats.update_composed_size(len);
        removed.map(|e| e.image)
    }

    /// Evict every entry whose tile intersects a polygon of a changed region.
    ///
    /// Tile bounds are recomputed from each key; a key that cannot produce
    /// bounds is always evicted. Entries no changed region touches keep
    /// their place in the recency order. Returns the number evicted.
    pub fn invalidate<S: AsRef<str>>(&self, changed_ids: &[S], boundaries: &BoundaryStore) -> usize {
        let changed: Vec<GeoBounds> = changed_ids
            .iter()
            .filter_map(|id| boundaries.get(id.as_ref()))
            .flat_map(|region| region.polygons().iter().filter_map(|p| p.bounds().copied()))
            .collect();

        let mut inner = self.inner.lock();
        let doomed: Vec<ComposedKey> = inner
            .entries
            .keys()
            .filter(|key| match key.tile.bounds() {
                Ok(tile_bounds) => changed.iter().any(|b| b.intersects(&tile_bounds)),
                Err(_) => true,
            })
            .copied()
            .collect();

        for key in &doomed {
            inner.remove(key);
        }

        let count = doomed.len();
        inner.stats.record_composed_invalidation(count as u64);
        let len = inner.entries.len();
        inner.stats.update_composed_size(len);

        debug!(
            changed = changed_ids.len(),
            evicted = count,
            remaining = len,
            "Composed cache invalidated"
        );
        count
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
        inner.stats.update_composed_size(0);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<ComposedKey> {
        self.inner.lock().order.values().copied().collect()
    }

    /// Statistics snapshot (composed fields only).
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }
}

impl Default for ComposedTileCache {
    fn default() -> Self {
        Self::new(DEFAULT_COMPOSED_ENTRIES)
    }
}
