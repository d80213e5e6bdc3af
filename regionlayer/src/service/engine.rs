//! Shared tile pipeline: lookup, render, compose, cache.

use super::error::ServiceError;
use crate::boundary::BoundaryStore;
use crate::cache::{
    BaseTileStore, CacheStats, ComposedTileCache, Fingerprint, DEFAULT_COMPOSED_ENTRIES,
};
use crate::coord::TileKey;
use crate::highlight::HighlightSet;
use crate::raster::{RenderStyle, TileImage, TileRasterizer};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Colours and border width
    pub style: RenderStyle,
    /// Capacity of the composed-tile cache
    pub composed_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            style: RenderStyle::default(),
            composed_entries: DEFAULT_COMPOSED_ENTRIES,
        }
    }
}

/// Outcome of a highlight update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Ids newly highlighted, sorted
    pub added: Vec<String>,
    /// Ids no longer highlighted, sorted
    pub removed: Vec<String>,
    /// Composed entries evicted
    pub evicted: usize,
}

impl InvalidationReport {
    /// True when the highlighted set did not change.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Marker the base store is synced to.
///
/// Base tiles depend on the boundary data and on the base-tile style, so
/// both go into the marker; a change to either clears the store.
pub fn base_store_version(boundaries: &BoundaryStore, style: &RenderStyle) -> String {
    format!("{}+{:016x}", boundaries.version(), style.base_digest())
}

/// The tile pipeline shared by every consumer.
///
/// Holds the immutable boundary store, the rasterizer, both cache tiers and
/// the current highlight set. All methods take `&self`; share it in an
/// `Arc`.
pub struct TileEngine {
    boundaries: Arc<BoundaryStore>,
    rasterizer: TileRasterizer,
    base_store: Arc<dyn BaseTileStore>,
    composed: ComposedTileCache,
    highlighted: RwLock<Arc<HighlightSet>>,
    renders: AtomicU64,
    render_failures: AtomicU64,
}

impl TileEngine {
    /// Build an engine and bring the base store in line with the boundary
    /// data version and render style. Stale base tiles are cleared before
    /// anything is served.
    pub fn new(
        boundaries: Arc<BoundaryStore>,
        base_store: Arc<dyn BaseTileStore>,
        config: EngineConfig,
    ) -> Result<Self, ServiceError> {
        let marker = base_store_version(&boundaries, &config.style);
        let cleared = base_store.sync_version(&marker)?;
        info!(
            version = %marker,
            regions = boundaries.len(),
            base_tiles = base_store.entry_count(),
            cleared,
            "Tile engine ready"
        );

        Ok(Self {
            boundaries,
            rasterizer: TileRasterizer::new(config.style),
            base_store,
            composed: ComposedTileCache::new(config.composed_entries),
            highlighted: RwLock::new(Arc::new(HighlightSet::new())),
            renders: AtomicU64::new(0),
            render_failures: AtomicU64::new(0),
        })
    }

    pub fn boundaries(&self) -> &Arc<BoundaryStore> {
        &self.boundaries
    }

    pub fn base_store(&self) -> &Arc<dyn BaseTileStore> {
        &self.base_store
    }

    pub fn composed_cache(&self) -> &ComposedTileCache {
        &self.composed
    }

    /// Snapshot of the current highlight set.
    pub fn highlighted(&self) -> Arc<HighlightSet> {
        Arc::clone(&self.highlighted.read())
    }

    /// Replace the highlight set and evict the composed tiles it affects.
    ///
    /// Only regions whose highlight state flipped are considered; tiles none
    /// of them touch stay cached.
    pub fn update_highlighted_regions<I, S>(&self, ids: I) -> InvalidationReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: Arc<HighlightSet> = Arc::new(ids.into_iter().collect());
        let previous = std::mem::replace(&mut *self.highlighted.write(), Arc::clone(&next));

        let changed = previous.symmetric_difference(&next);
        if changed.is_empty() {
            return InvalidationReport::default();
        }

        let evicted = self.composed.invalidate(&changed, &self.boundaries);
        let (added, removed): (Vec<String>, Vec<String>) =
            changed.into_iter().partition(|id| next.contains(id));

        info!(
            added = added.len(),
            removed = removed.len(),
            evicted,
            highlighted = next.len(),
            "Highlighted regions updated"
        );

        InvalidationReport {
            added,
            removed,
            evicted,
        }
    }

    /// Resolve a tile on the current thread.
    ///
    /// Runs the full pipeline: tile bounds, intersecting highlighted
    /// regions, fingerprint, composed lookup, then base tile and overlay on
    /// a miss. Failures are never cached.
    #[instrument(level = "debug", skip(self), fields(tile = %key))]
    pub fn resolve_blocking(&self, key: &TileKey) -> Result<TileImage, ServiceError> {
        let bounds = key.bounds()?;
        let highlighted = self.highlighted();
        let overlay_ids = highlighted.intersecting(&self.boundaries, &bounds);
        let fingerprint = Fingerprint::of(&overlay_ids);

        if let Some(image) = self.composed.get(key, fingerprint) {
            debug!(fingerprint = %fingerprint, "Composed cache hit");
            return Ok(image);
        }

        let result = self.base_tile_blocking(key).and_then(|base| {
            if overlay_ids.is_empty() {
                return Ok(base);
            }
            self.rasterizer
                .overlay(&base, &self.boundaries, &overlay_ids, key)
                .map_err(ServiceError::from)
        });

        match result {
            Ok(image) => {
                self.composed.put(key, fingerprint, image.clone());
                debug!(
                    fingerprint = %fingerprint,
                    overlays = overlay_ids.len(),
                    "Composed tile cached"
                );
                Ok(image)
            }
            Err(e) => {
                self.render_failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Resolve a tile on the blocking thread pool.
    pub async fn resolve(self: &Arc<Self>, key: TileKey) -> Result<TileImage, ServiceError> {
        let engine = Arc::clone(self);
        tokio::task::spawn_blocking(move || engine.resolve_blocking(&key)).await?
    }

    /// Load the base tile, rendering and storing it when absent.
    ///
    /// A failed store write is logged; the rendered tile is still returned.
    pub fn base_tile_blocking(&self, key: &TileKey) -> Result<TileImage, ServiceError> {
        if let Some(image) = self.base_store.load(key) {
            debug!(tile = %key, "Base tile hit");
            return Ok(image);
        }

        let image = self
            .rasterizer
            .render(&self.boundaries, &HighlightSet::new(), key, false)?;
        self.renders.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.base_store.store(key, &image) {
            warn!(tile = %key, error = %e, "Failed to persist base tile");
        }
        Ok(image)
    }

    /// Drop every composed tile. Base tiles are kept.
    pub fn clear(&self) {
        self.composed.clear();
    }

    /// Combined statistics of both cache tiers and the renderer.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.composed.stats();
        stats.absorb_base(&self.base_store.stats());
        stats.renders = self.renders.load(Ordering::Relaxed);
        stats.render_failures = self.render_failures.load(Ordering::Relaxed);
        stats
    }
}
