//! Boundary store: immutable region polygons keyed by identifier.
//!
//! The store is built once from the loader's output and shared read-only
//! between the rasterizer, the composed cache and the request coordinator.
//!
//! # Construction
//!
//! ```text
//! loader rings ──► drop invalid points ──► decimate ──► merge duplicate ids
//!                   (warn with count)      (stride)     (first position wins)
//! ```
//!
//! Iteration follows the order in which identifiers first appeared, which is
//! also the draw order of the rasterizer.
//!
//! # Example
//!
//! ```
//! use regionlayer::boundary::BoundaryStore;
//! use regionlayer::coord::GeoCoord;
//!
//! let square = vec![
//!     GeoCoord::new(0.0, 0.0),
//!     GeoCoord::new(0.0, 1.0),
//!     GeoCoord::new(1.0, 1.0),
//!     GeoCoord::new(1.0, 0.0),
//! ];
//! let store = BoundaryStore::from_rings("v1", 500, vec![("sq".to_string(), vec![square])]);
//!
//! assert_eq!(store.len(), 1);
//! assert!(store.get("sq").is_some());
//! ```

mod types;

pub use types::{decimate, Polygon, Region, DEFAULT_MAX_POLYGON_POINTS};

use crate::coord::{GeoBounds, GeoCoord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Immutable mapping from region identifier to polygons.
#[derive(Debug, Clone, Default)]
pub struct BoundaryStore {
    version: String,
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl BoundaryStore {
    /// Create an empty store with the given data version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Build a store from raw loader rings.
    ///
    /// Each item is a region identifier with its rings. Invalid points
    /// (non-finite, |lat| > 90, |lon| > 180) are dropped, rings are decimated
    /// to `max_points`, and repeated identifiers merge into the first
    /// occurrence. A region whose rings are all empty is kept with no
    /// drawable polygons.
    pub fn from_rings<I>(version: impl Into<String>, max_points: usize, regions: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Vec<GeoCoord>>)>,
    {
        let mut store = Self::new(version);
        let mut dropped_total = 0usize;

        for (id, rings) in regions {
            let mut dropped = 0usize;
            let polygons: Vec<Polygon> = rings
                .into_iter()
                .map(|ring| {
                    let before = ring.len();
                    let valid: Vec<GeoCoord> = ring.into_iter().filter(GeoCoord::is_valid).collect();
                    dropped += before - valid.len();
                    Polygon::new(decimate(valid, max_points))
                })
                .collect();

            if dropped > 0 {
                warn!(region = %id, dropped, "Dropped invalid boundary points");
                dropped_total += dropped;
            }

            store.insert(id, polygons);
        }

        debug!(
            version = %store.version,
            regions = store.regions.len(),
            dropped = dropped_total,
            "Boundary store built"
        );
        store
    }

    /// Add polygons for a region, merging into an existing entry.
    fn insert(&mut self, id: String, polygons: Vec<Polygon>) {
        match self.index.get(&id) {
            Some(&pos) => self.regions[pos].extend(polygons),
            None => {
                self.index.insert(id.clone(), self.regions.len());
                self.regions.push(Region::new(id, polygons));
            }
        }
    }

    /// Data version used to validate the persistent base-tile store.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.index.get(id).map(|&pos| &self.regions[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All regions in insertion order.
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Regions with at least one polygon whose bounding box overlaps `area`.
    pub fn intersecting<'a>(&'a self, area: &'a GeoBounds) -> impl Iterator<Item = &'a Region> + 'a {
        self.regions.iter().filter(move |r| r.intersects(area))
    }

    /// Union of every region's bounds, `None` when nothing has geometry.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let all: Vec<GeoCoord> = self
            .regions
            .iter()
            .filter_map(Region::bounds)
            .flat_map(|b| {
                [
                    GeoCoord::new(b.min_lat, b.min_lon),
                    GeoCoord::new(b.max_lat, b.max_lon),
                ]
            })
            .collect();
        GeoBounds::from_coords(&all)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of polygons across all regions.
    pub fn polygon_count(&self) -> usize {
        self.regions.iter().map(|r| r.polygons().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lat: f64, lon: f64, size: f64) -> Vec<GeoCoord> {
        vec![
            GeoCoord::new(lat, lon),
            GeoCoord::new(lat, lon + size),
            GeoCoord::new(lat + size, lon + size),
            GeoCoord::new(lat + size, lon),
        ]
    }

    #[test]
    fn test_lookup_and_order() {
        let store = BoundaryStore::from_rings(
            "v1",
            DEFAULT_MAX_POLYGON_POINTS,
            vec![
                ("b".to_string(), vec![square(0.0, 0.0, 1.0)]),
                ("a".to_string(), vec![square(5.0, 5.0, 1.0)]),
            ],
        );

        assert_eq!(store.version(), "v1");
        assert_eq!(store.len(), 2);
        let ids: Vec<&str> = store.regions().iter().map(Region::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(store.get("a").is_some());
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_invalid_points_dropped() {
        let mut ring = square(10.0, 10.0, 1.0);
        ring.push(GeoCoord::new(f64::NAN, 0.0));
        ring.push(GeoCoord::new(0.0, 200.0));
        ring.push(GeoCoord::new(-91.0, 0.0));

        let store = BoundaryStore::from_rings("v1", 500, vec![("r".to_string(), vec![ring])]);
        let region = store.get("r").unwrap();
        assert_eq!(region.polygons()[0].len(), 4);
    }

    #[test]
    fn test_duplicate_ids_merge() {
        let store = BoundaryStore::from_rings(
            "v1",
            500,
            vec![
                ("r".to_string(), vec![square(0.0, 0.0, 1.0)]),
                ("other".to_string(), vec![square(3.0, 3.0, 1.0)]),
                ("r".to_string(), vec![square(9.0, 9.0, 1.0)]),
            ],
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.regions()[0].id(), "r");
        assert_eq!(store.get("r").unwrap().polygons().len(), 2);
        assert_eq!(store.polygon_count(), 3);
    }

    #[test]
    fn test_region_without_polygons_is_kept() {
        let store = BoundaryStore::from_rings(
            "v1",
            500,
            vec![("empty".to_string(), vec![]), ("blank".to_string(), vec![vec![]])],
        );

        assert_eq!(store.len(), 2);
        let world = GeoBounds::new(-90.0, 90.0, -180.0, 180.0);
        assert_eq!(store.intersecting(&world).count(), 0);
        assert!(store.bounds().is_none());
    }

    #[test]
    fn test_rings_decimated() {
        let ring: Vec<GeoCoord> = (0..2000)
            .map(|i| GeoCoord::new((i as f64 / 2000.0) * 10.0, (i % 7) as f64))
            .collect();
        let store = BoundaryStore::from_rings("v1", 100, vec![("r".to_string(), vec![ring])]);
        assert!(store.get("r").unwrap().polygons()[0].len() <= 100);
    }

    #[test]
    fn test_intersecting() {
        let store = BoundaryStore::from_rings(
            "v1",
            500,
            vec![
                ("west".to_string(), vec![square(0.0, -10.0, 2.0)]),
                ("east".to_string(), vec![square(0.0, 10.0, 2.0)]),
            ],
        );

        let area = GeoBounds::new(-1.0, 1.0, 9.0, 11.0);
        let hits: Vec<&str> = store.intersecting(&area).map(Region::id).collect();
        assert_eq!(hits, vec!["east"]);

        assert_eq!(store.bounds(), Some(GeoBounds::new(0.0, 2.0, -10.0, 12.0)));
    }
}
