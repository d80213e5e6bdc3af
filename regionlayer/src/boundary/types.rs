//! Polygon and region types.

use crate::coord::{GeoBounds, GeoCoord};

/// Default cap on points kept per polygon ring.
pub const DEFAULT_MAX_POLYGON_POINTS: usize = 500;

/// A closed ring of geographic coordinates.
///
/// The ring is implicitly closed; the last point does not need to repeat
/// the first. The bounding box is computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<GeoCoord>,
    bounds: Option<GeoBounds>,
}

impl Polygon {
    pub fn new(points: Vec<GeoCoord>) -> Self {
        let bounds = GeoBounds::from_coords(&points);
        Self { points, bounds }
    }

    #[inline]
    pub fn points(&self) -> &[GeoCoord] {
        &self.points
    }

    /// Bounding box, `None` for an empty ring.
    #[inline]
    pub fn bounds(&self) -> Option<&GeoBounds> {
        self.bounds.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rings with fewer than three points enclose no area.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 3
    }

    /// Bounding-box overlap with `area`. Empty rings never intersect.
    #[inline]
    pub fn intersects(&self, area: &GeoBounds) -> bool {
        self.bounds.is_some_and(|b| b.intersects(area))
    }
}

/// A named political region made of zero or more polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: String,
    polygons: Vec<Polygon>,
}

impl Region {
    pub fn new(id: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            id: id.into(),
            polygons,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// True when any polygon's bounding box overlaps `area`.
    pub fn intersects(&self, area: &GeoBounds) -> bool {
        self.polygons.iter().any(|p| p.intersects(area))
    }

    /// Union of all polygon bounding boxes.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.polygons
            .iter()
            .filter_map(Polygon::bounds)
            .copied()
            .reduce(|acc, b| {
                GeoBounds::new(
                    acc.min_lat.min(b.min_lat),
                    acc.max_lat.max(b.max_lat),
                    acc.min_lon.min(b.min_lon),
                    acc.max_lon.max(b.max_lon),
                )
            })
    }

    pub(super) fn extend(&mut self, polygons: Vec<Polygon>) {
        self.polygons.extend(polygons);
    }
}

/// Reduce a ring to at most `max_points` points by fixed-stride sampling.
///
/// The stride is `ceil((n - 1) / (max_points - 1))`. The first and last points
/// are always kept. Rings already within the limit are returned unchanged.
/// A `max_points` below 2 is treated as 2.
pub fn decimate(points: Vec<GeoCoord>, max_points: usize) -> Vec<GeoCoord> {
    let max_points = max_points.max(2);
    let n = points.len();
    if n <= max_points {
        return points;
    }

    let stride = (n - 1).div_ceil(max_points - 1);
    let last = points[n - 1];
    let mut kept: Vec<GeoCoord> = points.into_iter().take(n - 1).step_by(stride).collect();
    kept.push(last);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> Vec<GeoCoord> {
        (0..n)
            .map(|i| GeoCoord::new(i as f64 * 0.01, i as f64 * 0.02))
            .collect()
    }

    #[test]
    fn test_polygon_bounds() {
        let polygon = Polygon::new(vec![
            GeoCoord::new(1.0, 2.0),
            GeoCoord::new(3.0, -1.0),
            GeoCoord::new(2.0, 4.0),
        ]);
        assert_eq!(polygon.bounds(), Some(&GeoBounds::new(1.0, 3.0, -1.0, 4.0)));
        assert!(polygon.is_drawable());
    }

    #[test]
    fn test_empty_polygon_never_intersects() {
        let polygon = Polygon::new(Vec::new());
        let world = GeoBounds::new(-90.0, 90.0, -180.0, 180.0);
        assert!(polygon.bounds().is_none());
        assert!(!polygon.intersects(&world));
        assert!(!polygon.is_drawable());
    }

    #[test]
    fn test_region_bounds_union() {
        let region = Region::new(
            "r",
            vec![
                Polygon::new(vec![GeoCoord::new(0.0, 0.0), GeoCoord::new(1.0, 1.0)]),
                Polygon::new(Vec::new()),
                Polygon::new(vec![GeoCoord::new(-2.0, 5.0), GeoCoord::new(0.5, 6.0)]),
            ],
        );
        assert_eq!(region.bounds(), Some(GeoBounds::new(-2.0, 1.0, 0.0, 6.0)));
        assert_eq!(Region::new("empty", Vec::new()).bounds(), None);
    }

    #[test]
    fn test_decimate_within_limit_is_unchanged() {
        let points = ring(10);
        assert_eq!(decimate(points.clone(), 10), points);
        assert_eq!(decimate(points.clone(), 500), points);
    }

    #[test]
    fn test_decimate_keeps_first_and_last() {
        let points = ring(1001);
        let kept = decimate(points.clone(), 500);

        assert!(kept.len() <= 500, "kept {} points", kept.len());
        assert_eq!(kept.first(), points.first());
        assert_eq!(kept.last(), points.last());
    }

    #[test]
    fn test_decimate_stride() {
        // n = 11, max = 4: stride = ceil(10 / 3) = 4 -> indices 0, 4, 8, 10
        let points = ring(11);
        let kept = decimate(points.clone(), 4);
        assert_eq!(kept, vec![points[0], points[4], points[8], points[10]]);
    }

    #[test]
    fn test_decimate_bound_holds_across_sizes() {
        for n in [3, 50, 501, 999, 1000, 4097] {
            for max in [2, 3, 7, 100, 500] {
                let kept = decimate(ring(n), max);
                assert!(kept.len() <= max, "n={} max={}", n, max);
            }
        }
    }
}
