//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! slippy-map tile keys and pixel offsets inside a rendered tile.

mod types;

pub use types::{
    tiles_per_axis, CoordError, GeoBounds, GeoCoord, TileKey, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON, MIN_ZOOM, TILE_SIZE,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to the tile containing them.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 30)
#[inline]
pub fn to_tile_key(lat: f64, lon: f64, zoom: u8) -> Result<TileKey, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    let n = tiles_per_axis(zoom).ok_or(CoordError::InvalidZoom(zoom))?;
    let max_index = (n - 1) as f64;
    let n = n as f64;

    // lon = 180 and lat = MIN_LAT land exactly on the far edge; clamp them
    // into the last column/row.
    let x = ((lon + 180.0) / 360.0 * n).floor().min(max_index) as u32;

    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
        .floor()
        .clamp(0.0, max_index) as u32;

    Ok(TileKey::new(zoom, x, y))
}

/// Longitude of a tile column edge.
#[inline]
fn column_to_lon(x: u64, n: f64) -> f64 {
    x as f64 / n * 360.0 - 180.0
}

/// Latitude of a tile row edge using inverse Web Mercator.
#[inline]
fn row_to_lat(y: u64, n: f64) -> f64 {
    let y = y as f64 / n;
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

/// Geographic bounds of a tile.
///
/// The northern edge is row `y`, the southern edge row `y + 1`; west and
/// east follow the same pattern for columns.
pub fn tile_bounds(key: &TileKey) -> Result<GeoBounds, CoordError> {
    key.validate()?;
    let n = (1u64 << key.zoom) as f64;
    let (x, y) = (u64::from(key.x), u64::from(key.y));

    Ok(GeoBounds {
        min_lat: row_to_lat(y + 1, n),
        max_lat: row_to_lat(y, n),
        min_lon: column_to_lon(x, n),
        max_lon: column_to_lon(x + 1, n),
    })
}

/// Maps a coordinate to a pixel offset inside a tile, origin top-left.
///
/// Interpolation is linear in both axes over the tile's bounds. Degenerate
/// bounds (zero latitude or longitude span) map everything to `(0, 0)`.
/// Coordinates outside the bounds produce offsets outside `0..tile_size`.
#[inline]
pub fn coordinate_to_pixel(coord: &GeoCoord, bounds: &GeoBounds, tile_size: u32) -> (f32, f32) {
    let (x, y) = pixel_offset(coord, bounds, tile_size);
    (x as f32, y as f32)
}

/// Full-precision form of [`coordinate_to_pixel`].
///
/// Far-away vertices at high zoom land millions of pixels outside the tile,
/// where `f32` can no longer resolve single pixels.
#[inline]
pub fn pixel_offset(coord: &GeoCoord, bounds: &GeoBounds, tile_size: u32) -> (f64, f64) {
    let lat_range = bounds.lat_range();
    let lon_range = bounds.lon_range();
    if lat_range == 0.0 || lon_range == 0.0 {
        return (0.0, 0.0);
    }

    let size = f64::from(tile_size);
    let x = (coord.lon - bounds.min_lon) / lon_range * size;
    let y = (bounds.max_lat - coord.lat) / lat_range * size;
    (x, y)
}

/// Every tile at `zoom` whose bounds intersect `area`, in row-major order.
///
/// Collects [`tile_range`]; prefer the range itself for large areas.
pub fn tiles_in_bounds(zoom: u8, area: &GeoBounds) -> Result<Vec<TileKey>, CoordError> {
    Ok(tile_range(zoom, area)?.collect())
}

/// Lazy row-major walk over the tiles at `zoom` whose bounds intersect
/// `area`. Nothing is allocated, so whole-world ranges at high zoom are
/// fine to iterate or count.
pub fn tile_range(zoom: u8, area: &GeoBounds) -> Result<TileRange, CoordError> {
    let n = tiles_per_axis(zoom).ok_or(CoordError::InvalidZoom(zoom))?;
    let clamp_lat = |lat: f64| lat.clamp(MIN_LAT, MAX_LAT);
    let clamp_lon = |lon: f64| lon.clamp(MIN_LON, MAX_LON);

    let north_west = to_tile_key(clamp_lat(area.max_lat), clamp_lon(area.min_lon), zoom)?;
    let south_east = to_tile_key(clamp_lat(area.min_lat), clamp_lon(area.max_lon), zoom)?;
    let last = (n - 1) as u32;
    let max_x = south_east.x.min(last);
    let max_y = south_east.y.min(last);

    Ok(TileRange {
        zoom,
        min_x: north_west.x,
        max_x,
        max_y,
        x: north_west.x,
        y: north_west.y,
        done: north_west.x > max_x || north_west.y > max_y,
    })
}

/// Iterator returned by [`tile_range`].
#[derive(Debug, Clone)]
pub struct TileRange {
    zoom: u8,
    min_x: u32,
    max_x: u32,
    max_y: u32,
    x: u32,
    y: u32,
    done: bool,
}

impl TileRange {
    /// Tiles not yet yielded.
    pub fn remaining(&self) -> u64 {
        if self.done {
            return 0;
        }
        let width = u64::from(self.max_x - self.min_x) + 1;
        u64::from(self.max_y - self.y) * width + u64::from(self.max_x - self.x) + 1
    }
}

impl Iterator for TileRange {
    type Item = TileKey;

    fn next(&mut self) -> Option<TileKey> {
        if self.done {
            return None;
        }
        let key = TileKey::new(self.zoom, self.x, self.y);
        if self.x < self.max_x {
            self.x += 1;
        } else if self.y < self.max_y {
            self.x = self.min_x;
            self.y += 1;
        } else {
            self.done = true;
        }
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests;
