//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels addressable with `u32` tile indices
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 30;

/// Edge length of a rendered tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Tile key in the slippy-map (Web Mercator) scheme.
///
/// `x` grows eastward from the antimeridian, `y` grows southward from the
/// northern Mercator limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Zoom level
    pub zoom: u8,
    /// Column (east-west), 0 at west
    pub x: u32,
    /// Row (north-south), 0 at north
    pub y: u32,
}

impl TileKey {
    /// Create a tile key. The key is not validated until it is used.
    #[inline]
    pub const fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles along one axis at this key's zoom level.
    ///
    /// Returns `None` when the zoom is beyond [`MAX_ZOOM`].
    #[inline]
    pub fn tiles_per_axis(&self) -> Option<u64> {
        tiles_per_axis(self.zoom)
    }

    /// Check the key against the tile grid of its zoom level.
    pub fn validate(&self) -> Result<(), CoordError> {
        let n = self.tiles_per_axis().ok_or(CoordError::InvalidZoom(self.zoom))?;
        if u64::from(self.x) >= n || u64::from(self.y) >= n {
            return Err(CoordError::TileOutOfRange(*self));
        }
        Ok(())
    }

    /// Geographic bounds covered by this tile.
    #[inline]
    pub fn bounds(&self) -> Result<GeoBounds, CoordError> {
        super::tile_bounds(self)
    }

    /// The tile one zoom level up that contains this one.
    pub fn parent(&self) -> Option<TileKey> {
        if self.zoom == 0 {
            return None;
        }
        Some(TileKey::new(self.zoom - 1, self.x / 2, self.y / 2))
    }

    /// The four tiles one zoom level down, in row-major order.
    pub fn children(&self) -> Option<[TileKey; 4]> {
        if self.zoom >= MAX_ZOOM {
            return None;
        }
        let (z, x, y) = (self.zoom + 1, self.x * 2, self.y * 2);
        Some([
            TileKey::new(z, x, y),
            TileKey::new(z, x + 1, y),
            TileKey::new(z, x, y + 1),
            TileKey::new(z, x + 1, y + 1),
        ])
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`, or `None` past [`MAX_ZOOM`].
#[inline]
pub fn tiles_per_axis(zoom: u8) -> Option<u64> {
    (zoom <= MAX_ZOOM).then(|| 1u64 << zoom)
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoord {
    /// Latitude, positive north
    pub lat: f64,
    /// Longitude, positive east
    pub lon: f64,
}

impl GeoCoord {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside ±90 / ±180.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Smallest box containing every coordinate, or `None` for an empty input.
    pub fn from_coords<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoCoord>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bounds = GeoBounds::new(first.lat, first.lat, first.lon, first.lon);
        for c in iter {
            bounds.min_lat = bounds.min_lat.min(c.lat);
            bounds.max_lat = bounds.max_lat.max(c.lat);
            bounds.min_lon = bounds.min_lon.min(c.lon);
            bounds.max_lon = bounds.max_lon.max(c.lon);
        }
        Some(bounds)
    }

    /// Latitude span in degrees.
    #[inline]
    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    #[inline]
    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Inclusive overlap test. Boxes that only share an edge intersect.
    #[inline]
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
            && self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
    }

    /// True when the coordinate lies inside or on the edge of the box.
    #[inline]
    pub fn contains(&self, coord: &GeoCoord) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 30)
    InvalidZoom(u8),
    /// Column or row is outside the grid of its zoom level
    TileOutOfRange(TileKey),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::TileOutOfRange(key) => {
                write!(
                    f,
                    "Tile {} is outside the {}x{} grid of zoom {}",
                    key,
                    1u64 << key.zoom.min(MAX_ZOOM),
                    1u64 << key.zoom.min(MAX_ZOOM),
                    key.zoom
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
