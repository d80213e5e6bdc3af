//! Tests for coordinate conversion

use super::*;

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

#[test]
fn test_new_york_city_at_zoom_16() {
    // New York City: 40.7128°N, 74.0060°W
    let key = to_tile_key(40.7128, -74.0060, 16).unwrap();
    assert_eq!(key.y, 24641, "NYC latitude should map to row 24641 at zoom 16");
    assert_eq!(key.x, 19295, "NYC longitude should map to col 19295 at zoom 16");
    assert_eq!(key.zoom, 16);
}

#[test]
fn test_london_at_zoom_10() {
    let key = to_tile_key(51.5074, -0.1278, 10).unwrap();
    assert_eq!(key, TileKey::new(10, 511, 340));
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1: 2×2 tiles, 0°N 0°E is the top-left corner of tile (1, 1)
    let key = to_tile_key(0.0, 0.0, 1).unwrap();
    assert_eq!(key, TileKey::new(1, 1, 1));
}

#[test]
fn test_far_edges_clamp_into_grid() {
    let key = to_tile_key(MIN_LAT, MAX_LON, 3).unwrap();
    assert_eq!(key, TileKey::new(3, 7, 7));
}

#[test]
fn test_invalid_latitude() {
    assert!(matches!(
        to_tile_key(90.0, 0.0, 10),
        Err(CoordError::InvalidLatitude(_))
    ));
    assert!(matches!(
        to_tile_key(-90.0, 0.0, 10),
        Err(CoordError::InvalidLatitude(_))
    ));
}

#[test]
fn test_invalid_longitude() {
    assert!(matches!(
        to_tile_key(0.0, 181.0, 10),
        Err(CoordError::InvalidLongitude(_))
    ));
}

#[test]
fn test_invalid_zoom() {
    assert!(matches!(
        to_tile_key(0.0, 0.0, MAX_ZOOM + 1),
        Err(CoordError::InvalidZoom(_))
    ));
}

#[test]
fn test_world_tile_bounds() {
    let bounds = tile_bounds(&TileKey::new(0, 0, 0)).unwrap();
    assert_close(bounds.min_lon, -180.0, "min_lon");
    assert_close(bounds.max_lon, 180.0, "max_lon");
    assert!((bounds.max_lat - MAX_LAT).abs() < 1e-6);
    assert!((bounds.min_lat - MIN_LAT).abs() < 1e-6);
}

#[test]
fn test_zoom_4_tile_bounds() {
    let bounds = tile_bounds(&TileKey::new(4, 3, 6)).unwrap();
    assert_close(bounds.min_lon, -112.5, "min_lon");
    assert_close(bounds.max_lon, -90.0, "max_lon");
    assert!((bounds.max_lat - 40.9799).abs() < 1e-3);
    assert!((bounds.min_lat - 21.9430).abs() < 1e-3);
}

#[test]
fn test_adjacent_tiles_share_edges() {
    let a = tile_bounds(&TileKey::new(5, 10, 12)).unwrap();
    let east = tile_bounds(&TileKey::new(5, 11, 12)).unwrap();
    let south = tile_bounds(&TileKey::new(5, 10, 13)).unwrap();

    assert_close(a.max_lon, east.min_lon, "east edge");
    assert_close(a.min_lat, south.max_lat, "south edge");
    assert!(a.intersects(&east), "touching tiles count as intersecting");
}

#[test]
fn test_tile_bounds_out_of_range() {
    let result = tile_bounds(&TileKey::new(2, 4, 0));
    assert_eq!(
        result,
        Err(CoordError::TileOutOfRange(TileKey::new(2, 4, 0)))
    );
    assert!(tile_bounds(&TileKey::new(31, 0, 0)).is_err());
}

#[test]
fn test_roundtrip_at_different_zooms() {
    let (lat, lon) = (51.5074, -0.1278);
    for zoom in [0, 5, 10, 15, 18, 24] {
        let key = to_tile_key(lat, lon, zoom).unwrap();
        let bounds = key.bounds().unwrap();
        assert!(
            bounds.contains(&GeoCoord::new(lat, lon)),
            "zoom {}: {:?} should contain the source point",
            zoom,
            bounds
        );
    }
}

#[test]
fn test_coordinate_to_pixel_corners() {
    let bounds = GeoBounds::new(10.0, 20.0, 30.0, 40.0);

    assert_eq!(
        coordinate_to_pixel(&GeoCoord::new(20.0, 30.0), &bounds, 256),
        (0.0, 0.0)
    );
    assert_eq!(
        coordinate_to_pixel(&GeoCoord::new(10.0, 40.0), &bounds, 256),
        (256.0, 256.0)
    );
    assert_eq!(
        coordinate_to_pixel(&GeoCoord::new(15.0, 35.0), &bounds, 256),
        (128.0, 128.0)
    );
}

#[test]
fn test_coordinate_to_pixel_outside_tile() {
    let bounds = GeoBounds::new(10.0, 20.0, 30.0, 40.0);
    let (x, y) = coordinate_to_pixel(&GeoCoord::new(25.0, 25.0), &bounds, 256);
    assert!(x < 0.0);
    assert!(y < 0.0);
}

#[test]
fn test_coordinate_to_pixel_degenerate_bounds() {
    let flat = GeoBounds::new(10.0, 10.0, 30.0, 40.0);
    let thin = GeoBounds::new(10.0, 20.0, 30.0, 30.0);
    let coord = GeoCoord::new(12.0, 33.0);

    assert_eq!(coordinate_to_pixel(&coord, &flat, 256), (0.0, 0.0));
    assert_eq!(coordinate_to_pixel(&coord, &thin, 256), (0.0, 0.0));
}

#[test]
fn test_bounds_intersection() {
    let a = GeoBounds::new(0.0, 10.0, 0.0, 10.0);
    let overlapping = GeoBounds::new(5.0, 15.0, 5.0, 15.0);
    let disjoint = GeoBounds::new(11.0, 20.0, 0.0, 10.0);
    let inside = GeoBounds::new(2.0, 3.0, 2.0, 3.0);

    assert!(a.intersects(&overlapping));
    assert!(overlapping.intersects(&a));
    assert!(!a.intersects(&disjoint));
    assert!(a.intersects(&inside));
    assert!(inside.intersects(&a));
}

#[test]
fn test_bounds_from_coords() {
    let coords = [
        GeoCoord::new(1.0, -3.0),
        GeoCoord::new(-2.0, 5.0),
        GeoCoord::new(4.0, 0.0),
    ];
    let bounds = GeoBounds::from_coords(&coords).unwrap();
    assert_eq!(bounds, GeoBounds::new(-2.0, 4.0, -3.0, 5.0));
    assert!(GeoBounds::from_coords(&[]).is_none());
}

#[test]
fn test_parent_and_children() {
    let key = TileKey::new(4, 3, 6);
    assert_eq!(key.parent(), Some(TileKey::new(3, 1, 3)));
    assert_eq!(TileKey::new(0, 0, 0).parent(), None);

    let children = key.children().unwrap();
    assert_eq!(children[0], TileKey::new(5, 6, 12));
    assert_eq!(children[3], TileKey::new(5, 7, 13));
    for child in children {
        assert_eq!(child.parent(), Some(key));
    }
}

#[test]
fn test_tiles_in_bounds() {
    // The whole world at zoom 2 is 16 tiles
    let world = GeoBounds::new(-90.0, 90.0, -180.0, 180.0);
    assert_eq!(tiles_in_bounds(2, &world).unwrap().len(), 16);

    // A small box fits inside a single tile
    let small = GeoBounds::new(36.0, 37.0, -120.0, -119.0);
    let tiles = tiles_in_bounds(4, &small).unwrap();
    assert_eq!(tiles, vec![TileKey::new(4, 2, 6)]);
}

#[test]
fn test_tile_range_counts_without_collecting() {
    let world = GeoBounds::new(-90.0, 90.0, -180.0, 180.0);

    let range = tile_range(MAX_ZOOM, &world).unwrap();
    assert_eq!(range.remaining(), 1u64 << 60);

    let mut range = tile_range(MAX_ZOOM, &world).unwrap();
    assert_eq!(range.next(), Some(TileKey::new(MAX_ZOOM, 0, 0)));
    assert_eq!(range.next(), Some(TileKey::new(MAX_ZOOM, 1, 0)));
    assert_eq!(range.remaining(), (1u64 << 60) - 2);
}

#[test]
fn test_tile_range_row_major() {
    let area = GeoBounds::new(-10.0, 10.0, -10.0, 10.0);
    let mut range = tile_range(2, &area).unwrap();
    assert_eq!(range.remaining(), 4);

    let tiles: Vec<TileKey> = range.by_ref().collect();
    assert_eq!(
        tiles,
        vec![
            TileKey::new(2, 1, 1),
            TileKey::new(2, 2, 1),
            TileKey::new(2, 1, 2),
            TileKey::new(2, 2, 2),
        ]
    );
    assert_eq!(range.remaining(), 0);
    assert_eq!(range.next(), None);
}

#[test]
fn test_tile_range_inverted_area_is_empty() {
    let inverted = GeoBounds::new(40.0, 30.0, -100.0, -90.0);
    let mut range = tile_range(6, &inverted).unwrap();
    assert_eq!(range.remaining(), 0);
    assert_eq!(range.next(), None);
}

#[test]
fn test_tile_key_display() {
    assert_eq!(TileKey::new(4, 3, 6).to_string(), "4/3/6");
}
