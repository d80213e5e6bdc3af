//! Common types and utilities shared across CLI commands.
//!
//! The JSON reader here stands in for a real boundary loader: it turns a
//! file into the id → rings mapping `BoundaryStore::from_rings` expects.

use regionlayer::boundary::BoundaryStore;
use regionlayer::coord::{GeoBounds, GeoCoord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CliError;

/// On-disk boundary file.
///
/// ```json
/// { "version": "2024.1", "regions": { "us-nv": [[[-120.0, 42.0], [-114.0, 42.0], ...]] } }
/// ```
///
/// Points are `[lon, lat]` pairs, GeoJSON order.
#[derive(Debug, Deserialize)]
pub struct BoundaryFile {
    pub version: String,
    pub regions: BTreeMap<String, Vec<Vec<[f64; 2]>>>,
}

impl BoundaryFile {
    /// Convert to a boundary store, validating and decimating every ring.
    pub fn into_store(self, max_points: usize) -> BoundaryStore {
        let rings = self.regions.into_iter().map(|(id, polygons)| {
            let polygons: Vec<Vec<GeoCoord>> = polygons
                .into_iter()
                .map(|ring| {
                    ring.into_iter()
                        .map(|[lon, lat]| GeoCoord::new(lat, lon))
                        .collect()
                })
                .collect();
            (id, polygons)
        });
        BoundaryStore::from_rings(self.version, max_points, rings)
    }
}

/// Read a boundary file from disk.
pub fn load_boundaries(path: &Path, max_points: usize) -> Result<BoundaryStore, CliError> {
    let err = |reason: String| CliError::Boundaries {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
    let file: BoundaryFile = serde_json::from_str(&content).map_err(|e| err(e.to_string()))?;
    Ok(file.into_store(max_points))
}

/// Parse `min_lon,min_lat,max_lon,max_lat`.
pub fn parse_bbox(s: &str) -> Result<GeoBounds, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in bbox '{}': {}", s, e))?;

    let [min_lon, min_lat, max_lon, max_lat] = values[..] else {
        return Err(format!(
            "bbox must be min_lon,min_lat,max_lon,max_lat (got {} values)",
            values.len()
        ));
    };

    if min_lon > max_lon || min_lat > max_lat {
        return Err(format!("bbox '{}' has min greater than max", s));
    }
    if min_lon < -180.0 || max_lon > 180.0 || min_lat < -90.0 || max_lat > 90.0 {
        return Err(format!("bbox '{}' is outside -180..180 / -90..90", s));
    }

    Ok(GeoBounds::new(min_lat, max_lat, min_lon, max_lon))
}
