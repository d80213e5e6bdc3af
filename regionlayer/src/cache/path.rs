//! On-disk layout of the base tile store.
//!
//! ```text
//! <root>/
//! ├── VERSION              data version of the stored tiles
//! └── tiles/<z>/<x>/<y>.png
//! ```

use crate::coord::TileKey;
use std::path::{Path, PathBuf};

pub const TILES_DIR: &str = "tiles";
pub const VERSION_FILE: &str = "VERSION";
pub const TILE_EXTENSION: &str = "png";

/// Directory holding every tile file.
pub fn tiles_directory(root: &Path) -> PathBuf {
    root.join(TILES_DIR)
}

/// Path of the version marker.
pub fn version_path(root: &Path) -> PathBuf {
    root.join(VERSION_FILE)
}

/// Full path of a tile file.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use regionlayer::cache::tile_path;
/// use regionlayer::coord::TileKey;
///
/// let path = tile_path(&PathBuf::from("/cache"), &TileKey::new(4, 3, 6));
/// assert_eq!(path, PathBuf::from("/cache/tiles/4/3/6.png"));
/// ```
pub fn tile_path(root: &Path, key: &TileKey) -> PathBuf {
    tiles_directory(root)
        .join(key.zoom.to_string())
        .join(key.x.to_string())
        .join(format!("{}.{}", key.y, TILE_EXTENSION))
}

/// Recover a tile key from a path below the tiles directory.
///
/// Returns `None` for anything that is not `<z>/<x>/<y>.png` with numeric
/// components naming a valid tile.
pub fn parse_tile_path(tiles_dir: &Path, path: &Path) -> Option<TileKey> {
    let relative = path.strip_prefix(tiles_dir).ok()?;
    let mut components = relative.iter().map(|c| c.to_str());

    let zoom: u8 = components.next()??.parse().ok()?;
    let x: u32 = components.next()??.parse().ok()?;
    let file = components.next()??;
    if components.next().is_some() {
        return None;
    }

    let y: u32 = file
        .strip_suffix(TILE_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()?;

    let key = TileKey::new(zoom, x, y);
    key.validate().ok()?;
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_path_layout() {
        let root = PathBuf::from("/cache");
        assert_eq!(
            tile_path(&root, &TileKey::new(12, 654, 1583)),
            PathBuf::from("/cache/tiles/12/654/1583.png")
        );
        assert_eq!(version_path(&root), PathBuf::from("/cache/VERSION"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let root = PathBuf::from("/cache");
        let key = TileKey::new(7, 20, 45);
        let path = tile_path(&root, &key);
        assert_eq!(parse_tile_path(&tiles_directory(&root), &path), Some(key));
    }

    #[test]
    fn test_parse_rejects_foreign_files() {
        let tiles = PathBuf::from("/cache/tiles");
        for bad in [
            "/cache/tiles/4/3/6.png.tmp",
            "/cache/tiles/4/3/six.png",
            "/cache/tiles/4/3/6.jpg",
            "/cache/tiles/4/3/6/7.png",
            "/cache/tiles/4/6.png",
            "/cache/tiles/2/9/0.png",
            "/elsewhere/4/3/6.png",
        ] {
            assert_eq!(parse_tile_path(&tiles, Path::new(bad)), None, "{}", bad);
        }
    }
}
