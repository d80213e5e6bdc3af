//! Tile rasterization.
//!
//! Converts region polygons into 256x256 RGBA tiles with `tiny-skia` and
//! moves tiles to and from PNG with `image`.
//!
//! # Drawing model
//!
//! ```text
//! transparent pixmap
//!   └─ for each region intersecting the tile (store order)
//!        └─ for each polygon whose bbox intersects the tile
//!             ├─ project to tile pixels, clip to tile + margin
//!             ├─ fill   (base or highlight colour)
//!             └─ stroke (border colour)
//! ```
//!
//! A composed tile is a base tile with [`TileRasterizer::overlay`] applied:
//! the intersecting highlighted regions are redrawn in the highlight colour.

mod error;
mod rasterizer;
mod style;
mod tile_image;

pub use error::{ColorParseError, RenderError};
pub use rasterizer::TileRasterizer;
pub use style::{RenderStyle, Rgba};
pub use tile_image::TileImage;
