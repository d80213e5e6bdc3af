//! Polygon rasterization into tiles.

use super::error::RenderError;
use super::style::RenderStyle;
use super::tile_image::TileImage;
use crate::boundary::{BoundaryStore, Polygon, Region};
use crate::coord::{pixel_offset, GeoBounds, TileKey, TILE_SIZE};
use crate::highlight::HighlightSet;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Shader, Stroke, Transform};

/// Draws region polygons into 256x256 tiles.
///
/// Rendering is a pure function of the boundary store, the highlight set,
/// the tile key and the style: the same inputs always produce the same
/// pixels.
#[derive(Debug, Clone, Default)]
pub struct TileRasterizer {
    style: RenderStyle,
}

impl TileRasterizer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render every region intersecting `key`.
    ///
    /// Regions in `highlighted` are filled with the highlight colour, all
    /// others with the base colour. With `skip_highlighted` the highlighted
    /// regions are left out entirely. Regions are drawn in store order, so
    /// later regions paint over earlier ones where they overlap.
    pub fn render(
        &self,
        boundaries: &BoundaryStore,
        highlighted: &HighlightSet,
        key: &TileKey,
        skip_highlighted: bool,
    ) -> Result<TileImage, RenderError> {
        let bounds = key.bounds()?;
        let mut pixmap = new_pixmap()?;

        let base = self.fill_paint(false);
        let highlight = self.fill_paint(true);

        for region in boundaries.intersecting(&bounds) {
            let is_highlighted = highlighted.contains(region.id());
            if is_highlighted && skip_highlighted {
                continue;
            }
            let fill = if is_highlighted { &highlight } else { &base };
            self.draw_region(&mut pixmap, region, &bounds, fill);
        }

        TileImage::from_pixmap(&pixmap)
    }

    /// Draw the listed regions in the highlight colour on top of `base`.
    ///
    /// Regions are drawn in store order, as [`TileRasterizer::render`] does,
    /// whatever the order of `region_ids`. Ids unknown to the store are
    /// ignored.
    pub fn overlay(
        &self,
        base: &TileImage,
        boundaries: &BoundaryStore,
        region_ids: &[String],
        key: &TileKey,
    ) -> Result<TileImage, RenderError> {
        let bounds = key.bounds()?;
        if region_ids.is_empty() {
            return Ok(base.clone());
        }

        let mut pixmap = base.to_pixmap()?;
        let highlight = self.fill_paint(true);

        let listed = boundaries
            .intersecting(&bounds)
            .filter(|region| region_ids.iter().any(|id| id == region.id()));
        for region in listed {
            self.draw_region(&mut pixmap, region, &bounds, &highlight);
        }

        TileImage::from_pixmap(&pixmap)
    }

    fn fill_paint(&self, highlighted: bool) -> Paint<'static> {
        let color = if highlighted {
            self.style.highlight_fill
        } else {
            self.style.base_fill
        };
        Paint {
            shader: Shader::SolidColor(color.to_color()),
            anti_alias: self.style.anti_alias,
            ..Default::default()
        }
    }

    fn draw_region(&self, pixmap: &mut Pixmap, region: &Region, bounds: &GeoBounds, fill: &Paint) {
        let border = Paint {
            shader: Shader::SolidColor(self.style.border_color.to_color()),
            anti_alias: self.style.anti_alias,
            ..Default::default()
        };

        for polygon in region.polygons() {
            if !polygon.is_drawable() || !polygon.intersects(bounds) {
                continue;
            }
            let Some(path) = polygon_path(polygon, bounds) else {
                continue;
            };

            pixmap.fill_path(&path, fill, FillRule::Winding, Transform::identity(), None);

            if self.style.border_width > 0.0 {
                pixmap.stroke_path(
                    &path,
                    &border,
                    &Stroke {
                        width: self.style.border_width,
                        ..Default::default()
                    },
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

fn new_pixmap() -> Result<Pixmap, RenderError> {
    Pixmap::new(TILE_SIZE, TILE_SIZE).ok_or(RenderError::Allocation {
        width: TILE_SIZE,
        height: TILE_SIZE,
    })
}

/// Margin kept around the tile when clipping, wider than any border stroke.
const CLIP_MARGIN: f64 = 16.0;

/// Closed path of a ring in tile-pixel space, clipped to the tile plus
/// [`CLIP_MARGIN`]. `None` when nothing of the ring remains.
fn polygon_path(polygon: &Polygon, bounds: &GeoBounds) -> Option<Path> {
    let projected: Vec<(f64, f64)> = polygon
        .points()
        .iter()
        .map(|c| pixel_offset(c, bounds, TILE_SIZE))
        .collect();

    let ring = clip_ring(projected, -CLIP_MARGIN, f64::from(TILE_SIZE) + CLIP_MARGIN);
    if ring.len() < 3 {
        return None;
    }

    let mut builder = PathBuilder::new();
    let mut points = ring.into_iter().map(|(x, y)| (x as f32, y as f32));
    let (x, y) = points.next()?;
    builder.move_to(x, y);
    for (x, y) in points {
        builder.line_to(x, y);
    }
    builder.close();
    builder.finish()
}

/// Sutherland-Hodgman clip of a closed ring against the square
/// `[min, max] x [min, max]`.
///
/// Concave rings may gain zero-width spurs along the clip edges; they fill
/// to nothing and sit outside the visible tile.
fn clip_ring(mut ring: Vec<(f64, f64)>, min: f64, max: f64) -> Vec<(f64, f64)> {
    // (axis, bound, keep values above the bound)
    let edges = [(0, min, true), (0, max, false), (1, min, true), (1, max, false)];

    for (axis, bound, keep_above) in edges {
        let Some(&last) = ring.last() else {
            break;
        };
        let coord = |p: (f64, f64)| if axis == 0 { p.0 } else { p.1 };
        let inside = |p: (f64, f64)| {
            if keep_above {
                coord(p) >= bound
            } else {
                coord(p) <= bound
            }
        };
        let crossing = |a: (f64, f64), b: (f64, f64)| {
            let t = (bound - coord(a)) / (coord(b) - coord(a));
            if axis == 0 {
                (bound, a.1 + t * (b.1 - a.1))
            } else {
                (a.0 + t * (b.0 - a.0), bound)
            }
        };

        let input = std::mem::take(&mut ring);
        let mut prev = last;
        for cur in input {
            match (inside(prev), inside(cur)) {
                (true, true) => ring.push(cur),
                (true, false) => ring.push(crossing(prev, cur)),
                (false, true) => {
                    ring.push(crossing(prev, cur));
                    ring.push(cur);
                }
                (false, false) => {}
            }
            prev = cur;
        }
    }

    ring
}
