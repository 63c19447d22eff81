//! Drawing surface contract used to paint tile collections

use crate::geometry::point::Point;
use crate::geometry::tile::TileKind;

/// 8-bit RGBA color
pub type Rgba = [u8; 4];

/// Fill color of half-kites
pub const SMALL_TILE_COLOR: Rgba = [204, 0, 0, 255];
/// Fill color of half-darts
pub const LARGE_TILE_COLOR: Rgba = [0, 0, 204, 255];
/// Stroke color of tile outlines
pub const OUTLINE_COLOR: Rgba = [0, 0, 0, 255];
/// Background of freshly created raster surfaces
pub const BACKGROUND_COLOR: Rgba = [255, 255, 255, 255];

/// Fill color selected by tile kind
pub const fn kind_color(kind: TileKind) -> Rgba {
    match kind {
        TileKind::Small => SMALL_TILE_COLOR,
        TileKind::Large => LARGE_TILE_COLOR,
    }
}

/// A vector drawing target that paints closed triangular paths
///
/// Calls arrive in paint order; later calls may cover earlier ones.
pub trait Surface {
    /// Fill the closed path through the three points
    fn fill_triangle(&mut self, path: &[Point; 3], color: Rgba);

    /// Stroke the closed path through the three points
    ///
    /// `width` is given in world units.
    fn stroke_triangle(&mut self, path: &[Point; 3], color: Rgba, width: f64);
}
