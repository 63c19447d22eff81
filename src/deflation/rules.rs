//! Substitution rules splitting one half-tile into smaller half-tiles
//!
//! Both rules are pure and depend only on the tile they are given, which is
//! what lets independent sectors deflate on separate workers.

use crate::geometry::point::Point;
use crate::geometry::tile::{Tile, TileKind};

/// The golden ratio `(1 + √5) / 2`
pub const PHI: f64 = 1.618_033_988_749_895;

/// Children produced by a single substitution step
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Children {
    /// Result of deflating a large tile
    Large([Tile; 3]),
    /// Result of deflating a small tile
    Small([Tile; 2]),
}

impl Children {
    /// Child tiles in substitution order
    pub const fn as_slice(&self) -> &[Tile] {
        match self {
            Self::Large(tiles) => tiles,
            Self::Small(tiles) => tiles,
        }
    }

    /// Number of children
    pub const fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no children
    pub const fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Number of children a tile of `kind` deflates into
pub const fn branching_factor(kind: TileKind) -> usize {
    match kind {
        TileKind::Large => 3,
        TileKind::Small => 2,
    }
}

/// Deflate a large tile `abc` (apex `b`)
///
/// Adds `d` on side `ac` and `e` on side `ab`, both at `1/φ` from `a`.
pub fn deflate_large(a: Point, b: Point, c: Point) -> [Tile; 3] {
    let d = a + (c - a) / PHI;
    let e = a + (b - a) / PHI;

    [
        Tile::new(d, e, a, TileKind::Large),
        Tile::new(c, d, b, TileKind::Large),
        Tile::new(e, d, b, TileKind::Small),
    ]
}

/// Deflate a small tile `abc` (apex `b`)
///
/// Adds `d` on side `ab` at `1/φ` from the apex.
pub fn deflate_small(a: Point, b: Point, c: Point) -> [Tile; 2] {
    let d = b + (a - b) / PHI;

    [
        Tile::new(d, c, a, TileKind::Small),
        Tile::new(c, d, b, TileKind::Large),
    ]
}

/// Apply the rule matching the tile's kind
pub fn substitute(tile: &Tile) -> Children {
    match tile.kind {
        TileKind::Large => Children::Large(deflate_large(tile.a, tile.b, tile.c)),
        TileKind::Small => Children::Small(deflate_small(tile.a, tile.b, tile.c)),
    }
}
