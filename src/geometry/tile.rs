//! Triangular half-tiles of the kite and dart tiling
//!
//! Every tile is stored as the ordered triple `(a, b, c)` where `b` is the apex
//! shared with the tile's mirror partner and `a`, `c` are the base vertices.
//! The substitution rules rely on this order, so nothing in the crate permutes it.

use crate::geometry::point::Point;
use crate::io::error::DeflationError;

/// The two half-tile shapes of a P2 tiling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    /// Half-dart, deflates into two large tiles and one small tile
    Large = 0,
    /// Half-kite, deflates into one small tile and one large tile
    Small = 1,
}

impl TileKind {
    /// Raw discriminator of the kind
    pub const fn as_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TileKind {
    type Error = DeflationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Large),
            1 => Ok(Self::Small),
            _ => Err(DeflationError::InvalidTileKind { value }),
        }
    }
}

/// An immutable triangular half-tile
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// First base vertex
    pub a: Point,
    /// Apex vertex
    pub b: Point,
    /// Second base vertex
    pub c: Point,
    /// Shape of the tile
    pub kind: TileKind,
}

impl Tile {
    /// Create a tile from its vertices in stored order
    pub const fn new(a: Point, b: Point, c: Point, kind: TileKind) -> Self {
        Self { a, b, c, kind }
    }

    /// Decode a tile from vertices and a raw kind discriminator
    ///
    /// # Errors
    ///
    /// Returns [`DeflationError::InvalidTileKind`] if `kind` is neither 0 nor 1
    pub fn from_raw(a: Point, b: Point, c: Point, kind: u8) -> crate::io::error::Result<Self> {
        Ok(Self::new(a, b, c, TileKind::try_from(kind)?))
    }

    /// Vertices in stored order
    pub const fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    /// Lengths of `ab`, `bc` and `ca`
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            self.a.distance(self.b),
            self.b.distance(self.c),
            self.c.distance(self.a),
        ]
    }

    /// Signed area, positive when `a -> b -> c` turns counter-clockwise
    pub fn signed_area(&self) -> f64 {
        (self.b - self.a).cross(self.c - self.a) / 2.0
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Whether the tile has collapsed to (nearly) zero area
    ///
    /// The threshold scales with the square of the longest edge, so the check
    /// behaves the same at every generation.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        let longest = self.edge_lengths().into_iter().fold(0.0_f64, f64::max);
        longest == 0.0 || self.area() <= tolerance * longest * longest
    }

    /// Whether every coordinate is finite
    pub const fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}
