//! Geometric primitives

/// Plane points with vector arithmetic
pub mod point;
/// Half-tiles and their kinds
pub mod tile;

pub use point::Point;
pub use tile::{Tile, TileKind};
