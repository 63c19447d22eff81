//! The deflation engine
//!
//! Leaves first: substitution rules, the tile collection applying them to a
//! whole generation, the seed ring, the sequential driver and the parallel
//! fan-out dispatcher.

/// Parallel fan-out of seed sectors with a fork/join barrier
pub mod dispatcher;
/// Repeated deflation with cooperative cancellation
pub mod driver;
/// Substitution rules for both half-tile kinds
pub mod rules;
/// Decagonal seed ring construction
pub mod seed;
/// Arena-backed, optionally nested tile collections
pub mod tile_set;

pub use tile_set::{TileCounts, TileSet};
