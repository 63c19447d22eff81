//! Penrose kite and dart (P2) tilings by repeated golden-ratio deflation
//!
//! A decagonal ring of ten half-kites is substituted generation by generation
//! into exponentially many smaller half-tiles. The ring's sectors are
//! independent, so they can also be deflated on separate workers and joined.

#![forbid(unsafe_code)]

/// Substitution rules, tile collections, seeding and the deflation drivers
pub mod deflation;
/// Plane points and triangular half-tiles
pub mod geometry;
/// Command line, configuration, errors, logging and image export
pub mod io;
/// Drawing surface contract and the raster implementation
pub mod render;

pub use io::error::{DeflationError, Result};
