//! Rendering of tile collections

/// Pixel raster surface
pub mod raster;
/// Drawing surface trait and tile colors
pub mod surface;
