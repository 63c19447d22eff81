//! Engine constants and the immutable run configuration

use crate::geometry::point::Point;
use crate::io::error::{Result, invalid_parameter};

/// Number of tiles in the decagonal seed ring
pub const SEED_TILE_COUNT: usize = 10;

/// Default number of deflation generations
pub const DEFAULT_DEPTH: usize = 10;

// Tile counts grow by roughly φ² per generation; at this depth the seed ring
// holds about 35 million tiles, close to 2 GB of tile data
/// Maximum accepted number of generations
pub const MAX_DEPTH: usize = 16;

/// Relative tolerance for geometric comparisons
pub const TOLERANCE: f64 = 1e-6;

// Rendering defaults
/// Side of the square output image in pixels
pub const DEFAULT_IMAGE_SIZE: u32 = 1000;
/// Pixels per world unit for the default seed placement
pub const DEFAULT_SCALE: f64 = 10.0;
/// Outline stroke width in world units
pub const OUTLINE_WIDTH: f64 = 0.1;
/// Blank border kept around fitted renders, in pixels
pub const RENDER_MARGIN_PX: f64 = 4.0;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 10;

// Output settings
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 600;
/// Multiplier applied to the delay of the last GIF frame
pub const GIF_FINAL_FRAME_HOLD: u32 = 5;

/// Parameters of one deflation run, fixed at call time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeflationConfig {
    /// Generations to run
    pub depth: usize,
    /// Center of the seed ring
    pub center: Point,
    /// Radius of the seed ring
    pub radius: f64,
    /// Numeric comparison epsilon
    pub tolerance: f64,
}

impl Default for DeflationConfig {
    fn default() -> Self {
        Self::for_image(DEFAULT_DEPTH, DEFAULT_IMAGE_SIZE)
    }
}

impl DeflationConfig {
    /// Ring centered in a square image of `image_size` pixels at the default scale
    pub fn for_image(depth: usize, image_size: u32) -> Self {
        let half_extent = f64::from(image_size) / DEFAULT_SCALE / 2.0;
        Self {
            depth,
            center: Point::new(half_extent, half_extent),
            radius: half_extent,
            tolerance: TOLERANCE,
        }
    }

    /// Check every field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns an error if the depth exceeds [`MAX_DEPTH`], the center is not
    /// finite, or the radius or tolerance is not positive and finite
    pub fn validate(&self) -> Result<()> {
        if self.depth > MAX_DEPTH {
            return Err(invalid_parameter(
                "depth",
                &self.depth,
                &format!("at most {MAX_DEPTH} generations are supported"),
            ));
        }
        if !self.center.is_finite() {
            return Err(invalid_parameter(
                "center",
                &self.center,
                &"center must have finite coordinates",
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(invalid_parameter(
                "radius",
                &self.radius,
                &"radius must be positive and finite",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(invalid_parameter(
                "tolerance",
                &self.tolerance,
                &"tolerance must be positive and finite",
            ));
        }
        Ok(())
    }
}
