//! Pixel raster surface backed by a `tiny_skia` pixmap
//!
//! Tiles are drawn as anti-aliased closed paths in world coordinates; the
//! viewport supplies the world-to-pixel transform.

use crate::deflation::tile_set::TileSet;
use crate::geometry::point::Point;
use crate::io::error::{Result, invalid_parameter};
use crate::render::surface::{BACKGROUND_COLOR, Rgba, Surface};
use image::{Rgba as ImageRgba, RgbaImage};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Mapping from world coordinates to pixel coordinates
///
/// `pixel = (world - origin) * scale`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Pixels per world unit
    pub scale: f64,
    /// World point mapped to pixel `(0, 0)`
    pub origin: Point,
}

impl Viewport {
    /// Viewport with an explicit scale and origin
    pub const fn new(scale: f64, origin: Point) -> Self {
        Self { scale, origin }
    }

    /// Largest viewport showing all of `tiles` centered in the raster
    ///
    /// Falls back to unit scale at the world origin for empty or degenerate input.
    pub fn fit(tiles: &TileSet, width: u32, height: u32, margin: f64) -> Self {
        let Some((min, max)) = tiles.bounds() else {
            return Self::new(1.0, Point::new(0.0, 0.0));
        };

        let extent = max - min;
        let usable_width = (f64::from(width) - 2.0 * margin).max(1.0);
        let usable_height = (f64::from(height) - 2.0 * margin).max(1.0);
        let scale = (usable_width / extent.x).min(usable_height / extent.y);
        if !scale.is_finite() || scale <= 0.0 {
            return Self::new(1.0, min);
        }

        let center = min + extent / 2.0;
        let half_view = Point::new(f64::from(width), f64::from(height)) / (2.0 * scale);
        Self::new(scale, center - half_view)
    }

    /// Pixel-space position of a world point
    pub fn to_pixel(&self, world: Point) -> Point {
        (world - self.origin) * self.scale
    }

    /// The same mapping as a drawing transform
    pub fn transform(&self) -> Transform {
        let scale = self.scale as f32;
        Transform::from_scale(scale, scale)
            .pre_translate(-self.origin.x as f32, -self.origin.y as f32)
    }
}

/// An in-memory RGBA raster implementing [`Surface`]
#[derive(Clone, Debug)]
pub struct RasterSurface {
    pixmap: Pixmap,
    viewport: Viewport,
}

impl RasterSurface {
    /// Create a raster filled with the background color
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn new(width: u32, height: u32, viewport: Viewport) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            invalid_parameter(
                "image_size",
                &format!("{width}x{height}"),
                &"raster needs at least one pixel in each direction",
            )
        })?;
        pixmap.fill(solid(BACKGROUND_COLOR));
        Ok(Self { pixmap, viewport })
    }

    /// Raster sized `width × height` showing all of `tiles`, with the tiles drawn
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn render(tiles: &TileSet, width: u32, height: u32, margin: f64) -> Result<Self> {
        let mut surface = Self::new(width, height, Viewport::fit(tiles, width, height, margin))?;
        tiles.draw(&mut surface);
        Ok(surface)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Viewport used to place world coordinates
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Place later drawing with a different viewport
    pub const fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Repaint every pixel with the background color
    pub fn clear(&mut self) {
        self.pixmap.fill(solid(BACKGROUND_COLOR));
    }

    /// Color at pixel column `x`, row `y`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
    }

    /// Number of pixels painted exactly `color`
    pub fn count_color(&self, color: Rgba) -> usize {
        self.pixmap
            .pixels()
            .iter()
            .map(|pixel| pixel.demultiply())
            .filter(|pixel| [pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()] == color)
            .count()
    }

    /// Copy the raster into an `image` buffer
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            ImageRgba(self.pixel(x, y).unwrap_or(BACKGROUND_COLOR))
        })
    }
}

impl Surface for RasterSurface {
    fn fill_triangle(&mut self, path: &[Point; 3], color: Rgba) {
        let Some(triangle) = triangle_path(path) else {
            return;
        };
        self.pixmap.fill_path(
            &triangle,
            &paint(color),
            FillRule::Winding,
            self.viewport.transform(),
            None,
        );
    }

    fn stroke_triangle(&mut self, path: &[Point; 3], color: Rgba, width: f64) {
        let Some(triangle) = triangle_path(path) else {
            return;
        };
        // Under one pixel wide a zero width gives a hairline instead
        let width = if width * self.viewport.scale < 1.0 {
            0.0
        } else {
            width as f32
        };
        self.pixmap.stroke_path(
            &triangle,
            &paint(color),
            &Stroke {
                width,
                ..Stroke::default()
            },
            self.viewport.transform(),
            None,
        );
    }
}

fn solid([red, green, blue, alpha]: Rgba) -> Color {
    Color::from_rgba8(red, green, blue, alpha)
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(solid(color));
    paint.anti_alias = true;
    paint
}

// Closed path through the three vertices, `None` for non-finite input
fn triangle_path([a, b, c]: &[Point; 3]) -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(a.x as f32, a.y as f32);
    builder.line_to(b.x as f32, b.y as f32);
    builder.line_to(c.x as f32, c.y as f32);
    builder.close();
    builder.finish()
}
