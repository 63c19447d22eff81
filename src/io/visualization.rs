//! Frame capture and GIF generation showing successive generations

use crate::deflation::tile_set::TileSet;
use crate::geometry::point::Point;
use crate::io::configuration::{GIF_FINAL_FRAME_HOLD, RENDER_MARGIN_PX};
use crate::io::error::{DeflationError, Result};
use crate::io::image::create_parent_dir;
use crate::render::raster::{RasterSurface, Viewport};
use image::{Delay, Frame, RgbaImage};
use std::path::Path;

/// Captures one rendered frame per generation
///
/// All frames share the viewport fitted to the first captured collection, so
/// the tiling stays in place while it refines.
pub struct GenerationCapture {
    frames: Vec<RgbaImage>,
    surface: RasterSurface,
    fitted: bool,
}

impl GenerationCapture {
    /// Capture frames of `width × height` pixels
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn new(width: u32, height: u32, expected_frames: usize) -> Result<Self> {
        let placeholder = Viewport::new(1.0, Point::new(0.0, 0.0));
        Ok(Self {
            frames: Vec::with_capacity(expected_frames),
            surface: RasterSurface::new(width, height, placeholder)?,
            fitted: false,
        })
    }

    /// Render `tiles` as the next frame
    pub fn capture(&mut self, tiles: &TileSet) {
        if !self.fitted {
            let viewport = Viewport::fit(
                tiles,
                self.surface.width(),
                self.surface.height(),
                RENDER_MARGIN_PX,
            );
            self.surface.set_viewport(viewport);
            self.fitted = true;
        }
        self.surface.clear();
        tiles.draw(&mut self.surface);
        self.frames.push(self.surface.to_image());
    }

    /// Number of captured frames
    pub const fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Captured frames in capture order
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Export the captured frames as an animated GIF
    ///
    /// The last frame is held for [`GIF_FINAL_FRAME_HOLD`] times the frame delay.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.frames.is_empty() {
            return Err(DeflationError::InvalidParameter {
                parameter: "frames",
                value: "0".to_string(),
                reason: "No generations captured for visualization".to_string(),
            });
        }

        create_parent_dir(output_path)?;
        let file = std::fs::File::create(output_path).map_err(|e| DeflationError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let last = self.frames.len() - 1;
        let frames = self.frames.iter().enumerate().map(|(index, buffer)| {
            let delay = if index == last {
                frame_delay_ms * GIF_FINAL_FRAME_HOLD
            } else {
                frame_delay_ms
            };
            Frame::from_parts(
                buffer.clone(),
                0,
                0,
                Delay::from_numer_denom_ms(delay, 1),
            )
        });

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| DeflationError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })
    }
}
