//! PNG export of rendered tile collections

use crate::deflation::tile_set::TileSet;
use crate::io::configuration::RENDER_MARGIN_PX;
use crate::io::error::{DeflationError, Result};
use crate::render::raster::RasterSurface;
use std::path::Path;

/// Save a raster surface as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_surface_as_png(surface: &RasterSurface, output_path: &Path) -> Result<()> {
    create_parent_dir(output_path)?;

    surface
        .to_image()
        .save(output_path)
        .map_err(|e| DeflationError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Render `tiles` into a square image of `image_size` pixels and save it
///
/// # Errors
///
/// Returns an error if the collection is empty or the PNG cannot be written
pub fn export_tiles_as_png(tiles: &TileSet, image_size: u32, output_path: &Path) -> Result<()> {
    if tiles.is_empty() {
        return Err(crate::io::error::invalid_parameter(
            "tiles",
            &0,
            &"no tiles to render",
        ));
    }

    let surface = RasterSurface::render(tiles, image_size, image_size, RENDER_MARGIN_PX)?;
    export_surface_as_png(&surface, output_path)
}

pub(crate) fn create_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|e| DeflationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}
