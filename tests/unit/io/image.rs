//! Tests for PNG export

#[cfg(test)]
mod tests {
    use penrose_deflation::deflation::driver::deflate_n_times;
    use penrose_deflation::deflation::seed::generate_seed_ring;
    use penrose_deflation::deflation::tile_set::TileSet;
    use penrose_deflation::geometry::point::Point;
    use penrose_deflation::io::image::{export_surface_as_png, export_tiles_as_png};
    use penrose_deflation::render::raster::{RasterSurface, Viewport};
    use penrose_deflation::render::surface::{BACKGROUND_COLOR, SMALL_TILE_COLOR};
    use penrose_deflation::DeflationError;

    // Tests that a rendered tiling is written with the requested size
    // Verified by writing the file before creating its directory
    #[test]
    fn test_export_tiles_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renders").join("depth1.png");
        let tiles = deflate_n_times(generate_seed_ring(Point::new(0.0, 0.0), 1.0).unwrap(), 1)
            .unwrap();

        export_tiles_as_png(&tiles, 64, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (64, 64));
        assert_eq!(image.get_pixel(0, 0).0, BACKGROUND_COLOR);
        assert!(image.pixels().any(|pixel| pixel.0 == SMALL_TILE_COLOR));
    }

    // Tests that a blank surface round-trips through the file unchanged
    // Verified by exporting with swapped dimensions
    #[test]
    fn test_export_surface() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        let surface = RasterSurface::new(12, 7, Viewport::new(1.0, Point::new(0.0, 0.0))).unwrap();

        export_surface_as_png(&surface, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (12, 7));
        assert!(image.pixels().all(|pixel| pixel.0 == BACKGROUND_COLOR));
    }

    // Tests that there is nothing to render for an empty collection
    // Verified by writing an all-background image instead
    #[test]
    fn test_export_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let error = export_tiles_as_png(&TileSet::new(), 32, &path).unwrap_err();

        assert!(matches!(
            error,
            DeflationError::InvalidParameter {
                parameter: "tiles",
                ..
            }
        ));
        assert!(!path.exists());
    }

    // Tests that an unwritable destination reports the failing path
    // Verified by discarding the save error
    #[test]
    fn test_export_to_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiles.unknown-extension");
        let surface = RasterSurface::new(4, 4, Viewport::new(1.0, Point::new(0.0, 0.0))).unwrap();

        let error = export_surface_as_png(&surface, &path).unwrap_err();

        assert!(matches!(
            error,
            DeflationError::ImageExport { path: ref failed, .. } if failed == &path
        ));
    }
}
