//! Tests for viewport fitting and raster painting

#[cfg(test)]
mod tests {
    use penrose_deflation::deflation::driver::deflate_n_times;
    use penrose_deflation::deflation::seed::generate_seed_ring;
    use penrose_deflation::deflation::tile_set::TileSet;
    use penrose_deflation::geometry::point::Point;
    use penrose_deflation::geometry::tile::{Tile, TileKind};
    use penrose_deflation::render::raster::{RasterSurface, Viewport};
    use penrose_deflation::render::surface::{
        BACKGROUND_COLOR, LARGE_TILE_COLOR, OUTLINE_COLOR, SMALL_TILE_COLOR, Surface,
    };
    use penrose_deflation::DeflationError;

    const ORIGIN: Point = Point::new(0.0, 0.0);

    fn unit_surface(width: u32, height: u32) -> RasterSurface {
        RasterSurface::new(width, height, Viewport::new(1.0, ORIGIN)).unwrap()
    }

    // Tests the world-to-pixel mapping
    // Verified by scaling before subtracting the origin
    #[test]
    fn test_viewport_to_pixel() {
        let viewport = Viewport::new(4.0, Point::new(1.0, -2.0));
        assert_eq!(viewport.to_pixel(Point::new(1.0, -2.0)), ORIGIN);
        assert_eq!(viewport.to_pixel(Point::new(3.0, 0.0)), Point::new(8.0, 8.0));
    }

    // Tests that fitting centers the bounds and respects the tighter axis
    // Verified by using the looser axis for the scale
    #[test]
    fn test_viewport_fit() {
        let tiles = TileSet::from(Tile::new(
            ORIGIN,
            Point::new(2.0, 1.0),
            Point::new(2.0, 0.0),
            TileKind::Large,
        ));
        let viewport = Viewport::fit(&tiles, 100, 100, 0.0);
        assert!((viewport.scale - 50.0).abs() < 1e-12);
        assert!(viewport.to_pixel(ORIGIN).approx_eq(Point::new(0.0, 25.0), 1e-9));
        assert!(
            viewport
                .to_pixel(Point::new(2.0, 1.0))
                .approx_eq(Point::new(100.0, 75.0), 1e-9)
        );

        let empty = Viewport::fit(&TileSet::new(), 100, 100, 0.0);
        assert_eq!(empty, Viewport::new(1.0, ORIGIN));
    }

    // Tests that the drawing transform agrees with the point mapping
    // Verified by translating after scaling
    #[test]
    fn test_viewport_transform() {
        let viewport = Viewport::new(4.0, Point::new(1.0, -2.0));
        let mut corner = [tiny_skia::Point::from_xy(3.0, 0.0)];
        viewport.transform().map_points(&mut corner);
        assert!((corner[0].x - 8.0).abs() < 1e-6);
        assert!((corner[0].y - 8.0).abs() < 1e-6);
    }

    // Tests that a fresh raster holds only background and bounds its lookups
    // Verified by swapping rows and columns in the pixel lookup
    #[test]
    fn test_new_surface() {
        let surface = unit_surface(6, 3);
        assert_eq!(surface.width(), 6);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.count_color(BACKGROUND_COLOR), 18);
        assert_eq!(surface.pixel(5, 2), Some(BACKGROUND_COLOR));
        assert_eq!(surface.pixel(2, 5), None);
        assert_eq!(surface.to_image().dimensions(), (6, 3));
    }

    // Tests that a raster without pixels is rejected
    // Verified by allocating the pixmap lazily on first draw
    #[test]
    fn test_new_surface_rejects_zero_size() {
        let error = RasterSurface::new(0, 4, Viewport::new(1.0, ORIGIN)).unwrap_err();
        assert!(matches!(
            error,
            DeflationError::InvalidParameter {
                parameter: "image_size",
                ..
            }
        ));
        assert!(RasterSurface::new(4, 0, Viewport::new(1.0, ORIGIN)).is_err());
    }

    // Tests that clearing restores the background and keeps a new viewport
    // Verified by clearing only the first row
    #[test]
    fn test_clear_and_set_viewport() {
        let mut surface = unit_surface(8, 8);
        surface.fill_triangle(
            &[ORIGIN, Point::new(8.0, 0.0), Point::new(0.0, 8.0)],
            LARGE_TILE_COLOR,
        );
        assert!(surface.count_color(LARGE_TILE_COLOR) > 0);

        let zoomed = Viewport::new(2.0, Point::new(1.0, 1.0));
        surface.set_viewport(zoomed);
        surface.clear();
        assert_eq!(surface.count_color(BACKGROUND_COLOR), 64);
        assert_eq!(surface.viewport(), &zoomed);
    }

    // Tests filling a right triangle in both windings
    // Verified by culling clockwise triangles
    #[test]
    fn test_fill_triangle() {
        let counter_clockwise = [ORIGIN, Point::new(10.0, 0.0), Point::new(0.0, 10.0)];
        let clockwise = [ORIGIN, Point::new(0.0, 10.0), Point::new(10.0, 0.0)];

        for path in [counter_clockwise, clockwise] {
            let mut surface = unit_surface(10, 10);
            surface.fill_triangle(&path, SMALL_TILE_COLOR);
            // 45 pixels lie fully inside; the diagonal is anti-aliased
            let solid = surface.count_color(SMALL_TILE_COLOR);
            assert!((40..=55).contains(&solid), "{solid} solid pixels");
            assert_eq!(surface.pixel(1, 1), Some(SMALL_TILE_COLOR));
            assert_eq!(surface.pixel(8, 8), Some(BACKGROUND_COLOR));
        }
    }

    // Tests that edge pixels blend the fill with the background
    // Verified by disabling anti-aliasing on the paint
    #[test]
    fn test_fill_blends_edges() {
        let mut surface = unit_surface(10, 10);
        surface.fill_triangle(
            &[ORIGIN, Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
            SMALL_TILE_COLOR,
        );
        let blended = surface
            .to_image()
            .pixels()
            .filter(|pixel| pixel.0 != SMALL_TILE_COLOR && pixel.0 != BACKGROUND_COLOR)
            .count();
        assert!(blended > 0);
    }

    // Tests that collapsed and off-screen triangles paint nothing
    // Verified by filling the bounding box instead of the path
    #[test]
    fn test_fill_skips_empty_coverage() {
        let mut surface = unit_surface(8, 8);
        surface.fill_triangle(
            &[ORIGIN, Point::new(4.0, 4.0), Point::new(8.0, 8.0)],
            LARGE_TILE_COLOR,
        );
        surface.fill_triangle(
            &[
                Point::new(20.0, 20.0),
                Point::new(30.0, 20.0),
                Point::new(20.0, 30.0),
            ],
            LARGE_TILE_COLOR,
        );
        assert_eq!(surface.count_color(BACKGROUND_COLOR), 64);
    }

    // Tests that non-finite vertices are skipped instead of drawn
    // Verified by building the path without checking its bounds
    #[test]
    fn test_fill_skips_non_finite() {
        let mut surface = unit_surface(8, 8);
        surface.fill_triangle(
            &[ORIGIN, Point::new(f64::NAN, 4.0), Point::new(0.0, 8.0)],
            LARGE_TILE_COLOR,
        );
        surface.stroke_triangle(
            &[ORIGIN, Point::new(f64::INFINITY, 4.0), Point::new(0.0, 8.0)],
            OUTLINE_COLOR,
            1.0,
        );
        assert_eq!(surface.count_color(BACKGROUND_COLOR), 64);
    }

    // Tests outlines along the edges but not through the interior
    // Verified by filling the path instead of stroking it
    #[test]
    fn test_stroke_triangle() {
        let mut surface = unit_surface(10, 10);
        let path = [
            Point::new(1.5, 1.5),
            Point::new(8.5, 1.5),
            Point::new(1.5, 8.5),
        ];
        surface.stroke_triangle(&path, OUTLINE_COLOR, 1.0);

        assert_eq!(surface.pixel(4, 1), Some(OUTLINE_COLOR));
        assert_eq!(surface.pixel(1, 4), Some(OUTLINE_COLOR));
        assert_eq!(surface.pixel(3, 3), Some(BACKGROUND_COLOR));
        assert_eq!(surface.pixel(9, 9), Some(BACKGROUND_COLOR));
    }

    // Tests that outlines thinner than a pixel still show up
    // Verified by skipping strokes narrower than a pixel
    #[test]
    fn test_stroke_hairline() {
        let mut surface = unit_surface(10, 10);
        let path = [
            Point::new(1.5, 1.5),
            Point::new(8.5, 1.5),
            Point::new(1.5, 8.5),
        ];
        surface.stroke_triangle(&path, OUTLINE_COLOR, 0.01);

        let marked = surface
            .to_image()
            .pixels()
            .filter(|pixel| pixel.0 != BACKGROUND_COLOR)
            .count();
        assert!(marked >= 14, "{marked} pixels marked");
        assert_eq!(surface.pixel(3, 3), Some(BACKGROUND_COLOR));
    }

    // Tests rendering a whole tiling with both tile colors visible
    // Verified by drawing tiles without their kind colors
    #[test]
    fn test_render_tiling() {
        let seed = generate_seed_ring(ORIGIN, 1.0).unwrap();
        let surface = RasterSurface::render(&seed, 64, 64, 4.0).unwrap();
        assert!(surface.count_color(SMALL_TILE_COLOR) > 0);
        assert_eq!(surface.count_color(LARGE_TILE_COLOR), 0);
        assert!(surface.count_color(OUTLINE_COLOR) > 0);

        let deflated = deflate_n_times(seed, 2).unwrap();
        let surface = RasterSurface::render(&deflated, 64, 64, 4.0).unwrap();
        assert!(surface.count_color(LARGE_TILE_COLOR) > 0);
        assert_eq!(surface.pixel(0, 0), Some(BACKGROUND_COLOR));
    }
}
