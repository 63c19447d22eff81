//! Tests for run configuration defaults and validation

#[cfg(test)]
mod tests {
    use penrose_deflation::deflation::driver::predict_counts;
    use penrose_deflation::deflation::tile_set::TileCounts;
    use penrose_deflation::geometry::point::Point;
    use penrose_deflation::geometry::tile::Tile;
    use penrose_deflation::io::configuration::{
        DEFAULT_DEPTH, DEFAULT_SCALE, DeflationConfig, MAX_DEPTH, SEED_TILE_COUNT, TOLERANCE,
    };
    use penrose_deflation::DeflationError;

    fn rejected_parameter(config: &DeflationConfig) -> Option<&'static str> {
        match config.validate() {
            Err(DeflationError::InvalidParameter { parameter, .. }) => Some(parameter),
            _ => None,
        }
    }

    // Tests that the default ring fills the default image
    // Verified by centering the ring at the origin
    #[test]
    fn test_default_config() {
        let config = DeflationConfig::default();
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.center, Point::new(50.0, 50.0));
        assert!((config.radius - 50.0).abs() < f64::EPSILON);
        assert!((config.tolerance - TOLERANCE).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    // Tests ring placement for other image sizes
    // Verified by ignoring the scale
    #[test]
    fn test_for_image() {
        let config = DeflationConfig::for_image(3, 200);
        let half = 200.0 / DEFAULT_SCALE / 2.0;
        assert_eq!(config.depth, 3);
        assert_eq!(config.center, Point::new(half, half));
        assert!((config.radius - half).abs() < f64::EPSILON);
    }

    // Tests each validation rule
    // Verified by accepting a negative tolerance
    #[test]
    fn test_validate_rejects_out_of_range() {
        let base = DeflationConfig::default();
        let cases = [
            (
                DeflationConfig {
                    depth: MAX_DEPTH + 1,
                    ..base
                },
                "depth",
            ),
            (
                DeflationConfig {
                    center: Point::new(0.0, f64::INFINITY),
                    ..base
                },
                "center",
            ),
            (
                DeflationConfig {
                    radius: -2.0,
                    ..base
                },
                "radius",
            ),
            (
                DeflationConfig {
                    tolerance: 0.0,
                    ..base
                },
                "tolerance",
            ),
        ];
        for (config, parameter) in cases {
            assert_eq!(rejected_parameter(&config), Some(parameter));
        }

        let deepest = DeflationConfig {
            depth: MAX_DEPTH,
            ..base
        };
        assert!(deepest.validate().is_ok());
    }

    // Tests that the deepest accepted run stays within a few gigabytes
    // Verified by raising the depth limit to 24
    #[test]
    fn test_max_depth_fits_in_memory() {
        let counts = predict_counts(TileCounts::new(SEED_TILE_COUNT, 0), MAX_DEPTH).unwrap();
        assert_eq!(counts.total(), 35_245_780);

        let bytes = counts.total() as u64 * std::mem::size_of::<Tile>() as u64;
        assert!(bytes < 4 << 30, "{bytes} bytes of tiles");
    }
}
