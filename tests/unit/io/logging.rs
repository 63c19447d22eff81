//! Tests for log level selection and subscriber installation

#[cfg(test)]
mod tests {
    use penrose_deflation::io::logging::{init, level_for_verbosity};
    use penrose_deflation::DeflationError;

    // Tests the mapping from -v count to filter level
    // Verified by starting at info
    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(3), "trace");
        assert_eq!(level_for_verbosity(u8::MAX), "trace");
    }

    // Tests that a second global subscriber is refused with a typed error
    // Verified by ignoring the try_init result
    #[test]
    fn test_init_twice_fails() {
        let _ = init(0);
        assert!(matches!(init(1), Err(DeflationError::Logging { .. })));
    }
}
