//! Input/output, configuration and error handling

/// Command-line parsing and run orchestration
pub mod cli;
/// Engine constants and run configuration
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG export
pub mod image;
/// Structured logging setup
pub mod logging;
/// Progress bars for sequential and fan-out runs
pub mod progress;
/// Animated GIF of successive generations
pub mod visualization;
