//! Error types for deflation, fan-out and export operations

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main error type for all deflation operations
#[derive(Debug)]
pub enum DeflationError {
    /// Raw tile discriminator outside the two recognised kinds
    ///
    /// Indicates a construction bug upstream; never coerced to a default rule.
    InvalidTileKind {
        /// The rejected discriminator
        value: u8,
    },

    /// A generation produced a NaN or infinite coordinate
    ///
    /// The generation is discarded and the collection keeps its previous state.
    NonFiniteGeometry {
        /// Generation being computed when the fault occurred (1-based)
        generation: usize,
        /// Index of the offending tile in the parent generation
        tile_index: usize,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Deflation stopped by a cancellation request
    Cancelled {
        /// Number of generations completed before stopping
        generation: usize,
    },

    /// Deflation ran past its deadline
    DeadlineExceeded {
        /// Number of generations completed before stopping
        generation: usize,
        /// Time spent when the deadline check tripped
        elapsed: Duration,
    },

    /// A sector worker terminated abnormally
    WorkerPanicked {
        /// Seed index of the sector
        sector: usize,
    },

    /// One or more sectors failed under the collect-all policy
    SectorsFailed {
        /// Seed index and error of every failed sector, in seed order
        failures: Vec<(usize, DeflationError)>,
    },

    /// Predicted tile counts no longer fit in `usize`
    CountOverflow {
        /// Generation at which the overflow occurred
        generation: usize,
    },

    /// Tile storage for a generation could not be reserved
    AllocationFailed {
        /// Generation the storage was meant for
        generation: usize,
        /// Number of tiles requested
        tiles: usize,
    },

    /// Global log subscriber could not be installed
    Logging {
        /// Description of the failure
        reason: String,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for DeflationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileKind { value } => {
                write!(f, "Invalid tile kind discriminator {value} (expected 0 or 1)")
            }
            Self::NonFiniteGeometry {
                generation,
                tile_index,
            } => {
                write!(
                    f,
                    "Non-finite geometry produced by tile {tile_index} during generation {generation}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Cancelled { generation } => {
                write!(f, "Deflation cancelled after {generation} generations")
            }
            Self::DeadlineExceeded {
                generation,
                elapsed,
            } => {
                write!(
                    f,
                    "Deflation deadline exceeded after {generation} generations ({elapsed:?})"
                )
            }
            Self::WorkerPanicked { sector } => {
                write!(f, "Worker for sector {sector} terminated abnormally")
            }
            Self::SectorsFailed { failures } => {
                write!(f, "{} sector(s) failed:", failures.len())?;
                for (sector, error) in failures {
                    write!(f, " [sector {sector}: {error}]")?;
                }
                Ok(())
            }
            Self::CountOverflow { generation } => {
                write!(f, "Tile count overflows at generation {generation}")
            }
            Self::AllocationFailed { generation, tiles } => {
                write!(
                    f,
                    "Cannot allocate {tiles} tiles for generation {generation}"
                )
            }
            Self::Logging { reason } => {
                write!(f, "Failed to initialise logging: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for DeflationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for deflation results
pub type Result<T> = std::result::Result<T, DeflationError>;

impl DeflationError {
    /// Whether the error came from a cooperative stop rather than a fault
    pub const fn is_interruption(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

impl From<std::io::Error> for DeflationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> DeflationError {
    DeflationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
