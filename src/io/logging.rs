//! Structured logging setup for the command-line tool
//!
//! Log lines go to stderr so tile counts on stdout stay machine-readable.
//! `RUST_LOG` takes precedence over the verbosity flag when it is set.

use crate::io::error::{DeflationError, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
pub const fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter used by [`init`]
pub fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)))
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns [`DeflationError::Logging`] if a global subscriber is already set
pub fn init(verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| DeflationError::Logging {
            reason: e.to_string(),
        })
}
