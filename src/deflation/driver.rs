//! Repeated deflation over many generations
//!
//! Generations run strictly in sequence. Cancellation and deadlines are only
//! observed between generations since a generation has no suspension point.

use crate::deflation::seed::SeedRing;
use crate::deflation::tile_set::{TileCounts, TileSet};
use crate::io::configuration::DeflationConfig;
use crate::io::error::{DeflationError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared flag used to stop deflation between generations
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation for every holder of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Apply `n` generations of deflation in place
///
/// A bare [`Tile`](crate::geometry::tile::Tile) is wrapped into a
/// single-element collection first. `n = 0` returns the input unchanged.
///
/// # Errors
///
/// Returns an error if a generation produces non-finite geometry
pub fn deflate_n_times(collection: impl Into<TileSet>, n: usize) -> Result<TileSet> {
    DeflationDriver::new(n).run(collection)
}

/// Deflate the seed ring described by `config`
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a generation fails
pub fn run_sequential(config: &DeflationConfig) -> Result<TileSet> {
    config.validate()?;
    let seed = SeedRing::new(config.center, config.radius).combined()?;
    DeflationDriver::new(config.depth).run(seed)
}

/// Runs a fixed number of generations with optional cooperative stops
#[derive(Clone, Debug, Default)]
pub struct DeflationDriver {
    depth: usize,
    cancel: Option<CancelToken>,
    deadline: Option<Instant>,
}

impl DeflationDriver {
    /// Driver for `depth` generations without cancellation or deadline
    pub const fn new(depth: usize) -> Self {
        Self {
            depth,
            cancel: None,
            deadline: None,
        }
    }

    /// Stop when `token` is cancelled
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Stop when `deadline` has passed
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop once `timeout` has elapsed from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Number of generations this driver applies
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Deflate `collection` for the configured depth
    ///
    /// # Errors
    ///
    /// Returns an error if a generation fails, or if the run is cancelled or
    /// passes its deadline
    pub fn run(&self, collection: impl Into<TileSet>) -> Result<TileSet> {
        self.run_with(collection, |_, _| {})
    }

    /// Deflate `collection`, reporting each completed generation to `observer`
    ///
    /// The observer receives the 1-based generation number and the collection
    /// as it stands after that generation.
    ///
    /// # Errors
    ///
    /// Returns an error if a generation fails, or if the run is cancelled or
    /// passes its deadline
    pub fn run_with<F>(&self, collection: impl Into<TileSet>, mut observer: F) -> Result<TileSet>
    where
        F: FnMut(usize, &TileSet),
    {
        let mut tiles = collection.into();
        let started = Instant::now();

        for completed in 0..self.depth {
            self.check_interrupt(completed, started)?;
            tiles.deflate()?;
            tracing::trace!(
                generation = completed + 1,
                tiles = tiles.len(),
                "generation deflated"
            );
            observer(completed + 1, &tiles);
        }

        tracing::debug!(
            depth = self.depth,
            tiles = tiles.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "deflation finished"
        );
        Ok(tiles)
    }

    fn check_interrupt(&self, completed: usize, started: Instant) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(DeflationError::Cancelled {
                generation: completed,
            });
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(DeflationError::DeadlineExceeded {
                generation: completed,
                elapsed: started.elapsed(),
            });
        }
        Ok(())
    }
}

/// Tile counts after `generations` deflations of a collection with `seed` counts
///
/// # Errors
///
/// Returns [`DeflationError::CountOverflow`] if a count exceeds `usize`
pub fn predict_counts(seed: TileCounts, generations: usize) -> Result<TileCounts> {
    (1..=generations).try_fold(seed, |counts, generation| {
        counts
            .checked_next()
            .ok_or(DeflationError::CountOverflow { generation })
    })
}

/// Number of tiles whose area has collapsed below `tolerance`
pub fn count_degenerate(tiles: &TileSet, tolerance: f64) -> usize {
    tiles
        .tiles()
        .iter()
        .filter(|tile| tile.is_degenerate(tolerance))
        .count()
}
