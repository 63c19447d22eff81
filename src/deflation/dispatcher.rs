//! Parallel fan-out of independent seed sectors
//!
//! Each sector is deflated by its own worker thread that owns the sector's
//! tiles outright. Workers report a typed result over a channel and the
//! dispatcher joins every worker before returning.

use crate::deflation::driver::{CancelToken, DeflationDriver, count_degenerate};
use crate::deflation::seed::SeedRing;
use crate::deflation::tile_set::{TileCounts, TileSet};
use crate::io::configuration::TOLERANCE;
use crate::io::error::{DeflationError, Result};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

/// How the dispatcher reacts to a failing sector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Cancel the remaining sectors and return the first failure
    #[default]
    CancelOnFirstFailure,
    /// Let every sector finish and report all failures together
    CollectAll,
}

/// Fan-out parameters shared read-only by all workers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanOutConfig {
    /// Generations each sector runs
    pub depth: usize,
    /// Area below which a final tile counts as degenerate
    pub tolerance: f64,
    /// Per-worker time limit, checked between generations
    pub timeout: Option<Duration>,
    /// Reaction to sector failures
    pub policy: FailurePolicy,
    /// Return each sector's tiles instead of only its counts
    pub keep_tiles: bool,
}

impl FanOutConfig {
    /// Count-only fan-out for `depth` generations
    pub const fn new(depth: usize) -> Self {
        Self {
            depth,
            tolerance: TOLERANCE,
            timeout: None,
            policy: FailurePolicy::CancelOnFirstFailure,
            keep_tiles: false,
        }
    }
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Outcome of one successfully deflated sector
#[derive(Clone, Debug, PartialEq)]
pub struct SectorReport {
    /// Seed index of the sector
    pub sector: usize,
    /// Tile counts after the final generation
    pub counts: TileCounts,
    /// Final tiles with an area below the configured tolerance
    pub degenerate: usize,
    /// Wall time spent by the worker
    pub elapsed: Duration,
    /// Final tiles, present when the fan-out keeps tiles
    pub tiles: Option<TileSet>,
}

/// Joined results of a whole fan-out, in seed order
#[derive(Clone, Debug, PartialEq)]
pub struct FanOutReport {
    /// One report per sector, ordered by seed index
    pub sectors: Vec<SectorReport>,
    /// Wall time from first spawn to final join
    pub elapsed: Duration,
}

impl FanOutReport {
    /// Counts summed over all sectors
    pub fn total_counts(&self) -> TileCounts {
        self.sectors
            .iter()
            .fold(TileCounts::default(), |total, report| {
                TileCounts::new(
                    total.small + report.counts.small,
                    total.large + report.counts.large,
                )
            })
    }

    /// Total number of tiles over all sectors
    pub fn tile_count(&self) -> usize {
        self.total_counts().total()
    }

    /// Degenerate tiles summed over all sectors
    pub fn degenerate_count(&self) -> usize {
        self.sectors.iter().map(|report| report.degenerate).sum()
    }

    /// Whether every sector ended with the same counts
    ///
    /// Seed tiles share one shape, so their sectors always grow identically.
    pub fn is_consistent(&self) -> bool {
        self.sectors
            .windows(2)
            .all(|pair| matches!(pair, [first, second] if first.counts == second.counts))
    }

    /// Kept tiles of all sectors nested one group per sector, in seed order
    pub fn merged(&self) -> TileSet {
        TileSet::nest(
            self.sectors
                .iter()
                .map(|report| report.tiles.clone().unwrap_or_default()),
        )
    }
}

/// Receives worker lifecycle events; called from worker threads
pub trait SectorObserver: Sync {
    /// A worker began deflating `sector`
    fn sector_started(&self, _sector: usize, _depth: usize) {}

    /// `sector` finished `generation` and now holds `tiles` tiles
    fn generation_completed(&self, _sector: usize, _generation: usize, _tiles: usize) {}

    /// `sector` finished, successfully or not
    fn sector_finished(&self, _sector: usize, _succeeded: bool) {}
}

/// Observer that ignores every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SectorObserver for NoopObserver {}

/// Dispatcher running one worker per sector
pub struct FanOut<'o> {
    config: FanOutConfig,
    observer: &'o dyn SectorObserver,
}

impl FanOut<'static> {
    /// Dispatcher without an observer
    pub fn new(config: FanOutConfig) -> Self {
        Self {
            config,
            observer: &NoopObserver,
        }
    }
}

impl<'o> FanOut<'o> {
    /// Report worker events to `observer`
    #[must_use]
    pub const fn with_observer<'n>(self, observer: &'n dyn SectorObserver) -> FanOut<'n> {
        FanOut {
            config: self.config,
            observer,
        }
    }

    /// Configuration the dispatcher runs with
    pub const fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// Split `ring` into sectors and deflate them in parallel
    ///
    /// # Errors
    ///
    /// Returns an error if the ring is invalid or sectors fail, per
    /// [`FanOut::run`]
    pub fn run_ring(&self, ring: &SeedRing) -> Result<FanOutReport> {
        self.run(ring.sectors()?)
    }

    /// Deflate every sector on its own worker and join them all
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::CancelOnFirstFailure`] returns the first failure
    /// reported by any worker. Under [`FailurePolicy::CollectAll`] returns
    /// [`DeflationError::SectorsFailed`] listing every failed sector. A worker
    /// that panics is reported as [`DeflationError::WorkerPanicked`].
    pub fn run(&self, sectors: Vec<TileSet>) -> Result<FanOutReport> {
        let started = Instant::now();
        let sector_count = sectors.len();
        let cancel = CancelToken::new();
        let (sender, receiver) = crossbeam_channel::unbounded::<(usize, Result<SectorReport>)>();

        tracing::info!(
            sectors = sector_count,
            depth = self.config.depth,
            policy = ?self.config.policy,
            "fanning out sectors"
        );

        let mut first_failure = None;
        let outcomes = std::thread::scope(|scope| {
            let handles: Vec<_> = sectors
                .into_iter()
                .enumerate()
                .map(|(sector, tiles)| {
                    let sender = sender.clone();
                    let cancel = cancel.clone();
                    let config = &self.config;
                    let observer = self.observer;
                    scope.spawn(move || {
                        let outcome = catch_unwind(AssertUnwindSafe(|| {
                            deflate_sector(sector, tiles, config, cancel, observer)
                        }))
                        .unwrap_or(Err(DeflationError::WorkerPanicked { sector }));
                        // The receiver outlives every worker inside this scope
                        let _ = sender.send((sector, outcome));
                    })
                })
                .collect();
            drop(sender);

            let mut outcomes: Vec<Option<Result<SectorReport>>> =
                (0..sector_count).map(|_| None).collect();
            for (sector, outcome) in &receiver {
                self.observer.sector_finished(sector, outcome.is_ok());
                if let Err(error) = &outcome {
                    if first_failure.is_none() {
                        first_failure = Some(sector);
                        if self.config.policy == FailurePolicy::CancelOnFirstFailure {
                            tracing::warn!(sector, %error, "sector failed, cancelling fan-out");
                            cancel.cancel();
                        }
                    }
                }
                if let Some(slot) = outcomes.get_mut(sector) {
                    *slot = Some(outcome);
                }
            }

            for (sector, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    if let Some(slot) = outcomes.get_mut(sector) {
                        *slot = Some(Err(DeflationError::WorkerPanicked { sector }));
                    }
                    first_failure.get_or_insert(sector);
                }
            }
            outcomes
        });

        let elapsed = started.elapsed();
        let mut reports = Vec::with_capacity(sector_count);
        let mut failures = Vec::new();
        for (sector, outcome) in outcomes.into_iter().enumerate() {
            match outcome.unwrap_or(Err(DeflationError::WorkerPanicked { sector })) {
                Ok(report) => reports.push(report),
                Err(error) => failures.push((sector, error)),
            }
        }

        if failures.is_empty() {
            tracing::info!(
                sectors = reports.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "fan-out joined"
            );
            return Ok(FanOutReport {
                sectors: reports,
                elapsed,
            });
        }

        match self.config.policy {
            FailurePolicy::CancelOnFirstFailure => {
                // Later failures are usually cancellations caused by the first one
                let root = first_failure
                    .and_then(|first| failures.iter().position(|(sector, _)| *sector == first))
                    .unwrap_or(0);
                let (_, error) = failures.swap_remove(root);
                Err(error)
            }
            FailurePolicy::CollectAll => Err(DeflationError::SectorsFailed { failures }),
        }
    }
}

fn deflate_sector(
    sector: usize,
    tiles: TileSet,
    config: &FanOutConfig,
    cancel: CancelToken,
    observer: &dyn SectorObserver,
) -> Result<SectorReport> {
    let started = Instant::now();
    observer.sector_started(sector, config.depth);

    let mut driver = DeflationDriver::new(config.depth).with_cancel(cancel);
    if let Some(timeout) = config.timeout {
        driver = driver.with_deadline(started + timeout);
    }

    let tiles = driver.run_with(tiles, |generation, current| {
        observer.generation_completed(sector, generation, current.len());
    })?;

    let elapsed = started.elapsed();
    tracing::debug!(
        sector,
        tiles = tiles.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "sector deflated"
    );

    Ok(SectorReport {
        sector,
        counts: tiles.counts(),
        degenerate: count_degenerate(&tiles, config.tolerance),
        elapsed,
        tiles: config.keep_tiles.then_some(tiles),
    })
}
