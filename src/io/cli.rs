//! Command-line interface for deflating the seed ring and reporting tile counts

use crate::deflation::dispatcher::{FailurePolicy, FanOut, FanOutConfig};
use crate::deflation::driver::{DeflationDriver, count_degenerate};
use crate::deflation::seed::SeedRing;
use crate::deflation::tile_set::{TileCounts, TileSet};
use crate::io::configuration::{
    DEFAULT_DEPTH, DEFAULT_IMAGE_SIZE, DeflationConfig, GIF_FRAME_DELAY_MS, SEED_TILE_COUNT,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::export_tiles_as_png;
use crate::io::progress::ProgressManager;
use crate::io::visualization::GenerationCapture;
use clap::{ArgAction, Parser};
use std::fmt::Write as _;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "penrose-deflation")]
#[command(
    author,
    version,
    about = "Generate Penrose kite and dart tilings by golden-ratio deflation"
)]
/// Command-line arguments for the deflation tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Number of deflation generations
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Horizontal coordinate of the seed ring center (defaults to the image center)
    #[arg(long, allow_hyphen_values = true)]
    pub center_x: Option<f64>,

    /// Vertical coordinate of the seed ring center (defaults to the image center)
    #[arg(long, allow_hyphen_values = true)]
    pub center_y: Option<f64>,

    /// Seed ring radius (defaults to half the image extent)
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Deflate the ten seed sectors on separate workers
    #[arg(short, long)]
    pub parallel: bool,

    /// Render the final tiling to this PNG file
    #[arg(short, long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Capture every generation as an animated GIF
    #[arg(long, value_name = "GIF", conflicts_with = "parallel")]
    pub gif: Option<PathBuf>,

    /// Side of the square output image in pixels
    #[arg(long, default_value_t = DEFAULT_IMAGE_SIZE)]
    pub image_size: u32,

    /// Per-sector time limit in parallel mode
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Let every sector finish and report all failures instead of cancelling on the first
    #[arg(long)]
    pub collect_all: bool,

    /// Report counts and growth ratios for every depth up to --depth
    #[arg(long)]
    pub sweep: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Run configuration derived from the flags
    pub fn deflation_config(&self) -> DeflationConfig {
        let mut config = DeflationConfig::for_image(self.depth, self.image_size);
        if let Some(x) = self.center_x {
            config.center.x = x;
        }
        if let Some(y) = self.center_y {
            config.center.y = y;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        config
    }

    /// Fan-out configuration for a run of `config`
    ///
    /// Tiles are only kept when they will be rendered.
    pub fn fan_out_config(&self, config: &DeflationConfig, render: bool) -> FanOutConfig {
        FanOutConfig {
            depth: config.depth,
            tolerance: config.tolerance,
            timeout: self.timeout_ms.map(Duration::from_millis),
            policy: if self.collect_all {
                FailurePolicy::CollectAll
            } else {
                FailurePolicy::CancelOnFirstFailure
            },
            keep_tiles: render && self.output.is_some(),
        }
    }

    /// Depths to run: every depth up to `--depth` when sweeping, otherwise just `--depth`
    pub fn depths(&self) -> RangeInclusive<usize> {
        let first = if self.sweep {
            self.depth.min(1)
        } else {
            self.depth
        };
        first..=self.depth
    }

    const fn renders(&self) -> bool {
        self.output.is_some() || self.gif.is_some()
    }
}

/// Outcome of deflating the ring to one depth
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Generations applied
    pub depth: usize,
    /// Final tile counts
    pub counts: TileCounts,
    /// Wall time of the deflation
    pub elapsed: Duration,
    /// Whether the run used the fan-out dispatcher
    pub parallel: bool,
    /// Tiles whose area collapsed below the configured tolerance
    pub degenerate: usize,
}

impl RunSummary {
    /// Total number of tiles
    pub const fn tile_count(&self) -> usize {
        self.counts.total()
    }
}

/// One report line per summary, with the growth ratio to the previous line
pub fn format_summaries(summaries: &[RunSummary]) -> String {
    let mut report = String::new();
    let mut previous: Option<usize> = None;
    for summary in summaries {
        let _ = write!(
            report,
            "depth {}: {} tiles ({} small, {} large) in {:.3?}",
            summary.depth,
            summary.tile_count(),
            summary.counts.small,
            summary.counts.large,
            summary.elapsed
        );
        if let Some(before) = previous.filter(|&count| count > 0) {
            let _ = write!(
                report,
                ", ratio {:.6}",
                summary.tile_count() as f64 / before as f64
            );
        }
        report.push('\n');
        previous = Some(summary.tile_count());
    }
    report
}

/// Orchestrates deflation runs, rendering and progress display
pub struct Runner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl Runner {
    /// Create a new runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run every requested depth and return one summary per depth
    ///
    /// Rendering, when requested, happens for the final depth only.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a deflation run
    /// fails, or rendering output cannot be written
    pub fn run(&mut self) -> Result<Vec<RunSummary>> {
        let base = self.cli.deflation_config();
        base.validate()?;
        if self.cli.renders() && self.cli.image_size == 0 {
            return Err(invalid_parameter(
                "image_size",
                &self.cli.image_size,
                &"rendering needs at least one pixel",
            ));
        }

        let mut summaries = Vec::new();
        for depth in self.cli.depths() {
            let config = DeflationConfig { depth, ..base };
            let render = depth == self.cli.depth;
            let summary = if self.cli.parallel {
                self.run_parallel(&config, render)?
            } else {
                self.run_sequential(&config, render)?
            };

            tracing::info!(
                depth,
                tiles = summary.tile_count(),
                small = summary.counts.small,
                large = summary.counts.large,
                parallel = summary.parallel,
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "deflation run complete"
            );
            if summary.degenerate > 0 {
                tracing::warn!(
                    depth,
                    degenerate = summary.degenerate,
                    tolerance = config.tolerance,
                    "degenerate tiles detected"
                );
            }
            summaries.push(summary);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(summaries)
    }

    fn run_sequential(&mut self, config: &DeflationConfig, render: bool) -> Result<RunSummary> {
        let started = Instant::now();
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(1, config.depth);
        }

        let seed = SeedRing::new(config.center, config.radius).combined()?;
        let mut capture = (render && self.cli.gif.is_some())
            .then(|| {
                GenerationCapture::new(self.cli.image_size, self.cli.image_size, config.depth + 1)
            })
            .transpose()?;
        if let Some(ref mut capture) = capture {
            capture.capture(&seed);
        }

        let progress = self.progress_manager.as_ref();
        let result = DeflationDriver::new(config.depth).run_with(seed, |generation, current| {
            if let Some(pm) = progress {
                pm.update_generation(0, generation, current.len());
            }
            if let Some(ref mut capture) = capture {
                capture.capture(current);
            }
        });
        if let Some(pm) = progress {
            pm.complete_lane(0, result.is_ok());
        }
        let tiles = result?;
        let elapsed = started.elapsed();

        if render {
            self.export(&tiles, capture.as_ref())?;
        }

        Ok(RunSummary {
            depth: config.depth,
            counts: tiles.counts(),
            elapsed,
            parallel: false,
            degenerate: count_degenerate(&tiles, config.tolerance),
        })
    }

    fn run_parallel(&mut self, config: &DeflationConfig, render: bool) -> Result<RunSummary> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(SEED_TILE_COUNT, config.depth);
        }

        let ring = SeedRing::new(config.center, config.radius);
        let dispatcher = FanOut::new(self.cli.fan_out_config(config, render));
        let report = match self.progress_manager {
            Some(ref pm) => dispatcher.with_observer(pm).run_ring(&ring)?,
            None => dispatcher.run_ring(&ring)?,
        };

        if !report.is_consistent() {
            tracing::warn!("sector tile counts differ between seed tiles");
        }

        if render {
            self.export(&report.merged(), None)?;
        }

        Ok(RunSummary {
            depth: config.depth,
            counts: report.total_counts(),
            elapsed: report.elapsed,
            parallel: true,
            degenerate: report.degenerate_count(),
        })
    }

    fn export(&self, tiles: &TileSet, capture: Option<&GenerationCapture>) -> Result<()> {
        if let Some(ref path) = self.cli.output {
            export_tiles_as_png(tiles, self.cli.image_size, path)?;
            tracing::info!(path = %path.display(), tiles = tiles.len(), "tiling rendered");
        }
        if let (Some(path), Some(capture)) = (&self.cli.gif, capture) {
            capture.export_gif(path, GIF_FRAME_DELAY_MS)?;
            tracing::info!(
                path = %path.display(),
                frames = capture.frame_count(),
                "generation animation written"
            );
        }
        Ok(())
    }
}
