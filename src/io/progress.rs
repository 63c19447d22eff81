//! Per-sector progress tracking with automatic batching for many lanes

use crate::deflation::dispatcher::SectorObserver;
use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates progress display for sequential and fan-out runs
///
/// Each lane (the whole ring, or one sector) gets its own generation bar while
/// the lane count stays small; beyond that a single batch bar counts
/// generations across all lanes.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    lane_bars: Vec<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>10} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Generations: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a progress manager with no bars
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            lane_bars: Vec::new(),
        }
    }

    /// Replace any existing bars with `lanes` lanes of `generations` steps
    pub fn initialize(&mut self, lanes: usize, generations: usize) {
        self.clear();

        if lanes > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new((lanes * generations) as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
            return;
        }

        for lane in 0..lanes {
            let bar = ProgressBar::new(generations as u64);
            bar.set_style(PROGRESS_STYLE.clone());
            bar.set_prefix(if lanes == 1 {
                "ring".to_string()
            } else {
                format!("sector {lane}")
            });
            self.lane_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Number of individual lane bars currently shown
    pub const fn lane_count(&self) -> usize {
        self.lane_bars.len()
    }

    /// Whether lanes are summarised by a single batch bar
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Record that `lane` completed `generation` and holds `tiles` tiles
    pub fn update_generation(&self, lane: usize, generation: usize, tiles: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(bar) = self.lane_bars.get(lane) {
            bar.set_position(generation as u64);
            bar.set_message(format!("{tiles} tiles"));
        }
    }

    /// Mark `lane` as finished
    pub fn complete_lane(&self, lane: usize, succeeded: bool) {
        if let Some(bar) = self.lane_bars.get(lane) {
            if succeeded {
                bar.finish();
            } else {
                bar.abandon_with_message("failed");
            }
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All sectors deflated");
        }
        let _ = self.multi_progress.clear();
    }

    fn clear(&mut self) {
        for bar in self.lane_bars.drain(..) {
            self.multi_progress.remove(&bar);
        }
        if let Some(batch_bar) = self.batch_bar.take() {
            self.multi_progress.remove(&batch_bar);
        }
    }
}

impl SectorObserver for ProgressManager {
    fn generation_completed(&self, sector: usize, generation: usize, tiles: usize) {
        self.update_generation(sector, generation, tiles);
    }

    fn sector_finished(&self, sector: usize, succeeded: bool) {
        self.complete_lane(sector, succeeded);
    }
}
