//! Per-file segmentation progress display with batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use crate::segmentation::engine::{Phase, ProgressObserver, RegionsChanged, RunOutcome};
use crate::segmentation::raster::LabelRaster;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ROUND_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {prefix} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for batch segmentation
///
/// Small batches get one line per file; larger batches add an overall bar
/// and keep only the most recent files on screen.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
        }
    }

    /// Prepare the display for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
    }

    /// Add a line for a file and return the observer that drives it
    pub fn start_file(&mut self, path: &Path) -> FileProgress {
        if self.file_bars.len() >= MAX_INDIVIDUAL_PROGRESS_BARS {
            let oldest = self.file_bars.remove(0);
            self.multi_progress.remove(&oldest);
        }

        let bar = self.multi_progress.add(ProgressBar::new_spinner());
        bar.set_style(ROUND_STYLE.clone());
        bar.set_prefix(
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );
        bar.set_message("starting");
        bar.enable_steady_tick(Duration::from_millis(120));
        self.file_bars.push(bar.clone());

        FileProgress { bar }
    }

    /// Mark a file as done and advance the batch bar
    pub fn complete_file(&self, progress: &FileProgress, outcome: RunOutcome, segments: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        let message = match outcome {
            RunOutcome::Completed => format!("✓ {segments} segments"),
            RunOutcome::Canceled => "canceled".to_string(),
        };
        progress.bar.finish_with_message(message);
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }
}

/// Progress line of a single file, updated from the segmentation run
#[derive(Debug, Clone)]
pub struct FileProgress {
    bar: ProgressBar,
}

impl FileProgress {
    /// Current status message
    pub fn message(&self) -> String {
        self.bar.message()
    }
}

impl ProgressObserver for FileProgress {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        let phase = match event.phase {
            Phase::Split => "split",
            Phase::Merge => "merge",
        };
        self.bar.set_message(format!(
            "{phase} round {} · {} segments",
            event.round, event.segment_count
        ));
        self.bar.tick();
    }

    fn on_finished(&mut self, _labels: &LabelRaster) {
        self.bar.set_message("finishing");
    }
}
