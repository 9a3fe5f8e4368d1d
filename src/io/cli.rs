//! Command-line interface for batch segmentation of PNG files

use crate::features::extraction::{ColorExtractor, FeatureExtractor, HistogramExtractor};
use crate::io::configuration::{
    DEFAULT_HISTOGRAM_BUCKETS, DEFAULT_HISTOGRAM_WINDOW, DEFAULT_MERGE_THRESHOLD,
    DEFAULT_MIN_ZONE_SIZE, DEFAULT_SEED, DEFAULT_SPLIT_THRESHOLD, GIF_FRAME_DELAY_MS,
    OUTPUT_SUFFIX,
};
use crate::io::error::{Result, SegmentationError, invalid_parameter};
use crate::io::image::{LabelPalette, PaletteMode, export_png, render_mean_colors};
use crate::io::progress::ProgressManager;
use crate::io::visualization::VisualizationCapture;
use crate::segmentation::parameters::SegmentationParameters;
use crate::segmentation::worker::SegmentationWorker;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing::level_filters::LevelFilter;

/// Per-pixel features the segmentation compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FeatureKind {
    /// Red, green and blue intensities
    #[default]
    Color,
    /// Windowed grey-level histogram
    Histogram,
}

impl FeatureKind {
    /// Build the extractor for this feature family
    ///
    /// `buckets` and `window` only apply to histograms.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram bucket count is out of range
    pub fn extractor(self, buckets: usize, window: usize) -> Result<Box<dyn FeatureExtractor>> {
        Ok(match self {
            Self::Color => Box::new(ColorExtractor),
            Self::Histogram => Box::new(HistogramExtractor::new(buckets, window)?),
        })
    }
}

#[derive(Parser)]
#[command(name = "splitmerge")]
#[command(
    author,
    version,
    about = "Segment images into homogeneous regions by quadtree split and merge"
)]
/// Command-line arguments for the segmentation tool
// Independent on/off switches for output and verbosity
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Per-channel standard deviation at or below which a zone is not split
    #[arg(short = 't', long, default_value_t = DEFAULT_SPLIT_THRESHOLD)]
    pub split_threshold: f64,

    /// Per-channel pooled standard deviation at or below which segments merge
    #[arg(short = 'm', long, default_value_t = DEFAULT_MERGE_THRESHOLD)]
    pub merge_threshold: f64,

    /// Zones of at most this many pixels are never split
    #[arg(long, default_value_t = DEFAULT_MIN_ZONE_SIZE)]
    pub min_size: usize,

    /// Feature family compared between pixels
    #[arg(short, long, value_enum, default_value_t = FeatureKind::Color)]
    pub features: FeatureKind,

    /// Grey-level buckets for histogram features
    #[arg(short, long, default_value_t = DEFAULT_HISTOGRAM_BUCKETS)]
    pub buckets: usize,

    /// Half-width of the histogram sampling window
    #[arg(short, long, default_value_t = DEFAULT_HISTOGRAM_WINDOW)]
    pub window: usize,

    /// How segments are coloured in the output image
    #[arg(short, long, value_enum, default_value_t = PaletteMode::Random)]
    pub palette: PaletteMode,

    /// Seed for the random label palette
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Export every round as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every split and merge round
    #[arg(long)]
    pub verbose: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Most detailed log level to emit
    pub const fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::WARN
        } else {
            LevelFilter::INFO
        }
    }

    /// Segmentation thresholds given on the command line
    pub const fn parameters(&self) -> SegmentationParameters {
        SegmentationParameters::new(self.split_threshold, self.merge_threshold, self.min_size)
    }
}

/// Orchestrates batch segmentation of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid, the target cannot be
    /// read, or any file fails to segment or export
    pub fn process(&mut self) -> Result<()> {
        let params = self.cli.parameters();
        params.validate()?;
        self.cli
            .features
            .extractor(self.cli.buckets, self.cli.window)?;

        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file, params)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if is_png(target) {
                Ok(self
                    .should_process_file(target)
                    .then(|| target.clone())
                    .into_iter()
                    .collect())
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"file must be a PNG image",
                ))
            }
        } else if target.is_dir() {
            let read_error = |source: std::io::Error| SegmentationError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source,
            };
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if is_png(&path)
                    && !is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = output_path(input_path);
        if output_path.exists() {
            info!(file = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, params: SegmentationParameters) -> Result<()> {
        let start_time = Instant::now();

        let source = image::open(input_path).map_err(|e| SegmentationError::ImageLoad {
            path: input_path.to_path_buf(),
            source: e,
        })?;
        let features = self
            .cli
            .features
            .extractor(self.cli.buckets, self.cli.window)?
            .extract(&source)?;

        let progress = self
            .progress_manager
            .as_mut()
            .map(|pm| pm.start_file(input_path));
        let palette = LabelPalette::new(self.cli.seed);
        let capture = self
            .cli
            .visualize
            .then(|| VisualizationCapture::new(palette));

        let mut worker = SegmentationWorker::new();
        worker.start(Arc::new(features), params, (progress, capture))?;
        let report = worker.join()?;
        let (progress, capture) = report.observer;

        let rendered = match self.cli.palette {
            PaletteMode::Random => palette.render(&report.labels),
            PaletteMode::Mean => render_mean_colors(&report.labels, &source.to_rgba8())?,
        };
        export_png(&rendered, &output_path(input_path))?;

        if let Some(capture) = capture {
            capture.export_gif(&visualization_path(input_path), GIF_FRAME_DELAY_MS)?;
        }

        if let (Some(pm), Some(progress)) = (&self.progress_manager, &progress) {
            pm.complete_file(progress, report.outcome, report.statistics.segments);
        }

        info!(
            file = %input_path.display(),
            segments = report.statistics.segments,
            splits = report.statistics.splits,
            merges = report.statistics.merges,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "segmented"
        );

        Ok(())
    }
}

/// Path the segmented image of `input_path` is written to
pub fn output_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let extension = input_path.extension().unwrap_or_default();
    let output_name = format!(
        "{}{}.{}",
        stem.to_string_lossy(),
        OUTPUT_SUFFIX,
        extension.to_string_lossy()
    );
    input_path.with_file_name(output_name)
}

/// Path the round-by-round GIF of `input_path` is written to
pub fn visualization_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    input_path.with_file_name(format!("{}_visualization.gif", stem.to_string_lossy()))
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

fn is_generated_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
