//! Segmentation constants and runtime configuration defaults

// Defaults for the three recognised segmentation options
/// Per-channel standard deviation at or below which a zone stays unsplit
pub const DEFAULT_SPLIT_THRESHOLD: f64 = 5.0;
/// Per-channel pooled standard deviation at or below which two segments may merge
pub const DEFAULT_MERGE_THRESHOLD: f64 = 5.0;
/// Pixel count at or below which a zone is never split
pub const DEFAULT_MIN_ZONE_SIZE: usize = 3;

/// Option key for the split threshold
pub const SPLIT_THRESHOLD_KEY: &str = "splitStandardDeviation";
/// Option key for the merge threshold
pub const MERGE_THRESHOLD_KEY: &str = "mergeStandardDeviation";
/// Option key for the minimum zone size
pub const MIN_ZONE_SIZE_KEY: &str = "minSize";

// Feature extraction defaults
/// Number of grey-level buckets for histogram features
pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 8;
/// Half-width of the square window histogram features are gathered over
pub const DEFAULT_HISTOGRAM_WINDOW: usize = 2;
/// Option key for the histogram bucket count
pub const HISTOGRAM_BUCKETS_KEY: &str = "buckets";
/// Option key for the histogram window radius
pub const HISTOGRAM_WINDOW_KEY: &str = "window";

/// Fixed seed for reproducible label palettes
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_segmented";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 120;
/// Number of frame delays the final GIF frame is held for
pub const FINAL_FRAME_HOLD: u32 = 10;

/// Name given to background segmentation threads
pub const WORKER_THREAD_NAME: &str = "segmentation";

/// Maximum per-file progress lines shown before older ones are dropped
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
