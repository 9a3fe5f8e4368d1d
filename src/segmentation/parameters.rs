//! Thresholds controlling when zones split and segments merge

use crate::io::configuration::{
    DEFAULT_MERGE_THRESHOLD, DEFAULT_MIN_ZONE_SIZE, DEFAULT_SPLIT_THRESHOLD, MERGE_THRESHOLD_KEY,
    MIN_ZONE_SIZE_KEY, SPLIT_THRESHOLD_KEY,
};
use crate::io::error::{Result, invalid_parameter};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

/// Segmentation thresholds; the engine treats them as already validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParameters {
    /// Per-channel standard deviation ceiling for a zone to stay unsplit
    pub split_threshold: f64,
    /// Per-channel pooled standard deviation ceiling for two segments to merge
    pub merge_threshold: f64,
    /// Pixel count at or below which a zone is never split
    pub min_zone_size: usize,
}

impl Default for SegmentationParameters {
    fn default() -> Self {
        Self {
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            min_zone_size: DEFAULT_MIN_ZONE_SIZE,
        }
    }
}

impl SegmentationParameters {
    /// Create parameters from explicit values
    pub const fn new(split_threshold: f64, merge_threshold: f64, min_zone_size: usize) -> Self {
        Self {
            split_threshold,
            merge_threshold,
            min_zone_size,
        }
    }

    /// Overlay recognised string options onto these parameters
    ///
    /// Recognises `splitStandardDeviation`, `mergeStandardDeviation` and
    /// `minSize`. Absent keys and values that fail to parse keep the current
    /// value; unknown keys are ignored.
    #[must_use]
    pub fn with_options(mut self, options: &HashMap<String, String>) -> Self {
        if let Some(value) = parse_option(options, SPLIT_THRESHOLD_KEY) {
            self.split_threshold = value;
        }
        if let Some(value) = parse_option(options, MERGE_THRESHOLD_KEY) {
            self.merge_threshold = value;
        }
        if let Some(value) = parse_option(options, MIN_ZONE_SIZE_KEY) {
            self.min_zone_size = value;
        }
        self
    }

    /// Check the thresholds are usable before handing them to the engine
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is negative or not finite
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("split_threshold", self.split_threshold),
            ("merge_threshold", self.merge_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(
                    name,
                    &value,
                    &"must be a finite, non-negative standard deviation",
                ));
            }
        }
        Ok(())
    }
}

/// Parse one option, logging values that are present but malformed
pub(crate) fn parse_option<T: FromStr>(options: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = options.get(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(key, value = raw.as_str(), "ignoring unparsable option");
    }
    parsed
}
