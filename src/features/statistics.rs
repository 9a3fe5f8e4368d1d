//! Per-channel spread of feature values over pooled pixel rectangles
//!
//! Homogeneity during splitting looks at a single zone; merge eligibility pools
//! every zone of two segments. Both use the same population statistics: the
//! combined mean first, then the mean squared deviation from it.

use crate::features::matrix::FeatureMatrix;
use crate::segmentation::zone::Rect;
use std::cmp::Ordering;

/// Mean and population standard deviation of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStatistics {
    /// Arithmetic mean of the pooled values
    pub mean: f64,
    /// Square root of the mean squared deviation
    pub std_dev: f64,
    /// Number of pooled pixels
    pub count: usize,
}

/// Statistics of one channel over the union of several rectangles
///
/// Returns `None` when the rectangles cover no pixels.
pub fn pooled_channel_statistics<'r, I>(
    features: &FeatureMatrix,
    rects: I,
    channel: usize,
) -> Option<ChannelStatistics>
where
    I: IntoIterator<Item = &'r Rect> + Clone,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for rect in rects.clone() {
        let window = features.channel_window(rect, channel);
        sum += window.sum();
        count += window.len();
    }

    if count == 0 {
        return None;
    }

    let mean = sum / count as f64;
    let squared_deviation: f64 = rects
        .into_iter()
        .map(|rect| {
            features
                .channel_window(rect, channel)
                .fold(0.0, |acc, &v| acc + (v - mean).powi(2))
        })
        .sum();

    Some(ChannelStatistics {
        mean,
        std_dev: (squared_deviation / count as f64).sqrt(),
        count,
    })
}

/// Statistics of one channel within a single rectangle
pub fn channel_statistics(
    features: &FeatureMatrix,
    rect: &Rect,
    channel: usize,
) -> Option<ChannelStatistics> {
    pooled_channel_statistics(features, std::iter::once(rect), channel)
}

/// Pooled standard deviation of every channel, in channel order
pub fn pooled_std_devs<'r, I>(features: &FeatureMatrix, rects: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'r Rect> + Clone,
{
    (0..features.depth())
        .map(|channel| {
            pooled_channel_statistics(features, rects.clone(), channel)
                .map_or(0.0, |stats| stats.std_dev)
        })
        .collect()
}

/// Whether a spread does not exceed `ceiling`
///
/// Only a spread strictly above the ceiling disqualifies, so a NaN spread
/// (from NaN features) counts as within it.
pub fn within_ceiling(std_dev: f64, ceiling: f64) -> bool {
    std_dev.partial_cmp(&ceiling) != Some(Ordering::Greater)
}

/// Whether every channel's spread within the rectangle stays within `threshold`
pub fn is_homogeneous(features: &FeatureMatrix, rect: &Rect, threshold: f64) -> bool {
    (0..features.depth()).all(|channel| {
        channel_statistics(features, rect, channel)
            .is_none_or(|stats| within_ceiling(stats.std_dev, threshold))
    })
}

/// Euclidean norm of per-channel standard deviations
pub fn combined_distance(std_devs: &[f64]) -> f64 {
    std_devs.iter().map(|s| s * s).sum::<f64>().sqrt()
}
