//! Conversion of source images into feature matrices

use crate::features::matrix::FeatureMatrix;
use crate::io::configuration::{
    DEFAULT_HISTOGRAM_BUCKETS, DEFAULT_HISTOGRAM_WINDOW, HISTOGRAM_BUCKETS_KEY,
    HISTOGRAM_WINDOW_KEY,
};
use crate::io::error::{Result, invalid_parameter};
use crate::segmentation::parameters::parse_option;
use image::DynamicImage;
use ndarray::Array3;
use std::collections::HashMap;

/// Produces one feature vector per pixel of a source image
pub trait FeatureExtractor {
    /// Number of channels each pixel's feature vector holds
    fn depth(&self) -> usize;

    /// Build the feature matrix for `image`
    ///
    /// # Errors
    ///
    /// Returns an error if the image has no pixels
    fn extract(&self, image: &DynamicImage) -> Result<FeatureMatrix>;
}

/// Red, green and blue intensities on a 0-255 scale
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorExtractor;

impl FeatureExtractor for ColorExtractor {
    fn depth(&self) -> usize {
        3
    }

    fn extract(&self, image: &DynamicImage) -> Result<FeatureMatrix> {
        let rgb = image.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let mut data = Array3::zeros((height, width, self.depth()));

        for (x, y, pixel) in rgb.enumerate_pixels() {
            for (c, &value) in pixel.0.iter().enumerate() {
                if let Some(entry) = data.get_mut((y as usize, x as usize, c)) {
                    *entry = f64::from(value);
                }
            }
        }

        FeatureMatrix::new(data)
    }
}

/// Grey-level histogram of the square window around each pixel
///
/// Bucket counts are expressed as a percentage of the window's pixels so
/// the thresholds stay comparable across window sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramExtractor {
    buckets: usize,
    window: usize,
}

impl Default for HistogramExtractor {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_HISTOGRAM_BUCKETS,
            window: DEFAULT_HISTOGRAM_WINDOW,
        }
    }
}

impl HistogramExtractor {
    /// Create an extractor with `buckets` grey-level bins over a window of
    /// half-width `window`
    ///
    /// # Errors
    ///
    /// Returns an error if `buckets` is zero or above 256
    pub fn new(buckets: usize, window: usize) -> Result<Self> {
        if buckets == 0 || buckets > 256 {
            return Err(invalid_parameter(
                "buckets",
                &buckets,
                &"must be between 1 and 256",
            ));
        }
        Ok(Self { buckets, window })
    }

    /// Overlay recognised string options (`buckets`, `window`)
    ///
    /// Absent or unparsable values keep the current setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting bucket count is out of range
    pub fn with_options(self, options: &HashMap<String, String>) -> Result<Self> {
        let buckets = parse_option(options, HISTOGRAM_BUCKETS_KEY).unwrap_or(self.buckets);
        let window = parse_option(options, HISTOGRAM_WINDOW_KEY).unwrap_or(self.window);
        Self::new(buckets, window)
    }

    /// Number of grey-level bins
    pub const fn buckets(&self) -> usize {
        self.buckets
    }

    /// Half-width of the sampling window
    pub const fn window(&self) -> usize {
        self.window
    }

    const fn bucket_of(&self, grey: u8) -> usize {
        grey as usize * self.buckets / 256
    }
}

impl FeatureExtractor for HistogramExtractor {
    fn depth(&self) -> usize {
        self.buckets
    }

    fn extract(&self, image: &DynamicImage) -> Result<FeatureMatrix> {
        let grey = image.to_luma8();
        let (width, height) = (grey.width() as usize, grey.height() as usize);
        let mut data = Array3::<f64>::zeros((height, width, self.buckets));
        let mut hits = vec![0_usize; self.buckets];

        for y in 0..height {
            let rows = y.saturating_sub(self.window)..(y + self.window + 1).min(height);
            for x in 0..width {
                let cols = x.saturating_sub(self.window)..(x + self.window + 1).min(width);
                let sampled = rows.len() * cols.len();

                hits.fill(0);
                for wy in rows.clone() {
                    for wx in cols.clone() {
                        let value = grey.get_pixel(wx as u32, wy as u32).0[0];
                        if let Some(count) = hits.get_mut(self.bucket_of(value)) {
                            *count += 1;
                        }
                    }
                }

                // Percentage of sampled pixels, scaled once per bucket
                for (bucket, &count) in hits.iter().enumerate() {
                    if let Some(entry) = data.get_mut((y, x, bucket)) {
                        *entry = count as f64 * 100.0 / sampled as f64;
                    }
                }
            }
        }

        FeatureMatrix::new(data)
    }
}
