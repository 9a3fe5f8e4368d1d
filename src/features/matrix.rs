//! Immutable multi-channel feature raster consumed by the segmentation engine

use crate::io::error::{Result, SegmentationError};
use crate::segmentation::zone::Rect;
use ndarray::{Array3, ArrayView2, s};
use num_traits::ToPrimitive;

/// Per-pixel feature vectors laid out as (row, column, channel)
///
/// The engine never interprets the channels; it only measures their spread
/// over rectangles of pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array3<f64>,
}

impl FeatureMatrix {
    /// Wrap an existing (height, width, depth) array
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is zero
    pub fn new(data: Array3<f64>) -> Result<Self> {
        let (height, width, depth) = data.dim();
        if height == 0 || width == 0 || depth == 0 {
            return Err(SegmentationError::EmptyFeatures {
                width,
                height,
                depth,
            });
        }
        Ok(Self { data })
    }

    /// Build a matrix by evaluating `f(y, x, channel)` for every entry
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is zero
    pub fn from_fn<F>(width: usize, height: usize, depth: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        Self::new(Array3::from_shape_fn((height, width, depth), |(y, x, c)| {
            f(y, x, c)
        }))
    }

    /// Convert any numeric (height, width, depth) array into a feature matrix
    ///
    /// Values that cannot be represented as `f64` become `0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is zero
    pub fn from_values<T>(values: &Array3<T>) -> Result<Self>
    where
        T: ToPrimitive + Copy,
    {
        Self::new(values.mapv(|v| v.to_f64().unwrap_or(0.0)))
    }

    /// Raster width in pixels
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Raster height in pixels
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Number of feature channels per pixel
    pub fn depth(&self) -> usize {
        self.data.dim().2
    }

    /// Total number of pixels
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Feature value at row `y`, column `x`, channel `channel`
    pub fn value(&self, y: usize, x: usize, channel: usize) -> Option<f64> {
        self.data.get((y, x, channel)).copied()
    }

    /// Borrow one channel restricted to a rectangle, clamped to the raster
    pub fn channel_window(&self, rect: &Rect, channel: usize) -> ArrayView2<'_, f64> {
        let channel = channel.min(self.depth().saturating_sub(1));
        let x_to = rect.x_to.min(self.width());
        let y_to = rect.y_to.min(self.height());
        let x_from = rect.x_from.min(x_to);
        let y_from = rect.y_from.min(y_to);
        self.data.slice(s![y_from..y_to, x_from..x_to, channel])
    }

    /// Underlying (height, width, depth) array
    pub const fn data(&self) -> &Array3<f64> {
        &self.data
    }
}
