//! Per-pixel label output rewritten as the segmentation progresses

use crate::segmentation::zone::Rect;
use ndarray::{Array2, s};
use std::collections::BTreeSet;

/// Width x height grid of segment labels, indexed `[y, x]`
///
/// Zero means "not yet labelled"; every completed round leaves each pixel
/// carrying its owning segment's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRaster {
    labels: Array2<u32>,
}

impl LabelRaster {
    /// Create an unlabelled raster
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            labels: Array2::zeros((height, width)),
        }
    }

    /// Raster width in pixels
    pub fn width(&self) -> usize {
        self.labels.ncols()
    }

    /// Raster height in pixels
    pub fn height(&self) -> usize {
        self.labels.nrows()
    }

    /// Label of pixel (x, y)
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        self.labels.get([y, x]).copied()
    }

    /// Write `label` over every pixel of `rect`, clamped to the raster
    pub fn fill(&mut self, rect: &Rect, label: u32) {
        let x_to = rect.x_to.min(self.width());
        let y_to = rect.y_to.min(self.height());
        let x_from = rect.x_from.min(x_to);
        let y_from = rect.y_from.min(y_to);
        self.labels
            .slice_mut(s![y_from..y_to, x_from..x_to])
            .fill(label);
    }

    /// Distinct labels currently present
    pub fn distinct_labels(&self) -> BTreeSet<u32> {
        self.labels.iter().copied().collect()
    }

    /// Row-major label array
    pub const fn as_array(&self) -> &Array2<u32> {
        &self.labels
    }
}
