//! Quadtree split phase

use crate::features::matrix::FeatureMatrix;
use crate::features::statistics::is_homogeneous;
use crate::io::error::Result;
use crate::segmentation::graph::RegionGraph;
use crate::segmentation::parameters::SegmentationParameters;
use crate::segmentation::raster::LabelRaster;
use crate::segmentation::zone::{Rect, ZoneId};
use bitvec::prelude::*;

/// Splits non-homogeneous zones into quadrants, one round at a time
///
/// A zone's rectangle never changes, so once judged terminal it is
/// remembered and not measured again in later rounds.
pub struct Splitter<'a> {
    features: &'a FeatureMatrix,
    params: &'a SegmentationParameters,
    settled: BitVec,
}

impl<'a> Splitter<'a> {
    /// Create a splitter over a feature matrix
    pub fn new(features: &'a FeatureMatrix, params: &'a SegmentationParameters) -> Self {
        Self {
            features,
            params,
            settled: BitVec::new(),
        }
    }

    /// Whether a zone covering `rect` is kept as-is
    ///
    /// Terminal when it is no larger than the size floor, is 1 pixel wide or
    /// tall, or every channel's standard deviation is within the split
    /// threshold.
    pub fn is_terminal(&self, rect: &Rect) -> bool {
        rect.area() <= self.params.min_zone_size
            || rect.width() == 1
            || rect.height() == 1
            || is_homogeneous(self.features, rect, self.params.split_threshold)
    }

    /// Split every non-terminal live zone once, then repaint the raster
    ///
    /// Children created this round are not examined until the next round.
    /// Returns the number of zones split.
    ///
    /// # Errors
    ///
    /// Returns an error if a split produces an invalid zone
    pub fn split_round(&mut self, graph: &mut RegionGraph, raster: &mut LabelRaster) -> Result<usize> {
        let candidates: Vec<ZoneId> = graph
            .live_zones()
            .filter(|&id| !self.is_settled(id))
            .collect();

        let mut splits = 0;
        for id in candidates {
            let Some(rect) = graph.zone(id).map(|zone| zone.rect) else {
                continue;
            };
            if self.is_terminal(&rect) {
                self.settle(id);
            } else {
                graph.split_zone(id)?;
                splits += 1;
            }
        }

        graph.paint_live_zones(raster);
        Ok(splits)
    }

    fn is_settled(&self, id: ZoneId) -> bool {
        self.settled.get(id).is_some_and(|settled| *settled)
    }

    fn settle(&mut self, id: ZoneId) {
        if self.settled.len() <= id {
            self.settled.resize(id + 1, false);
        }
        self.settled.set(id, true);
    }
}
