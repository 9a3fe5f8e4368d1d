//! Region merge phase
//!
//! Each round drops dead segments, stably re-sorts the survivors by pixel
//! count and relabels them 1, 2, ... in that order. Segments are then visited
//! smallest first; each absorbs its closest neighbour among those it is
//! homogeneous with. The phase ends after a round with no merge.

use crate::features::matrix::FeatureMatrix;
use crate::features::statistics::{combined_distance, pooled_std_devs, within_ceiling};
use crate::io::error::Result;
use crate::segmentation::graph::RegionGraph;
use crate::segmentation::parameters::SegmentationParameters;
use crate::segmentation::raster::LabelRaster;
use crate::segmentation::segment::{Segment, SegmentId};
use std::collections::BTreeSet;

/// A merge-eligible neighbour and its combined distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCandidate {
    /// Neighbouring segment
    pub segment: SegmentId,
    /// Euclidean norm of the pooled per-channel standard deviations
    pub distance: f64,
}

/// Contracts the segment graph one round at a time
pub struct Merger<'a> {
    features: &'a FeatureMatrix,
    params: &'a SegmentationParameters,
    order: Vec<SegmentId>,
}

impl<'a> Merger<'a> {
    /// Create a merger working over every live segment of `graph`
    pub fn new(
        features: &'a FeatureMatrix,
        params: &'a SegmentationParameters,
        graph: &RegionGraph,
    ) -> Self {
        Self {
            features,
            params,
            order: graph.live_segments().collect(),
        }
    }

    /// Processing order of the most recent round
    pub fn order(&self) -> &[SegmentId] {
        &self.order
    }

    /// Drop dead segments, stably sort by size and relabel from 1
    ///
    /// Returns the segments whose label changed.
    pub fn reorder(&mut self, graph: &mut RegionGraph) -> BTreeSet<SegmentId> {
        self.order.retain(|&id| graph.is_live_segment(id));
        self.order
            .sort_by_key(|&id| graph.segment(id).map_or(0, Segment::area));

        let mut relabelled = BTreeSet::new();
        for (position, &id) in self.order.iter().enumerate() {
            if graph.relabel(id, position as u32 + 1) {
                relabelled.insert(id);
            }
        }
        relabelled
    }

    /// Whether the pooled pixels of both segments are homogeneous
    ///
    /// Returns the per-channel pooled standard deviations when every channel
    /// is within the merge threshold.
    pub fn homogeneous_with(
        &self,
        graph: &RegionGraph,
        segment: SegmentId,
        other: SegmentId,
    ) -> Option<Vec<f64>> {
        let pooled = graph.segment_rects(segment).chain(graph.segment_rects(other));
        let std_devs = pooled_std_devs(self.features, pooled);
        std_devs
            .iter()
            .all(|&s| within_ceiling(s, self.params.merge_threshold))
            .then_some(std_devs)
    }

    /// Closest neighbour the segment is homogeneous with, if any
    ///
    /// Neighbours are scanned in index order and only a strictly smaller
    /// distance replaces the current best.
    pub fn best_homogeneous_neighbour(
        &self,
        graph: &RegionGraph,
        segment: SegmentId,
    ) -> Option<MergeCandidate> {
        let neighbours = graph.segment(segment)?.neighbours();

        let mut best: Option<MergeCandidate> = None;
        for &neighbour in neighbours {
            if graph.segment(neighbour).is_none_or(|n| n.area() == 0) {
                continue;
            }
            let Some(std_devs) = self.homogeneous_with(graph, segment, neighbour) else {
                continue;
            };
            let distance = combined_distance(&std_devs);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(MergeCandidate {
                    segment: neighbour,
                    distance,
                });
            }
        }
        best
    }

    /// Run one merge round and repaint every segment that changed
    ///
    /// Returns the number of merges performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph refuses a merge, which indicates
    /// corrupted bookkeeping
    pub fn merge_round(
        &mut self,
        graph: &mut RegionGraph,
        raster: &mut LabelRaster,
    ) -> Result<usize> {
        let mut changed = self.reorder(graph);

        let mut merges = 0;
        for &segment in &self.order {
            // Absorbed earlier this round
            if !graph.is_live_segment(segment) {
                continue;
            }
            if let Some(candidate) = self.best_homogeneous_neighbour(graph, segment) {
                graph.merge_segments(segment, candidate.segment)?;
                changed.insert(segment);
                merges += 1;
            }
        }

        for segment in changed {
            graph.paint_segment(segment, raster);
        }
        Ok(merges)
    }
}
