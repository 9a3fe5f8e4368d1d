//! Unit tests mirroring the `src` tree


use splitmerge::features::matrix::FeatureMatrix;
use splitmerge::segmentation::engine::{Phase, ProgressObserver, RegionsChanged};
use splitmerge::segmentation::raster::LabelRaster;

/// Single-channel matrix holding one value everywhere
pub fn uniform(width: usize, height: usize, value: f64) -> FeatureMatrix {
    FeatureMatrix::from_fn(width, height, 1, |_, _, _| value).expect("non-empty matrix")
}

/// Single-channel matrix with `left` before column `boundary` and `right` from it on
pub fn two_blocks(width: usize, height: usize, boundary: usize, left: f64, right: f64) -> FeatureMatrix {
    FeatureMatrix::from_fn(width, height, 1, |_, x, _| if x < boundary { left } else { right })
        .expect("non-empty matrix")
}

/// Single-channel matrix from row-major values
pub fn grey(rows: &[&[f64]]) -> FeatureMatrix {
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());
    FeatureMatrix::from_fn(width, height, 1, |y, x, _| rows[y][x]).expect("non-empty matrix")
}

/// Round notification as recorded by [`Recorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedRound {
    /// Phase the round belonged to
    pub phase: Phase,
    /// Round number within the phase
    pub round: usize,
    /// Splits or merges performed
    pub changes: usize,
    /// Live segments after the round
    pub segment_count: usize,
}

/// Observer keeping every notification and raster snapshot
#[derive(Debug, Default)]
pub struct Recorder {
    /// Every round notification, in order
    pub rounds: Vec<RecordedRound>,
    /// Label raster as seen at each notification
    pub snapshots: Vec<LabelRaster>,
    /// Number of completion notifications
    pub finished: usize,
}

impl ProgressObserver for Recorder {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        self.rounds.push(RecordedRound {
            phase: event.phase,
            round: event.round,
            changes: event.changes,
            segment_count: event.segment_count,
        });
        self.snapshots.push(event.labels.clone());
    }

    fn on_finished(&mut self, _labels: &LabelRaster) {
        self.finished += 1;
    }
}
