//! Split → consolidate → merge orchestration with cooperative cancellation
//!
//! A run moves strictly forward through
//! `Idle → Splitting → Consolidating → Merging → Completed`, or drops to
//! `Canceled` when the cancel token is observed at the top of a split or
//! merge round. Rounds are never interrupted part-way, so every
//! [`ProgressObserver::on_regions_changed`] call sees a fully consistent
//! label raster.

use crate::features::matrix::FeatureMatrix;
use crate::io::error::Result;
use crate::segmentation::graph::RegionGraph;
use crate::segmentation::merger::Merger;
use crate::segmentation::parameters::SegmentationParameters;
use crate::segmentation::raster::LabelRaster;
use crate::segmentation::splitter::Splitter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Lifecycle of a segmentation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No run started yet
    Idle,
    /// Quadtree split rounds in progress
    Splitting,
    /// Deriving segment adjacency from zone adjacency
    Consolidating,
    /// Merge rounds in progress
    Merging,
    /// Both phases reached their fixed point
    Completed,
    /// Cancellation was observed at a round boundary
    Canceled,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both phases reached their fixed point and `on_finished` was delivered
    Completed,
    /// Cancellation was observed; `on_finished` was not delivered
    Canceled,
}

/// Phase a round belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Quadtree splitting
    Split,
    /// Region merging
    Merge,
}

/// Snapshot handed to observers after each completed round
#[derive(Debug, Clone, Copy)]
pub struct RegionsChanged<'a> {
    /// Phase the round belongs to
    pub phase: Phase,
    /// 1-based round number within the phase
    pub round: usize,
    /// Splits or merges performed this round
    pub changes: usize,
    /// Live segments after the round
    pub segment_count: usize,
    /// Label raster as left by the round
    pub labels: &'a LabelRaster,
}

/// Receives round-by-round progress from a run
///
/// Calls arrive synchronously on the thread executing the run.
pub trait ProgressObserver {
    /// The raster holds a new consistent labelling
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>);

    /// The run reached completion; never called for canceled runs
    fn on_finished(&mut self, _labels: &LabelRaster) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_regions_changed(&mut self, _event: &RegionsChanged<'_>) {}
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for &mut O {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        (**self).on_regions_changed(event);
    }

    fn on_finished(&mut self, labels: &LabelRaster) {
        (**self).on_finished(labels);
    }
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for Box<O> {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        (**self).on_regions_changed(event);
    }

    fn on_finished(&mut self, labels: &LabelRaster) {
        (**self).on_finished(labels);
    }
}

impl<O: ProgressObserver> ProgressObserver for Option<O> {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        if let Some(observer) = self {
            observer.on_regions_changed(event);
        }
    }

    fn on_finished(&mut self, labels: &LabelRaster) {
        if let Some(observer) = self {
            observer.on_finished(labels);
        }
    }
}

impl<A: ProgressObserver, B: ProgressObserver> ProgressObserver for (A, B) {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        self.0.on_regions_changed(event);
        self.1.on_regions_changed(event);
    }

    fn on_finished(&mut self, labels: &LabelRaster) {
        self.0.on_finished(labels);
        self.1.on_finished(labels);
    }
}

/// Shared cancellation request flag, polled at round boundaries
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    requested: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token with no cancellation requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the next round boundary
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_canceled(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// Counters gathered over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Split rounds completed
    pub split_rounds: usize,
    /// Zones split over all rounds
    pub splits: usize,
    /// Terminal zones when splitting ended
    pub terminal_zones: usize,
    /// Merge rounds completed
    pub merge_rounds: usize,
    /// Merges performed over all rounds
    pub merges: usize,
    /// Live segments when the run ended
    pub segments: usize,
}

/// Split-and-merge segmentation engine
///
/// Owns the label raster and the zone/segment graph of its current run.
pub struct SegmentationEngine {
    params: SegmentationParameters,
    state: EngineState,
    labels: LabelRaster,
    graph: Option<RegionGraph>,
    statistics: RunStatistics,
}

impl SegmentationEngine {
    /// Create an idle engine
    pub fn new(params: SegmentationParameters) -> Self {
        Self {
            params,
            state: EngineState::Idle,
            labels: LabelRaster::new(0, 0),
            graph: None,
            statistics: RunStatistics::default(),
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Parameters used by runs of this engine
    pub const fn parameters(&self) -> &SegmentationParameters {
        &self.params
    }

    /// Label raster of the latest run
    pub const fn labels(&self) -> &LabelRaster {
        &self.labels
    }

    /// Zone/segment graph of the latest run, once it stopped
    pub const fn graph(&self) -> Option<&RegionGraph> {
        self.graph.as_ref()
    }

    /// Counters of the latest run
    pub const fn statistics(&self) -> RunStatistics {
        self.statistics
    }

    /// Consume the engine, keeping the label raster
    pub fn into_labels(self) -> LabelRaster {
        self.labels
    }

    /// Segment `features` until both phases reach a fixed point or `cancel` is observed
    ///
    /// `observer` is told about every completed round and, on natural
    /// completion only, about the end of the run. A previous run's raster and
    /// graph are discarded. Thresholds are the ones the engine was created
    /// with; build another engine to run with different parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone graph is found corrupted (an invalid zone
    /// or a refused merge); the run is abandoned without `on_finished`
    pub fn run<O>(
        &mut self,
        features: &FeatureMatrix,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> Result<RunOutcome>
    where
        O: ProgressObserver + ?Sized,
    {
        let params = self.params;
        self.state = EngineState::Idle;
        self.statistics = RunStatistics::default();
        self.graph = None;
        self.labels = LabelRaster::new(features.width(), features.height());
        let mut graph = RegionGraph::new(features.width(), features.height())?;

        info!(
            width = features.width(),
            height = features.height(),
            depth = features.depth(),
            split_threshold = params.split_threshold,
            merge_threshold = params.merge_threshold,
            min_zone_size = params.min_zone_size,
            "starting split-and-merge run"
        );

        self.state = EngineState::Splitting;
        let mut splitter = Splitter::new(features, &params);
        loop {
            if cancel.is_canceled() {
                return Ok(self.cancel_run(graph));
            }
            let splits = splitter.split_round(&mut graph, &mut self.labels)?;
            self.statistics.split_rounds += 1;
            self.statistics.splits += splits;

            let segment_count = graph.live_segment_count();
            debug!(
                round = self.statistics.split_rounds,
                splits, segment_count, "split round complete"
            );
            observer.on_regions_changed(&RegionsChanged {
                phase: Phase::Split,
                round: self.statistics.split_rounds,
                changes: splits,
                segment_count,
                labels: &self.labels,
            });

            if splits == 0 {
                break;
            }
        }
        self.statistics.terminal_zones = graph.live_zone_count();

        self.state = EngineState::Consolidating;
        graph.consolidate_adjacency();
        info!(
            zones = self.statistics.terminal_zones,
            split_rounds = self.statistics.split_rounds,
            "split phase reached fixed point"
        );

        self.state = EngineState::Merging;
        let mut merger = Merger::new(features, &params, &graph);
        loop {
            if cancel.is_canceled() {
                return Ok(self.cancel_run(graph));
            }
            let merges = merger.merge_round(&mut graph, &mut self.labels)?;
            self.statistics.merge_rounds += 1;
            self.statistics.merges += merges;

            let segment_count = graph.live_segment_count();
            debug!(
                round = self.statistics.merge_rounds,
                merges, segment_count, "merge round complete"
            );
            observer.on_regions_changed(&RegionsChanged {
                phase: Phase::Merge,
                round: self.statistics.merge_rounds,
                changes: merges,
                segment_count,
                labels: &self.labels,
            });

            if merges == 0 {
                break;
            }
        }

        self.statistics.segments = graph.live_segment_count();
        self.graph = Some(graph);
        self.state = EngineState::Completed;
        info!(
            segments = self.statistics.segments,
            merge_rounds = self.statistics.merge_rounds,
            "segmentation complete"
        );
        observer.on_finished(&self.labels);
        Ok(RunOutcome::Completed)
    }

    fn cancel_run(&mut self, graph: RegionGraph) -> RunOutcome {
        info!(
            phase = ?self.state,
            split_rounds = self.statistics.split_rounds,
            merge_rounds = self.statistics.merge_rounds,
            "segmentation canceled"
        );
        self.statistics.segments = graph.live_segment_count();
        self.graph = Some(graph);
        self.state = EngineState::Canceled;
        RunOutcome::Canceled
    }
}
