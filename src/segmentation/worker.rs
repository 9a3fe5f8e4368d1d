//! Background execution of segmentation runs
//!
//! One worker runs at most one segmentation at a time on its own thread. A
//! run must be joined before the next one starts, so two runs never write the
//! same raster.

use crate::features::matrix::FeatureMatrix;
use crate::io::configuration::WORKER_THREAD_NAME;
use crate::io::error::{Result, SegmentationError};
use crate::segmentation::engine::{
    CancelToken, ProgressObserver, RunOutcome, RunStatistics, SegmentationEngine,
};
use crate::segmentation::parameters::SegmentationParameters;
use crate::segmentation::raster::LabelRaster;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Everything a finished background run hands back
#[derive(Debug)]
pub struct RunReport<O> {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Final label raster (partial if canceled)
    pub labels: LabelRaster,
    /// Counters gathered during the run
    pub statistics: RunStatistics,
    /// The observer, returned to the caller
    pub observer: O,
}

struct Job<O> {
    cancel: CancelToken,
    handle: JoinHandle<Result<RunReport<O>>>,
}

/// Runs segmentations on a background thread, one at a time
pub struct SegmentationWorker<O> {
    job: Option<Job<O>>,
}

impl<O> Default for SegmentationWorker<O> {
    fn default() -> Self {
        Self { job: None }
    }
}

impl<O> SegmentationWorker<O>
where
    O: ProgressObserver + Send + 'static,
{
    /// Create a worker with no run
    pub const fn new() -> Self {
        Self { job: None }
    }

    /// Start a run on a new thread
    ///
    /// `observer` is called from that thread and handed back in the report.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentationError::RunInProgress`] if an earlier run has not
    /// been joined, or an error if the thread cannot be spawned
    pub fn start(
        &mut self,
        features: Arc<FeatureMatrix>,
        params: SegmentationParameters,
        observer: O,
    ) -> Result<()> {
        if self.job.is_some() {
            return Err(SegmentationError::RunInProgress);
        }

        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut observer = observer;
                let mut engine = SegmentationEngine::new(params);
                let outcome = engine.run(&features, &mut observer, &token)?;
                Ok(RunReport {
                    outcome,
                    statistics: engine.statistics(),
                    labels: engine.into_labels(),
                    observer,
                })
            })
            .map_err(|source| SegmentationError::WorkerSpawn { source })?;

        debug!("segmentation worker started");
        self.job = Some(Job { cancel, handle });
        Ok(())
    }

    /// Whether a run has been started and not yet joined
    pub const fn has_run(&self) -> bool {
        self.job.is_some()
    }

    /// Whether the current run is still executing
    pub fn is_running(&self) -> bool {
        self.job.as_ref().is_some_and(|job| !job.handle.is_finished())
    }

    /// Request cancellation of the current run, if any
    pub fn cancel(&self) {
        if let Some(job) = &self.job {
            job.cancel.cancel();
        }
    }

    /// Wait for the current run to stop and collect its report
    ///
    /// # Errors
    ///
    /// Returns an error if no run was started, the run failed, or its thread
    /// panicked
    pub fn join(&mut self) -> Result<RunReport<O>> {
        let job = self.job.take().ok_or(SegmentationError::NoActiveRun)?;
        match job.handle.join() {
            Ok(report) => report,
            Err(_) => Err(SegmentationError::WorkerPanicked),
        }
    }

    /// Cancel and join the current run, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the run failed or its thread panicked
    pub fn cancel_and_join(&mut self) -> Result<Option<RunReport<O>>> {
        if self.job.is_none() {
            return Ok(None);
        }
        self.cancel();
        self.join().map(Some)
    }

    /// Stop any current run, wait for it, then start a new one
    ///
    /// Returns the report of the run that was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the previous run failed or the new one cannot start
    pub fn restart(
        &mut self,
        features: Arc<FeatureMatrix>,
        params: SegmentationParameters,
        observer: O,
    ) -> Result<Option<RunReport<O>>> {
        let previous = self.cancel_and_join()?;
        self.start(features, params, observer)?;
        Ok(previous)
    }
}

impl<O> Drop for SegmentationWorker<O> {
    fn drop(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel.cancel();
            // The report is discarded; only the thread must not outlive the worker
            drop(job.handle.join());
        }
    }
}
