//! Tests for background runs, join-before-restart and cancellation

#[cfg(test)]
mod tests {
    use crate::{Recorder, two_blocks, uniform};
    use splitmerge::SegmentationError;
    use splitmerge::segmentation::engine::RunOutcome;
    use splitmerge::segmentation::parameters::SegmentationParameters;
    use splitmerge::segmentation::worker::SegmentationWorker;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[test]
    fn test_join_without_run() {
        let mut worker: SegmentationWorker<Recorder> = SegmentationWorker::new();
        assert!(!worker.has_run());
        assert!(!worker.is_running());
        assert!(matches!(worker.join(), Err(SegmentationError::NoActiveRun)));
        assert!(worker.cancel_and_join().expect("nothing to join").is_none());
    }

    #[test]
    fn test_start_and_join() {
        let mut worker = SegmentationWorker::new();
        worker
            .start(
                Arc::new(two_blocks(8, 8, 4, 0.0, 100.0)),
                SegmentationParameters::new(1.0, 1.0, 0),
                Recorder::default(),
            )
            .expect("worker starts");
        assert!(worker.has_run());

        let report = worker.join().expect("run completes");
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.labels.distinct_labels(), BTreeSet::from([1, 2]));
        assert_eq!(report.statistics.segments, 2);
        assert_eq!(report.observer.finished, 1);
        assert!(!worker.has_run());
    }

    // A second start before joining is refused
    #[test]
    fn test_start_requires_join() {
        let features = Arc::new(uniform(4, 4, 1.0));
        let params = SegmentationParameters::default();
        let mut worker = SegmentationWorker::new();

        worker
            .start(Arc::clone(&features), params, Recorder::default())
            .expect("worker starts");
        assert!(matches!(
            worker.start(Arc::clone(&features), params, Recorder::default()),
            Err(SegmentationError::RunInProgress)
        ));

        worker.join().expect("first run completes");
        worker
            .start(features, params, Recorder::default())
            .expect("worker restarts after join");
        worker.join().expect("second run completes");
    }

    #[test]
    fn test_restart_returns_previous_report() {
        let features = Arc::new(uniform(4, 4, 1.0));
        let params = SegmentationParameters::default();
        let mut worker = SegmentationWorker::new();

        let previous = worker
            .restart(Arc::clone(&features), params, Recorder::default())
            .expect("worker starts");
        assert!(previous.is_none());

        let previous = worker
            .restart(features, params, Recorder::default())
            .expect("worker restarts");
        assert!(previous.is_some());
        assert_eq!(
            worker.join().expect("run completes").outcome,
            RunOutcome::Completed
        );
    }

    // Whether the run finishes first depends on scheduling; either way it stops cleanly
    #[test]
    fn test_cancel_and_join() {
        let mut worker = SegmentationWorker::new();
        worker
            .start(
                Arc::new(two_blocks(64, 64, 17, 0.0, 100.0)),
                SegmentationParameters::new(1.0, 1.0, 0),
                Recorder::default(),
            )
            .expect("worker starts");

        let report = worker
            .cancel_and_join()
            .expect("run stops")
            .expect("run was active");
        match report.outcome {
            RunOutcome::Canceled => assert_eq!(report.observer.finished, 0),
            RunOutcome::Completed => assert_eq!(report.observer.finished, 1),
        }
        assert!(!worker.is_running());
    }

    #[test]
    fn test_drop_stops_run() {
        let mut worker = SegmentationWorker::new();
        worker
            .start(
                Arc::new(two_blocks(64, 64, 17, 0.0, 100.0)),
                SegmentationParameters::new(1.0, 1.0, 0),
                Recorder::default(),
            )
            .expect("worker starts");
        worker.cancel();
        drop(worker);
    }
}
