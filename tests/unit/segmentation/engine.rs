//! Tests for the engine state machine, observers and cancellation

#[cfg(test)]
mod tests {
    use crate::{RecordedRound, Recorder, two_blocks, uniform};
    use splitmerge::segmentation::engine::{
        CancelToken, EngineState, NoopObserver, Phase, ProgressObserver, RegionsChanged,
        RunOutcome, RunStatistics, SegmentationEngine,
    };
    use splitmerge::segmentation::parameters::SegmentationParameters;
    use splitmerge::segmentation::raster::LabelRaster;
    use std::collections::BTreeSet;

    /// Requests cancellation as soon as it hears about the first round
    struct CancelAfterFirstRound {
        token: CancelToken,
        rounds: usize,
    }

    impl ProgressObserver for CancelAfterFirstRound {
        fn on_regions_changed(&mut self, _event: &RegionsChanged<'_>) {
            self.rounds += 1;
            self.token.cancel();
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = SegmentationEngine::new(SegmentationParameters::default());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.parameters(), &SegmentationParameters::default());
        assert_eq!(engine.labels().width(), 0);
        assert!(engine.graph().is_none());
        assert_eq!(engine.statistics(), RunStatistics::default());
    }

    // Both phases report their final, change-free round
    #[test]
    fn test_uniform_run() {
        let features = uniform(4, 4, 9.0);
        let mut engine = SegmentationEngine::new(SegmentationParameters::default());
        let mut recorder = Recorder::default();

        let outcome = engine
            .run(&features, &mut recorder, &CancelToken::new())
            .expect("valid run");

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(engine.state(), EngineState::Completed);
        assert_eq!(engine.labels().distinct_labels(), BTreeSet::from([1]));
        assert_eq!(
            recorder.rounds,
            vec![
                RecordedRound {
                    phase: Phase::Split,
                    round: 1,
                    changes: 0,
                    segment_count: 1
                },
                RecordedRound {
                    phase: Phase::Merge,
                    round: 1,
                    changes: 0,
                    segment_count: 1
                },
            ]
        );
        assert_eq!(recorder.finished, 1);
        assert_eq!(
            engine.statistics(),
            RunStatistics {
                split_rounds: 1,
                splits: 0,
                terminal_zones: 1,
                merge_rounds: 1,
                merges: 0,
                segments: 1,
            }
        );
    }

    #[test]
    fn test_two_block_run_statistics() {
        let features = two_blocks(8, 8, 4, 0.0, 100.0);
        let mut engine = SegmentationEngine::new(SegmentationParameters::new(1.0, 1.0, 0));
        let mut recorder = Recorder::default();

        engine
            .run(&features, &mut recorder, &CancelToken::new())
            .expect("valid run");

        let stats = engine.statistics();
        assert_eq!((stats.split_rounds, stats.splits, stats.terminal_zones), (2, 1, 4));
        assert_eq!((stats.merge_rounds, stats.merges, stats.segments), (2, 2, 2));
        assert_eq!(recorder.rounds.len(), 4);
        assert_eq!(recorder.snapshots.last(), Some(engine.labels()));
        let graph = engine.graph().expect("finished graph");
        assert_eq!(graph.live_segment_count(), 2);
    }

    #[test]
    fn test_cancel_before_start() {
        let features = two_blocks(8, 8, 4, 0.0, 100.0);
        let mut engine = SegmentationEngine::new(SegmentationParameters::new(1.0, 1.0, 0));
        let mut recorder = Recorder::default();
        let token = CancelToken::new();
        token.cancel();

        let outcome = engine.run(&features, &mut recorder, &token).expect("valid run");

        assert_eq!(outcome, RunOutcome::Canceled);
        assert_eq!(engine.state(), EngineState::Canceled);
        assert!(recorder.rounds.is_empty());
        assert_eq!(recorder.finished, 0);
        assert_eq!(engine.statistics().split_rounds, 0);
    }

    // Cancellation is observed at the top of the next round, never mid-round
    #[test]
    fn test_cancel_between_rounds() {
        let features = two_blocks(8, 8, 4, 0.0, 100.0);
        let mut engine = SegmentationEngine::new(SegmentationParameters::new(1.0, 1.0, 0));
        let token = CancelToken::new();
        let mut observer = CancelAfterFirstRound {
            token: token.clone(),
            rounds: 0,
        };

        let outcome = engine.run(&features, &mut observer, &token).expect("valid run");

        assert_eq!(outcome, RunOutcome::Canceled);
        assert_eq!(observer.rounds, 1);
        assert_eq!(engine.statistics().split_rounds, 1);
        assert_eq!(engine.labels().distinct_labels(), BTreeSet::from([1, 2, 3, 4]));
        assert!(engine.graph().is_some_and(|graph| graph.covers_raster_exactly()));
    }

    // A second run starts from scratch
    #[test]
    fn test_rerun_resets_state() {
        let mut engine = SegmentationEngine::new(SegmentationParameters::new(1.0, 1.0, 0));
        let canceled = CancelToken::new();
        canceled.cancel();
        engine
            .run(&two_blocks(8, 8, 4, 0.0, 100.0), &mut NoopObserver, &canceled)
            .expect("valid run");

        let outcome = engine
            .run(&uniform(2, 3, 1.0), &mut NoopObserver, &CancelToken::new())
            .expect("valid run");
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!((engine.labels().width(), engine.labels().height()), (2, 3));
        assert_eq!(engine.statistics().segments, 1);
    }

    #[test]
    fn test_observer_combinators() {
        let features = uniform(2, 2, 0.0);
        let mut engine = SegmentationEngine::new(SegmentationParameters::default());
        let mut pair = (Some(Recorder::default()), Box::new(Recorder::default()));

        engine
            .run(&features, &mut pair, &CancelToken::new())
            .expect("valid run");
        let (first, second) = pair;
        let first = first.expect("observer kept");
        assert_eq!(first.rounds, second.rounds);
        assert_eq!((first.finished, second.finished), (1, 1));

        let mut absent: Option<Recorder> = None;
        engine
            .run(&features, &mut absent, &CancelToken::new())
            .expect("valid run");
        let labels: LabelRaster = engine.into_labels();
        assert_eq!(labels.distinct_labels(), BTreeSet::from([1]));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_canceled());
        clone.cancel();
        assert!(token.is_canceled());
    }
}
