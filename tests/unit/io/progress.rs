//! Tests for per-file progress display driven by round events

#[cfg(test)]
mod tests {
    use crate::two_blocks;
    use splitmerge::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
    use splitmerge::io::progress::ProgressManager;
    use splitmerge::segmentation::engine::{CancelToken, RunOutcome, SegmentationEngine};
    use splitmerge::segmentation::parameters::SegmentationParameters;
    use std::path::Path;

    #[test]
    fn test_progress_manager_lifecycle() {
        let mut pm = ProgressManager::default();
        pm.initialize(1);

        let progress = pm.start_file(Path::new("single.png"));
        assert_eq!(progress.message(), "starting");

        pm.complete_file(&progress, RunOutcome::Completed, 3);
        assert!(progress.message().contains("3 segments"));
        pm.finish();
    }

    // Round events show phase, round and live segment count
    #[test]
    fn test_file_progress_follows_rounds() {
        let mut pm = ProgressManager::new();
        pm.initialize(1);
        let mut progress = pm.start_file(Path::new("blocks.png"));

        let mut engine = SegmentationEngine::new(SegmentationParameters::new(1.0, 1.0, 0));
        engine
            .run(
                &two_blocks(8, 8, 4, 0.0, 100.0),
                &mut progress,
                &CancelToken::new(),
            )
            .expect("valid run");
        assert_eq!(progress.message(), "finishing");

        pm.complete_file(&progress, RunOutcome::Canceled, 0);
        assert_eq!(progress.message(), "canceled");
        pm.finish();
    }

    #[test]
    fn test_many_files_use_batch_bar() {
        let mut pm = ProgressManager::new();
        let file_count = MAX_INDIVIDUAL_PROGRESS_BARS + 3;
        pm.initialize(file_count);

        for i in 0..file_count {
            let progress = pm.start_file(Path::new(&format!("file{i}.png")));
            pm.complete_file(&progress, RunOutcome::Completed, i);
        }
        pm.finish();
    }
}
