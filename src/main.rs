//! CLI entry point for split-and-merge image segmentation

use clap::Parser;
use splitmerge::io::cli::{Cli, FileProcessor};

fn main() -> splitmerge::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
