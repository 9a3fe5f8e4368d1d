/// Command-line interface and batch processing
pub mod cli;
/// Default constants
pub mod configuration;
/// Error types
pub mod error;
/// Label rendering and PNG export
pub mod image;
/// Terminal progress display
pub mod progress;
/// Round capture and GIF export
pub mod visualization;
