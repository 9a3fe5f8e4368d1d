//! Split-and-merge region segmentation for multi-channel rasters
//!
//! A feature matrix is recursively split into quadtree zones until every zone
//! is homogeneous, then adjacent regions are merged while their pooled
//! spread stays under a threshold. Progress is reported round by round.

/// Per-pixel feature matrices, their statistics and extraction from images
pub mod features;
/// Input/output operations, configuration and error handling
pub mod io;
/// Zones, segments, the split and merge phases and the engine driving them
pub mod segmentation;

pub use io::error::{Result, SegmentationError};
