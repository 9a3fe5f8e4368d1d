/// Run orchestration, progress observation and cancellation
pub mod engine;
/// Zone and segment arenas with their adjacency
pub mod graph;
/// Region growing over adjacent segments
pub mod merger;
/// Split and merge thresholds
pub mod parameters;
/// Per-pixel segment labels
pub mod raster;
/// Segments as unions of zones
pub mod segment;
/// Quadtree refinement of zones
pub mod splitter;
/// Background execution of runs
pub mod worker;
/// Rectangles, sides and zones
pub mod zone;
