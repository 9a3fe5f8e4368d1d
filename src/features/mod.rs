/// Feature extraction from source images
pub mod extraction;
/// Dense per-pixel feature storage
pub mod matrix;
/// Per-channel spread over pooled rectangles
pub mod statistics;
