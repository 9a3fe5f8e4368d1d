//! Error types for segmentation runs and their collaborators

use std::fmt;
use std::path::PathBuf;

/// Main error type for all segmentation operations
#[derive(Debug)]
pub enum SegmentationError {
    /// A zone rectangle with a non-positive width or height was requested
    ///
    /// The splitter never produces such a zone in correct use, so this
    /// indicates a defect in split or adjacency bookkeeping and aborts the run.
    InvalidZone {
        /// Left edge (inclusive)
        x_from: usize,
        /// Right edge (exclusive)
        x_to: usize,
        /// Top edge (inclusive)
        y_from: usize,
        /// Bottom edge (exclusive)
        y_to: usize,
    },

    /// Feature matrix has a zero extent and cannot seed a root zone
    EmptyFeatures {
        /// Matrix width in pixels
        width: usize,
        /// Matrix height in pixels
        height: usize,
        /// Number of feature channels
        depth: usize,
    },

    /// A zone or segment index does not address a live arena entry
    UnknownIndex {
        /// Which arena was addressed
        arena: &'static str,
        /// The offending index
        index: usize,
    },

    /// A new run was requested before the previous one was joined
    RunInProgress,

    /// No background run has been started, so there is nothing to join
    NoActiveRun,

    /// The background run panicked before reporting a result
    WorkerPanicked,

    /// The operating system refused to start the background thread
    WorkerSpawn {
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load a source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidZone {
                x_from,
                x_to,
                y_from,
                y_to,
            } => {
                write!(
                    f,
                    "Zone [{x_from}, {x_to}) x [{y_from}, {y_to}) must cover at least one pixel"
                )
            }
            Self::EmptyFeatures {
                width,
                height,
                depth,
            } => {
                write!(
                    f,
                    "Feature matrix {width}x{height}x{depth} has no pixels or no channels"
                )
            }
            Self::UnknownIndex { arena, index } => {
                write!(f, "Index {index} does not address a {arena}")
            }
            Self::RunInProgress => {
                write!(f, "A segmentation run is still active; cancel and join it first")
            }
            Self::NoActiveRun => write!(f, "No segmentation run has been started"),
            Self::WorkerPanicked => write!(f, "The segmentation worker panicked"),
            Self::WorkerSpawn { source } => {
                write!(f, "Failed to start the segmentation worker: {source}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SegmentationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } | Self::WorkerSpawn { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for segmentation results
pub type Result<T> = std::result::Result<T, SegmentationError>;

impl From<image::ImageError> for SegmentationError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for SegmentationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SegmentationError {
    SegmentationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
