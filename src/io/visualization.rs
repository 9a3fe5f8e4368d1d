//! Round-by-round frame capture and GIF export

use crate::io::configuration::FINAL_FRAME_HOLD;
use crate::io::error::{Result, SegmentationError};
use crate::io::image::LabelPalette;
use crate::segmentation::engine::{Phase, ProgressObserver, RegionsChanged};
use crate::segmentation::raster::LabelRaster;
use image::{Delay, Frame, RgbaImage};
use std::path::Path;

/// One captured round
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Phase the round belonged to
    pub phase: Phase,
    /// Round number within the phase
    pub round: usize,
    /// Rendered label raster
    pub image: RgbaImage,
}

/// Observer that renders the label raster after every round
///
/// The frames can afterwards be written out as an animated GIF showing the
/// quadtree refining and the regions growing back together.
#[derive(Debug, Clone)]
pub struct VisualizationCapture {
    palette: LabelPalette,
    frames: Vec<CapturedFrame>,
    finished: bool,
}

impl VisualizationCapture {
    /// Create an empty capture rendering with `palette`
    pub const fn new(palette: LabelPalette) -> Self {
        Self {
            palette,
            frames: Vec::new(),
            finished: false,
        }
    }

    /// Frames captured so far, in round order
    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    /// Whether the run reported completion
    pub const fn finished(&self) -> bool {
        self.finished
    }

    /// Write the captured frames as an animated GIF
    ///
    /// The last frame is held for several frame delays.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        let Some(last) = self.frames.last() else {
            return Err(SegmentationError::InvalidParameter {
                parameter: "frames",
                value: "0".to_string(),
                reason: "no rounds were captured for visualization".to_string(),
            });
        };

        let delay = Delay::from_numer_denom_ms(frame_delay_ms, 1);
        let mut frames: Vec<Frame> = self
            .frames
            .iter()
            .map(|captured| Frame::from_parts(captured.image.clone(), 0, 0, delay))
            .collect();
        frames.push(Frame::from_parts(
            last.image.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(frame_delay_ms * FINAL_FRAME_HOLD, 1),
        ));

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SegmentationError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| SegmentationError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| SegmentationError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })
    }
}

impl ProgressObserver for VisualizationCapture {
    fn on_regions_changed(&mut self, event: &RegionsChanged<'_>) {
        self.frames.push(CapturedFrame {
            phase: event.phase,
            round: event.round,
            image: self.palette.render(event.labels),
        });
    }

    fn on_finished(&mut self, _labels: &LabelRaster) {
        self.finished = true;
    }
}
