//! Rendering of label rasters to RGBA images and PNG export

use crate::io::error::{Result, SegmentationError};
use crate::segmentation::raster::LabelRaster;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashMap;
use std::path::Path;

/// How segment labels are turned into colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PaletteMode {
    /// A reproducible random colour per label
    #[default]
    Random,
    /// Each segment's mean colour in the source image
    Mean,
}

/// Seeded label → colour mapping
///
/// The colour of a label depends only on the seed and the label, so frames
/// rendered at different rounds agree on shared labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPalette {
    seed: u64,
}

impl LabelPalette {
    /// Create a palette from a seed
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Opaque colour of a label; label 0 (unlabelled) is black
    pub fn color(&self, label: u32) -> [u8; 4] {
        if label == 0 {
            return [0, 0, 0, 255];
        }
        let mut rng = StdRng::seed_from_u64(self.seed ^ u64::from(label).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        [rng.random(), rng.random(), rng.random(), 255]
    }

    /// Paint every pixel with its label's colour
    pub fn render(&self, labels: &LabelRaster) -> RgbaImage {
        let mut cache: HashMap<u32, [u8; 4]> = HashMap::new();
        RgbaImage::from_fn(labels.width() as u32, labels.height() as u32, |x, y| {
            let label = labels.get(x as usize, y as usize).unwrap_or(0);
            Rgba(*cache.entry(label).or_insert_with(|| self.color(label)))
        })
    }
}

/// Paint every pixel with the mean source colour of its segment
///
/// # Errors
///
/// Returns an error if `source` and `labels` differ in size
pub fn render_mean_colors(labels: &LabelRaster, source: &RgbaImage) -> Result<RgbaImage> {
    if source.width() as usize != labels.width() || source.height() as usize != labels.height() {
        return Err(SegmentationError::InvalidParameter {
            parameter: "source",
            value: format!("{}x{}", source.width(), source.height()),
            reason: format!(
                "must match the {}x{} label raster",
                labels.width(),
                labels.height()
            ),
        });
    }

    let mut sums: HashMap<u32, ([u64; 4], u64)> = HashMap::new();
    for (x, y, pixel) in source.enumerate_pixels() {
        let label = labels.get(x as usize, y as usize).unwrap_or(0);
        let (channels, count) = sums.entry(label).or_insert(([0; 4], 0));
        for (sum, &value) in channels.iter_mut().zip(pixel.0.iter()) {
            *sum += u64::from(value);
        }
        *count += 1;
    }

    let means: HashMap<u32, [u8; 4]> = sums
        .into_iter()
        .map(|(label, (channels, count))| (label, channels.map(|sum| (sum / count) as u8)))
        .collect();

    Ok(RgbaImage::from_fn(source.width(), source.height(), |x, y| {
        let label = labels.get(x as usize, y as usize).unwrap_or(0);
        Rgba(means.get(&label).copied().unwrap_or([0, 0, 0, 255]))
    }))
}

/// Save an image as PNG, creating parent directories
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the image cannot be written
pub fn export_png(image: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SegmentationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save(output_path)
        .map_err(|e| SegmentationError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
