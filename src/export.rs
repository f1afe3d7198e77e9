//! PNG Export Module
//! Writes the rendered canvas trimmed to its content, then forces the saved
//! file to the target pixel size.

use image::imageops::{self, FilterType};
use image::{ImageError, ImageFormat, Rgb, RgbImage};
use log::{debug, warn};
use std::path::Path;
use thiserror::Error;

/// Canvas color treated as empty when trimming
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
    #[cfg_attr(feature = "postprocess", allow(dead_code))]
    #[error("Post-processing is not available in this build")]
    PostProcessUnavailable,
}

/// What happened to the file after it was first written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Already at the target size
    Exact,
    /// Resampled from the trimmed size
    Resized { from: (u32, u32) },
    /// Verification skipped; the file keeps its trimmed size
    Unverified,
}

/// Crop `canvas` to the bounding box of non-background pixels, expanded by
/// `pad` on every side and clamped to the canvas. A blank canvas is returned whole.
pub fn trim_to_content(canvas: &RgbImage, background: Rgb<u8>, pad: u32) -> RgbImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in canvas.enumerate_pixels() {
        if *pixel == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return canvas.clone();
    };

    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = (x1 + pad).min(canvas.width() - 1);
    let bottom = (y1 + pad).min(canvas.height() - 1);

    imageops::crop_imm(canvas, left, top, right - left + 1, bottom - top + 1).to_image()
}

/// Writes chart canvases as square PNG files.
pub struct ImageExporter {
    target: u32,
    trim_pad: u32,
}

impl ImageExporter {
    pub fn new(target: u32, trim_pad: u32) -> Self {
        Self { target, trim_pad }
    }

    /// Save `canvas` trimmed to content, then check and correct its size.
    ///
    /// Write failures are returned. A failed size check is not: the file is
    /// left as first written and the outcome is `Unverified`.
    pub fn export(&self, canvas: &RgbImage, path: &Path) -> Result<ExportOutcome, ExportError> {
        let trimmed = trim_to_content(canvas, BACKGROUND, self.trim_pad);
        trimmed.save_with_format(path, ImageFormat::Png)?;
        debug!(
            "Wrote {} trimmed to {}x{}",
            path.display(),
            trimmed.width(),
            trimmed.height()
        );

        match self.enforce_dimensions(path) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                debug!("Size verification skipped: {}", e);
                Ok(ExportOutcome::Unverified)
            }
        }
    }

    /// Re-open the saved file and resample it to `target` x `target` if needed.
    #[cfg(feature = "postprocess")]
    pub fn enforce_dimensions(&self, path: &Path) -> Result<ExportOutcome, ExportError> {
        let img = image::open(path)?;
        let size = (img.width(), img.height());
        if size == (self.target, self.target) {
            return Ok(ExportOutcome::Exact);
        }

        warn!(
            "{} is {}x{}, resampling to {}x{}",
            path.display(),
            size.0,
            size.1,
            self.target,
            self.target
        );
        let resized = img.resize_exact(self.target, self.target, FilterType::Lanczos3);
        resized.save_with_format(path, ImageFormat::Png)?;

        Ok(ExportOutcome::Resized { from: size })
    }

    #[cfg(not(feature = "postprocess"))]
    pub fn enforce_dimensions(&self, _path: &Path) -> Result<ExportOutcome, ExportError> {
        Err(ExportError::PostProcessUnavailable)
    }
}
