//! Configuration Module
//! Fixed chart settings. Nothing here is read from the command line or environment.

use crate::data::{SegmentSpec, SEGMENTS};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub const OUTPUT_FILE: &str = "chart.png";
pub const RNG_SEED: u64 = 42;

/// Square figure edge, in inches
pub const FIGURE_INCHES: f64 = 8.0;
pub const EXPORT_DPI: u32 = 64;
/// Expected edge of the exported raster (8 in x 64 dpi)
pub const TARGET_PIXELS: u32 = 512;
/// Padding kept around content when trimming the canvas
pub const TRIM_PAD_INCHES: f64 = 0.1;

/// First and last month of the time axis, both inclusive
pub const START_MONTH: (i32, u32) = (2024, 1);
pub const END_MONTH: (i32, u32) = (2025, 12);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid month bound: {0}-{1:02}")]
    InvalidMonth(i32, u32),
    #[error("Canvas is {actual}px but target is {target}px")]
    CanvasMismatch { actual: u32, target: u32 },
}

/// All settings of a chart run, gathered from the constants above.
#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    pub output_path: PathBuf,
    pub seed: u64,
    pub start_month: (i32, u32),
    pub end_month: (i32, u32),
    pub figure_inches: f64,
    pub dpi: u32,
    pub target_pixels: u32,
    pub trim_pad_inches: f64,
    pub segments: Vec<SegmentSpec>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(OUTPUT_FILE),
            seed: RNG_SEED,
            start_month: START_MONTH,
            end_month: END_MONTH,
            figure_inches: FIGURE_INCHES,
            dpi: EXPORT_DPI,
            target_pixels: TARGET_PIXELS,
            trim_pad_inches: TRIM_PAD_INCHES,
            segments: SEGMENTS.to_vec(),
        }
    }
}

impl ChartConfig {
    /// Raster edge produced by the figure size at the export resolution.
    pub fn canvas_pixels(&self) -> u32 {
        (self.figure_inches * self.dpi as f64).round() as u32
    }

    pub fn trim_pad_pixels(&self) -> u32 {
        (self.trim_pad_inches * self.dpi as f64).round() as u32
    }

    pub fn start_date(&self) -> Result<NaiveDate, ConfigError> {
        Self::month_start(self.start_month)
    }

    pub fn end_date(&self) -> Result<NaiveDate, ConfigError> {
        Self::month_start(self.end_month)
    }

    /// Check that figure size and dpi agree with the target raster and the month bounds exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.start_date()?;
        self.end_date()?;

        let actual = self.canvas_pixels();
        if actual != self.target_pixels {
            return Err(ConfigError::CanvasMismatch {
                actual,
                target: self.target_pixels,
            });
        }
        Ok(())
    }

    fn month_start((year, month): (i32, u32)) -> Result<NaiveDate, ConfigError> {
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(ConfigError::InvalidMonth(year, month))
    }
}
