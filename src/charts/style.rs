//! Chart styling: palette, typography and point-to-pixel conversion.

use plotters::style::RGBColor;

/// Qualitative "Set2" palette
pub const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165), // Green
    RGBColor(252, 141, 98),  // Orange
    RGBColor(141, 160, 203), // Blue
    RGBColor(231, 138, 195), // Pink
    RGBColor(166, 216, 84),  // Lime
    RGBColor(255, 217, 47),  // Yellow
    RGBColor(229, 196, 148), // Tan
    RGBColor(179, 179, 179), // Grey
];

pub const TEXT_COLOR: RGBColor = RGBColor(38, 38, 38);
pub const GRID_COLOR: RGBColor = RGBColor(204, 204, 204);
/// Left/bottom axis lines and the legend frame
pub const EDGE_COLOR: RGBColor = RGBColor(204, 204, 204);

pub const FONT_FAMILY: &str = "sans-serif";

// "talk" context scales every font by 1.5, on top of the requested 1.1 font scale
const CONTEXT_SCALE: f64 = 1.5;
const FONT_SCALE: f64 = 1.1;
const BASE_LABEL_PT: f64 = 12.0;
const BASE_TICK_PT: f64 = 11.0;

const POINTS_PER_INCH: f64 = 72.0;

pub fn points_to_pixels(points: f64, dpi: u32) -> f64 {
    points * dpi as f64 / POINTS_PER_INCH
}

/// Color for the series at `index`, cycling through the palette.
pub fn series_color(index: usize) -> RGBColor {
    SET2[index % SET2.len()]
}

/// Font sizes in pixels for one export resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub title_px: f64,
    pub axis_label_px: f64,
    pub tick_px: f64,
    pub legend_title_px: f64,
    pub legend_px: f64,
}

impl Typography {
    pub fn at_dpi(dpi: u32) -> Self {
        let label = points_to_pixels(BASE_LABEL_PT * CONTEXT_SCALE * FONT_SCALE, dpi);
        let tick = points_to_pixels(BASE_TICK_PT * CONTEXT_SCALE * FONT_SCALE, dpi);
        Self {
            title_px: label,
            axis_label_px: label,
            tick_px: tick,
            legend_title_px: label,
            legend_px: tick,
        }
    }
}
