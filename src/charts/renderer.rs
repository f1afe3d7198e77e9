//! Static Chart Renderer
//! Draws the segment revenue line chart into an in-memory RGB canvas.
//!
//! Layout:
//! 1. Title centered on top, padded from the plot area
//! 2. Plot area with light horizontal/vertical grid, left and bottom axis lines only
//! 3. One line + circle markers per segment
//! 4. Framed legend in the upper-left corner, headed by "Segment"

use crate::charts::format::{format_month, format_usd_thousands};
use crate::charts::style::{
    points_to_pixels, series_color, Typography, EDGE_COLOR, FONT_FAMILY, GRID_COLOR, TEXT_COLOR,
};
use crate::config::ChartConfig;
use crate::data::SegmentSeries;
use chrono::NaiveDate;
use image::RgbImage;
use log::debug;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

pub const TITLE: &str = "Monthly Revenue Trend by Customer Segment";
pub const X_LABEL: &str = "Month";
pub const Y_LABEL: &str = "Revenue (USD, thousands)";
pub const LEGEND_TITLE: &str = "Segment";

const TITLE_PAD_PT: f64 = 14.0;
const LINE_WIDTH_PT: f64 = 2.2;
const MARKER_SIZE_PT: f64 = 9.0;

/// Fraction of the data span added on each side of both axes
const AXIS_MARGIN: f64 = 0.05;
const OUTER_MARGIN_PX: u32 = 8;
const LABEL_GAP_PX: u32 = 6;
const Y_TICKS: usize = 8;
/// Approximate months between two x tick labels
const X_TICK_EVERY: usize = 6;
const LEGEND_MARKER_PX: i32 = 22;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("No data to plot")]
    EmptyData,
    #[error("Canvas buffer does not match {0}x{0}")]
    Canvas(u32),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

/// Pixel sizes derived from the export resolution.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    fonts: Typography,
    title_pad_px: u32,
    line_width_px: u32,
    marker_radius_px: u32,
}

impl Metrics {
    fn at_dpi(dpi: u32) -> Self {
        Self {
            fonts: Typography::at_dpi(dpi),
            title_pad_px: points_to_pixels(TITLE_PAD_PT, dpi).round() as u32,
            line_width_px: points_to_pixels(LINE_WIDTH_PT, dpi).round().max(1.0) as u32,
            marker_radius_px: (points_to_pixels(MARKER_SIZE_PT, dpi) / 2.0).round().max(1.0) as u32,
        }
    }
}

/// Legend box geometry in pixels, relative to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LegendLayout {
    gap: i32,
    width: i32,
    height: i32,
    rows_top: i32,
    row_height: i32,
}

impl LegendLayout {
    /// Size the box from the measured heading and widest/tallest entry label.
    fn measure(title: (u32, u32), label: (u32, u32), rows: usize, metrics: &Metrics) -> Self {
        let gap = LABEL_GAP_PX as i32;
        let marker_h = 2 * metrics.marker_radius_px as i32;
        let row_height = (label.1 as i32).max(marker_h) + gap / 2;

        let body_width = LEGEND_MARKER_PX + gap + label.0 as i32;
        let width = 2 * gap + body_width.max(title.0 as i32);
        let rows_top = gap + title.1 as i32 + gap / 2;
        let height = rows_top + row_height * rows as i32 + gap;

        Self {
            gap,
            width,
            height,
            rows_top,
            row_height,
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart to a square canvas of `config.canvas_pixels()` per side.
    pub fn render(
        series: &[SegmentSeries],
        months: &[NaiveDate],
        config: &ChartConfig,
    ) -> Result<RgbImage, RenderError> {
        if months.is_empty() || series.iter().all(|s| s.points.is_empty()) {
            return Err(RenderError::EmptyData);
        }

        let edge = config.canvas_pixels();
        let metrics = Metrics::at_dpi(config.dpi);
        let mut buffer = vec![0u8; (edge as usize) * (edge as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (edge, edge)).into_drawing_area();
            Self::draw_chart(&root, series, months, &metrics)?;
            root.present()?;
        }

        debug!("Rendered {} series on a {}x{} canvas", series.len(), edge, edge);
        RgbImage::from_raw(edge, edge, buffer).ok_or(RenderError::Canvas(edge))
    }

    fn draw_chart(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        series: &[SegmentSeries],
        months: &[NaiveDate],
        metrics: &Metrics,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE)?;

        let fonts = metrics.fonts;
        let title_font = (FONT_FAMILY, fonts.title_px).into_font().color(&TEXT_COLOR);
        let desc_font = (FONT_FAMILY, fonts.axis_label_px).into_font().color(&TEXT_COLOR);
        let tick_font = (FONT_FAMILY, fonts.tick_px).into_font().color(&TEXT_COLOR);
        let legend_title_font = (FONT_FAMILY, fonts.legend_title_px)
            .into_font()
            .color(&TEXT_COLOR);
        let legend_font = (FONT_FAMILY, fonts.legend_px).into_font().color(&TEXT_COLOR);

        let (y_min, y_max) = Self::get_y_range(series);
        let (x_min, x_max) = Self::get_x_range(months.len());

        // Size the label areas from measured text so nothing gets clipped
        let widest_tick = [y_min, y_max]
            .iter()
            .map(|&y| root.estimate_text_size(&format_usd_thousands(y), &tick_font))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(w, _)| w)
            .max()
            .unwrap_or(0);
        let (_, tick_h) = root.estimate_text_size(&format_month(months[0]), &tick_font)?;
        let (_, desc_h) = root.estimate_text_size(X_LABEL, &desc_font)?;

        let y_area = widest_tick + desc_h + 3 * LABEL_GAP_PX;
        let x_area = tick_h + desc_h + 3 * LABEL_GAP_PX;

        let mut chart = ChartBuilder::on(root)
            .caption(TITLE, title_font)
            .margin(OUTER_MARGIN_PX)
            .margin_top(metrics.title_pad_px)
            .margin_right(OUTER_MARGIN_PX * 2)
            .x_label_area_size(x_area)
            .y_label_area_size(y_area)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let x_formatter = |x: &f64| Self::month_label(months, *x);
        let y_formatter = |y: &f64| format_usd_thousands(*y);

        chart
            .configure_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .axis_desc_style(desc_font.clone())
            .label_style(tick_font.clone())
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_labels(months.len() / X_TICK_EVERY + 1)
            .y_labels(Y_TICKS)
            .bold_line_style(GRID_COLOR.stroke_width(1))
            .light_line_style(TRANSPARENT)
            .axis_style(EDGE_COLOR.stroke_width(1))
            .draw()?;

        let line_width = metrics.line_width_px;
        let radius = metrics.marker_radius_px;

        for (idx, segment) in series.iter().enumerate() {
            let color = series_color(idx);
            let points: Vec<(f64, f64)> =
                segment.points.iter().map(|&(x, y)| (x as f64, y)).collect();

            chart.draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(line_width),
            ))?;

            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), radius, color.filled())),
            )?;
        }

        let (plot_x, plot_y) = chart.plotting_area().get_pixel_range();
        let gap = LABEL_GAP_PX as i32;
        Self::draw_legend(
            root,
            (plot_x.start + gap, plot_y.start + gap),
            series,
            &legend_title_font,
            &legend_font,
            metrics,
        )?;

        Ok(())
    }

    /// Framed legend with its top-left corner at `anchor`: a centered
    /// "Segment" heading, then one line + marker + name row per series.
    fn draw_legend(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        anchor: (i32, i32),
        series: &[SegmentSeries],
        title_font: &TextStyle,
        label_font: &TextStyle,
        metrics: &Metrics,
    ) -> Result<(), RenderError> {
        let title_size = root.estimate_text_size(LEGEND_TITLE, title_font)?;
        let mut label_size = (0, 0);
        for segment in series {
            let (w, h) = root.estimate_text_size(&segment.name, label_font)?;
            label_size = (label_size.0.max(w), label_size.1.max(h));
        }
        let layout = LegendLayout::measure(title_size, label_size, series.len(), metrics);

        let (x0, y0) = anchor;
        let corner = (x0 + layout.width, y0 + layout.height);
        root.draw(&Rectangle::new([(x0, y0), corner], WHITE.mix(0.8).filled()))?;
        root.draw(&Rectangle::new([(x0, y0), corner], EDGE_COLOR.stroke_width(1)))?;

        let title_x = x0 + (layout.width - title_size.0 as i32) / 2;
        root.draw(&Text::new(LEGEND_TITLE, (title_x, y0 + layout.gap), title_font.clone()))?;

        let marker_x = x0 + layout.gap;
        let label_x = marker_x + LEGEND_MARKER_PX + layout.gap;
        let mut row_top = y0 + layout.rows_top;
        for (idx, segment) in series.iter().enumerate() {
            let color = series_color(idx);
            let mid = row_top + layout.row_height / 2;

            root.draw(&PathElement::new(
                vec![(marker_x, mid), (marker_x + LEGEND_MARKER_PX, mid)],
                color.stroke_width(metrics.line_width_px),
            ))?;
            root.draw(&Circle::new(
                (marker_x + LEGEND_MARKER_PX / 2, mid),
                metrics.marker_radius_px,
                color.filled(),
            ))?;
            root.draw(&Text::new(
                segment.name.as_str(),
                (label_x, mid - label_size.1 as i32 / 2),
                label_font.clone(),
            ))?;

            row_top += layout.row_height;
        }

        Ok(())
    }

    /// Y range over all series with a 5% margin on each side.
    fn get_y_range(series: &[SegmentSeries]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in series.iter().flat_map(|s| s.values()) {
            if !value.is_nan() {
                min = min.min(value);
                max = max.max(value);
            }
        }
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        let span = max - min;
        let pad = if span > 0.0 { span * AXIS_MARGIN } else { 1.0 };
        (min - pad, max + pad)
    }

    /// X range over month indices `0..len` with the same relative margin.
    fn get_x_range(len: usize) -> (f64, f64) {
        let last = len.saturating_sub(1) as f64;
        let pad = if last > 0.0 { last * AXIS_MARGIN } else { 0.5 };
        (-pad, last + pad)
    }

    /// Tick label for a month index; blank between months and outside the axis.
    fn month_label(months: &[NaiveDate], x: f64) -> String {
        let nearest = x.round();
        if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
            return String::new();
        }
        months
            .get(nearest as usize)
            .map(|&m| format_month(m))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataProcessor, RevenueSynthesizer};

    fn series(name: &str, values: &[f64]) -> SegmentSeries {
        SegmentSeries {
            name: name.to_string(),
            points: values.iter().copied().enumerate().collect(),
        }
    }

    #[test]
    fn y_range_adds_five_percent_margin() {
        let data = vec![series("A", &[100.0, 300.0]), series("B", &[200.0])];
        let (lo, hi) = StaticChartRenderer::get_y_range(&data);
        assert!((lo - 90.0).abs() < 1e-9);
        assert!((hi - 310.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_still_has_a_range() {
        let data = vec![series("A", &[5.0, 5.0])];
        let (lo, hi) = StaticChartRenderer::get_y_range(&data);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn x_range_covers_all_months() {
        let (lo, hi) = StaticChartRenderer::get_x_range(24);
        assert!((lo + 1.15).abs() < 1e-9);
        assert!((hi - 24.15).abs() < 1e-9);
    }

    #[test]
    fn month_labels_only_on_whole_indices() {
        let months = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ];
        assert_eq!(StaticChartRenderer::month_label(&months, 1.0), "2024-02");
        assert_eq!(StaticChartRenderer::month_label(&months, 0.5), "");
        assert_eq!(StaticChartRenderer::month_label(&months, -1.0), "");
        assert_eq!(StaticChartRenderer::month_label(&months, 5.0), "");
    }

    #[test]
    fn metrics_at_export_dpi() {
        let m = Metrics::at_dpi(64);
        assert_eq!(m.line_width_px, 2);
        assert_eq!(m.marker_radius_px, 4);
        assert_eq!(m.title_pad_px, 12);
    }

    #[test]
    fn empty_input_is_rejected() {
        let config = ChartConfig::default();
        let result = StaticChartRenderer::render(&[], &[], &config);
        assert!(matches!(result, Err(RenderError::EmptyData)));
    }

    #[test]
    fn legend_fits_heading_and_rows() {
        let metrics = Metrics::at_dpi(64);
        let layout = LegendLayout::measure((80, 18), (100, 16), 3, &metrics);

        assert_eq!(layout.row_height, 19);
        assert_eq!(layout.rows_top, 6 + 18 + 3);
        assert_eq!(layout.height, 27 + 3 * 19 + 6);
        assert_eq!(layout.width, 12 + 22 + 6 + 100);
    }

    #[test]
    fn wide_heading_sets_legend_width() {
        let metrics = Metrics::at_dpi(64);
        let layout = LegendLayout::measure((200, 18), (40, 16), 3, &metrics);
        assert_eq!(layout.width, 12 + 200);
    }

    #[test]
    fn legend_heading_is_larger_than_entries() {
        let fonts = Metrics::at_dpi(64).fonts;
        assert!((fonts.legend_title_px - 17.6).abs() < 1e-9);
        assert!(fonts.legend_title_px > fonts.legend_px);
    }

    fn sans_serif_available() -> bool {
        FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Normal)
            .box_size("M")
            .is_ok()
    }

    #[test]
    fn renders_full_canvas() {
        if !sans_serif_available() {
            eprintln!("skipping renders_full_canvas: no sans-serif font installed");
            return;
        }

        let config = ChartConfig::default();
        let months = RevenueSynthesizer::time_axis(&config).unwrap();
        let df = RevenueSynthesizer::generate(&config, &months).unwrap();
        let data = DataProcessor::series_by_segment(&df, months[0]).unwrap();

        let canvas = StaticChartRenderer::render(&data, &months, &config).unwrap();
        assert_eq!(canvas.dimensions(), (512, 512));
        assert!(canvas.pixels().any(|p| p.0 != [255, 255, 255]));
    }
}
