//! Segment Revenue Chart - Synthetic revenue dataset & static chart export
//!
//! Generates monthly revenue by customer segment, draws it as a line chart
//! and writes `chart.png` at exactly 512x512 pixels.

mod charts;
mod config;
mod data;
mod export;
mod logger;

use anyhow::Context;
use charts::StaticChartRenderer;
use config::ChartConfig;
use data::{DataProcessor, RevenueSynthesizer};
use export::{ExportOutcome, ImageExporter};
use log::{debug, info};

fn main() -> anyhow::Result<()> {
    let _logger = logger::init_logger().context("Failed to start logger")?;

    let config = ChartConfig::default();
    config.validate().context("Invalid chart configuration")?;
    debug!("Configuration: {}", serde_json::to_string(&config)?);

    // 1. Data
    let months = RevenueSynthesizer::time_axis(&config).context("Failed to build time axis")?;
    let df = RevenueSynthesizer::generate(&config, &months)
        .context("Failed to synthesize dataset")?;
    info!(
        "Generated {} observations ({} months x {} segments)",
        df.height(),
        months.len(),
        config.segments.len()
    );

    // 2. Chart
    let series = DataProcessor::series_by_segment(&df, config.start_date()?)
        .context("Failed to group dataset by segment")?;
    let canvas = StaticChartRenderer::render(&series, &months, &config)
        .context("Failed to render chart")?;

    // 3. Export
    let exporter = ImageExporter::new(config.target_pixels, config.trim_pad_pixels());
    let outcome = exporter
        .export(&canvas, &config.output_path)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    match outcome {
        ExportOutcome::Exact | ExportOutcome::Resized { .. } => info!(
            "Chart written to {} ({}x{})",
            config.output_path.display(),
            config.target_pixels,
            config.target_pixels
        ),
        ExportOutcome::Unverified => info!(
            "Chart written to {} (size not verified)",
            config.output_path.display()
        ),
    }

    Ok(())
}
