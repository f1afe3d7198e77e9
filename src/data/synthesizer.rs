//! Revenue Synthesizer Module
//! Builds the monthly revenue table from a closed-form trend + seasonality + noise model.

use crate::config::{ChartConfig, ConfigError};
use crate::data::calendar::{month_starts, CalendarError};
use crate::data::SegmentSpec;
use chrono::{Datelike, NaiveDate};
use log::debug;
use polars::prelude::*;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;
use thiserror::Error;

/// Weight of the half-year harmonic relative to the annual cycle
const SECOND_HARMONIC_WEIGHT: f64 = 0.35;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid time axis: {0}")]
    Calendar(#[from] CalendarError),
    #[error("Invalid noise for segment {segment}: {reason}")]
    Noise {
        segment: &'static str,
        reason: String,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One (month, segment) cell of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub month: NaiveDate,
    pub segment: &'static str,
    pub revenue_kusd: f64,
}

/// Normalized seasonal signal for calendar month `month` (1..=12).
///
/// Annual cycle shifted by 30 degrees plus a half-year harmonic.
pub fn seasonal_base(month: u32) -> f64 {
    let phase = 2.0 * PI * (month as f64 - 1.0) / 12.0;
    (phase + PI / 6.0).sin() + SECOND_HARMONIC_WEIGHT * (2.0 * phase).sin()
}

/// Model revenue of `segment` at month index `t`, plus `noise`, clamped at zero.
pub fn model_value(segment: &SegmentSpec, t: usize, month: u32, noise: f64) -> f64 {
    let seasonal = seasonal_base(month) * (segment.season_amp / 2.0);
    let value = segment.base + segment.trend * t as f64 + seasonal + noise;
    value.max(0.0)
}

/// Normal perturbations drawn from one seeded generator.
///
/// Every call consumes exactly one uniform, so the draw order does not depend
/// on which segments have zero noise.
struct NoiseSource {
    rng: StdRng,
    distributions: Vec<Option<Normal>>,
}

impl NoiseSource {
    fn new(seed: u64, segments: &[SegmentSpec]) -> Result<Self, SynthError> {
        let distributions = segments
            .iter()
            .map(|seg| {
                if seg.noise == 0.0 {
                    return Ok(None);
                }
                Normal::new(0.0, seg.noise)
                    .map(Some)
                    .map_err(|e| SynthError::Noise {
                        segment: seg.name,
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            distributions,
        })
    }

    fn draw(&mut self, segment_idx: usize) -> f64 {
        let u: f64 = self.rng.sample(Open01);
        match &self.distributions[segment_idx] {
            Some(normal) => normal.inverse_cdf(u),
            None => 0.0,
        }
    }
}

/// Generates the synthetic segment revenue dataset.
pub struct RevenueSynthesizer;

impl RevenueSynthesizer {
    /// Month-start axis described by the configuration.
    pub fn time_axis(config: &ChartConfig) -> Result<Vec<NaiveDate>, SynthError> {
        Ok(month_starts(config.start_date()?, config.end_date()?)?)
    }

    /// All observations over `months` in insertion order: months outer, segments inner.
    pub fn observations(
        config: &ChartConfig,
        months: &[NaiveDate],
    ) -> Result<Vec<Observation>, SynthError> {
        let mut noise = NoiseSource::new(config.seed, &config.segments)?;

        let mut rows = Vec::with_capacity(months.len() * config.segments.len());
        for (t, date) in months.iter().enumerate() {
            let month = date.month();
            for (idx, segment) in config.segments.iter().enumerate() {
                let perturbation = noise.draw(idx);
                rows.push(Observation {
                    month: *date,
                    segment: segment.name,
                    revenue_kusd: model_value(segment, t, month, perturbation),
                });
            }
        }

        debug!(
            "Synthesized {} rows over {} months and {} segments",
            rows.len(),
            months.len(),
            config.segments.len()
        );
        Ok(rows)
    }

    /// Tidy table with columns ["month", "segment", "revenue_kusd"].
    pub fn to_frame(rows: &[Observation]) -> Result<DataFrame, SynthError> {
        let months: Vec<NaiveDate> = rows.iter().map(|r| r.month).collect();
        let segments: Vec<&str> = rows.iter().map(|r| r.segment).collect();
        let revenue: Vec<f64> = rows.iter().map(|r| r.revenue_kusd).collect();

        let df = DataFrame::new(vec![
            Column::new("month".into(), months),
            Column::new("segment".into(), segments),
            Column::new("revenue_kusd".into(), revenue),
        ])?;

        Ok(df)
    }

    /// Build the full dataset over `months` as a DataFrame.
    pub fn generate(config: &ChartConfig, months: &[NaiveDate]) -> Result<DataFrame, SynthError> {
        let rows = Self::observations(config, months)?;
        Self::to_frame(&rows)
    }
}
