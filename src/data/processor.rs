//! Data Processor Module
//! Regroups the long-format revenue table into one sorted series per segment.

use crate::data::calendar::months_between;
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Date out of range: {0} days since epoch")]
    DateOutOfRange(i32),
    #[error("Month {month} is before the axis start {start}")]
    BeforeAxisStart { month: NaiveDate, start: NaiveDate },
}

/// One line of the chart: a segment name and its (month index, revenue) points.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSeries {
    pub name: String,
    pub points: Vec<(usize, f64)>,
}

impl SegmentSeries {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, v)| v)
    }
}

/// Handles grouping and ordering of the revenue table.
pub struct DataProcessor;

impl DataProcessor {
    /// Segment names in order of first appearance.
    pub fn segment_order(df: &DataFrame) -> Result<Vec<String>, ProcessorError> {
        let segments = df.column("segment")?.str()?;

        let mut order: Vec<String> = Vec::new();
        for name in segments.into_iter().flatten() {
            if !order.iter().any(|known| known == name) {
                order.push(name.to_string());
            }
        }
        Ok(order)
    }

    /// Filter DataFrame for a single segment, sorted by month ascending.
    pub fn filter_by_segment(df: &DataFrame, segment: &str) -> Result<DataFrame, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col("segment").eq(lit(segment)))
            .sort(["month"], SortMultipleOptions::default())
            .collect()?;
        Ok(filtered)
    }

    /// Month column as calendar dates.
    pub fn months(df: &DataFrame) -> Result<Vec<NaiveDate>, ProcessorError> {
        let epoch = NaiveDate::default();
        let days = df.column("month")?.cast(&DataType::Int32)?;

        days.i32()?
            .into_iter()
            .flatten()
            .map(|d| {
                epoch
                    .checked_add_signed(Duration::days(i64::from(d)))
                    .ok_or(ProcessorError::DateOutOfRange(d))
            })
            .collect()
    }

    /// Split the table into one series per segment, keeping first-appearance order.
    ///
    /// X values are month offsets from `axis_start`.
    pub fn series_by_segment(
        df: &DataFrame,
        axis_start: NaiveDate,
    ) -> Result<Vec<SegmentSeries>, ProcessorError> {
        let mut series = Vec::new();

        for name in Self::segment_order(df)? {
            let segment_df = Self::filter_by_segment(df, &name)?;
            let months = Self::months(&segment_df)?;
            let revenue = segment_df.column("revenue_kusd")?.f64()?;

            let mut points = Vec::with_capacity(months.len());
            for (month, value) in months.into_iter().zip(revenue.into_iter()) {
                let Some(value) = value else {
                    continue;
                };
                let idx = months_between(axis_start, month).ok_or(
                    ProcessorError::BeforeAxisStart {
                        month,
                        start: axis_start,
                    },
                )?;
                points.push((idx, value));
            }

            series.push(SegmentSeries { name, points });
        }

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::{Observation, RevenueSynthesizer};

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn shuffled_frame() -> DataFrame {
        let rows = vec![
            Observation { month: ymd(2024, 3), segment: "SMB", revenue_kusd: 3.0 },
            Observation { month: ymd(2024, 1), segment: "SMB", revenue_kusd: 1.0 },
            Observation { month: ymd(2024, 2), segment: "Enterprise", revenue_kusd: 20.0 },
            Observation { month: ymd(2024, 2), segment: "SMB", revenue_kusd: 2.0 },
            Observation { month: ymd(2024, 1), segment: "Enterprise", revenue_kusd: 10.0 },
        ];
        RevenueSynthesizer::to_frame(&rows).unwrap()
    }

    #[test]
    fn segment_order_is_first_appearance() {
        let df = shuffled_frame();
        assert_eq!(DataProcessor::segment_order(&df).unwrap(), vec!["SMB", "Enterprise"]);
    }

    #[test]
    fn series_are_sorted_by_month() {
        let df = shuffled_frame();
        let series = DataProcessor::series_by_segment(&df, ymd(2024, 1)).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "SMB");
        assert_eq!(series[0].points, vec![(0, 1.0), (1, 2.0), (2, 3.0)]);
        assert_eq!(series[1].name, "Enterprise");
        assert_eq!(series[1].points, vec![(0, 10.0), (1, 20.0)]);
    }

    #[test]
    fn month_column_round_trips_dates() {
        let df = shuffled_frame();
        let months = DataProcessor::months(&df).unwrap();
        assert_eq!(months[0], ymd(2024, 3));
        assert_eq!(months[4], ymd(2024, 1));
    }

    #[test]
    fn months_before_axis_start_are_rejected() {
        let df = shuffled_frame();
        let result = DataProcessor::series_by_segment(&df, ymd(2024, 2));
        assert!(matches!(result, Err(ProcessorError::BeforeAxisStart { .. })));
    }

    #[test]
    fn generated_table_splits_into_three_full_series() {
        let config = ChartConfig::default();
        let months = RevenueSynthesizer::time_axis(&config).unwrap();
        let df = RevenueSynthesizer::generate(&config, &months).unwrap();
        let start = config.start_date().unwrap();
        let series = DataProcessor::series_by_segment(&df, start).unwrap();

        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Enterprise", "SMB", "Consumer"]);
        for s in &series {
            let xs: Vec<usize> = s.points.iter().map(|&(x, _)| x).collect();
            assert_eq!(xs, (0..24).collect::<Vec<_>>());
        }
    }
}
