//! Month-start time axis.

use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Start month {start} is after end month {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("Month arithmetic overflowed after {0}")]
    Overflow(NaiveDate),
}

/// Every month start from `start` to `end`, both inclusive.
///
/// Days other than the first are ignored, so `2024-01-15..2024-03-02`
/// yields January, February and March.
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, CalendarError> {
    let first = start.with_day(1).unwrap_or(start);
    let last = end.with_day(1).unwrap_or(end);
    if first > last {
        return Err(CalendarError::InvertedRange { start, end });
    }

    let mut months = Vec::new();
    let mut current = first;
    while current <= last {
        months.push(current);
        current = current
            .checked_add_months(Months::new(1))
            .ok_or(CalendarError::Overflow(current))?;
    }
    Ok(months)
}

/// Zero-based number of months from `origin` to `date`, `None` when `date` is earlier.
pub fn months_between(origin: NaiveDate, date: NaiveDate) -> Option<usize> {
    let diff = (date.year() - origin.year()) * 12 + date.month() as i32 - origin.month() as i32;
    usize::try_from(diff).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_year_axis_is_dense_and_increasing() {
        let months = month_starts(ymd(2024, 1, 1), ymd(2025, 12, 1)).unwrap();

        assert_eq!(months.len(), 24);
        assert_eq!(months.first(), Some(&ymd(2024, 1, 1)));
        assert_eq!(months.last(), Some(&ymd(2025, 12, 1)));
        for pair in months.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(months_between(pair[0], pair[1]), Some(1));
            assert_eq!(pair[1].day(), 1);
        }
    }

    #[test]
    fn single_month_range() {
        let months = month_starts(ymd(2024, 6, 1), ymd(2024, 6, 1)).unwrap();
        assert_eq!(months, vec![ymd(2024, 6, 1)]);
    }

    #[test]
    fn mid_month_bounds_snap_to_month_start() {
        let months = month_starts(ymd(2024, 1, 15), ymd(2024, 3, 2)).unwrap();
        assert_eq!(months, vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)]);
    }

    #[test]
    fn inverted_range_is_an_error() {
        let result = month_starts(ymd(2025, 1, 1), ymd(2024, 1, 1));
        assert!(matches!(result, Err(CalendarError::InvertedRange { .. })));
    }

    #[test]
    fn months_between_rejects_earlier_dates() {
        assert_eq!(months_between(ymd(2024, 1, 1), ymd(2025, 12, 1)), Some(23));
        assert_eq!(months_between(ymd(2024, 1, 1), ymd(2023, 12, 1)), None);
    }
}
