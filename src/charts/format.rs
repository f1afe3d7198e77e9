//! Axis tick label formatting.

use chrono::NaiveDate;

/// Y tick label in thousands of USD: `$<integer>k`, truncated toward zero
/// and grouped with commas (650.7 -> "$650k", 1234.9 -> "$1,234k").
pub fn format_usd_thousands(value: f64) -> String {
    format!("${}k", group_thousands(value.trunc() as i64))
}

/// X tick label for a month start.
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    if value < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(format_usd_thousands(650.7), "$650k");
        assert_eq!(format_usd_thousands(650.0), "$650k");
        assert_eq!(format_usd_thousands(0.99), "$0k");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_usd_thousands(1234.9), "$1,234k");
        assert_eq!(format_usd_thousands(1_000_000.0), "$1,000,000k");
        assert_eq!(format_usd_thousands(999.0), "$999k");
    }

    #[test]
    fn negative_values_truncate_toward_zero() {
        assert_eq!(format_usd_thousands(-0.5), "$0k");
        assert_eq!(format_usd_thousands(-1500.2), "$-1,500k");
    }

    #[test]
    fn month_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(format_month(date), "2025-07");
    }
}
