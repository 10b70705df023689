//! Class duration aggregation.
//!
//! Classes are recorded with free-text time ranges in 12-hour notation, such as
//! `"09:00 AM to 10:30 AM"`. This module turns those ranges into elapsed hours,
//! sums them over a cycle and reports progress against the cycle's hour target.

use crate::core::cycle::{ClassRecord, CycleEntry};
use chrono::{NaiveTime, TimeDelta};

const CLOCK_FORMATS: [&str; 2] = ["%I:%M%p", "%I:%M:%S%p"];

/// Elapsed hours of a `"<start> to <end>"` range.
///
/// When the end is earlier than the start the class ran past midnight and 24 hours
/// are added to the end. Anything that does not parse counts as 0 hours.
#[must_use]
pub fn parse_duration_hours(range: &str) -> f64 {
    let Some((start, end)) = parse_range(range) else {
        return 0.0;
    };

    let mut elapsed = end.signed_duration_since(start);
    if elapsed < TimeDelta::zero() {
        elapsed += TimeDelta::hours(24);
    }

    #[allow(clippy::cast_precision_loss)] // a day has 86 400 seconds
    let hours = elapsed.num_seconds() as f64 / 3600.0;
    hours
}

/// Splits and parses both ends of a time range.
#[must_use]
pub fn parse_range(range: &str) -> Option<(NaiveTime, NaiveTime)> {
    let tokens: Vec<&str> = range.split_whitespace().collect();
    let index = tokens
        .iter()
        .position(|token| token.eq_ignore_ascii_case("to"))?;
    let start = parse_clock(&tokens[..index].concat())?;
    let end = parse_clock(&tokens[index + 1..].concat())?;
    Some((start, end))
}

/// Parses a 12-hour clock reading such as `"09:00 AM"`, `"9:00am"` or `"11:15:30 PM"`.
#[must_use]
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let compact: String = text.split_whitespace().collect::<String>().to_uppercase();
    if compact.is_empty() {
        return None;
    }

    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&compact, format).ok())
}

/// Sum of the durations of every range.
pub fn total_hours<'a, I>(ranges: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    ranges.into_iter().map(parse_duration_hours).sum()
}

/// Total hours of the classes selected by the cycle filter.
#[must_use]
pub fn total_cycle_hours<T: ClassRecord>(entries: &[CycleEntry<'_, T>]) -> f64 {
    total_hours(entries.iter().map(|entry| entry.record.time_range()))
}

/// Hour target for a cycle: the contracted hours when agreed, else the default.
#[must_use]
pub fn target_hours(contracted: Option<f64>, default_hours: f64) -> f64 {
    contracted
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .unwrap_or(default_hours)
}

/// Progress towards `target` in percent, capped at 100.
///
/// A non-positive or non-finite target yields 0.
#[must_use]
pub fn percent_complete(total: f64, target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 || !total.is_finite() {
        return 0.0;
    }

    (total / target * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_simple_range() {
        assert_eq!(parse_duration_hours("09:00 AM to 10:30 AM"), 1.5);
        assert_eq!(parse_duration_hours("09:00 AM to 10:00 AM"), 1.0);
        assert_eq!(parse_duration_hours("11:30 AM to 01:00 PM"), 1.5);
    }

    #[test]
    fn test_parse_midnight_rollover() {
        assert_eq!(parse_duration_hours("11:00 PM to 01:00 AM"), 2.0);
    }

    #[test]
    fn test_parse_relaxed_spelling() {
        assert_eq!(parse_duration_hours("9:00am to 10:30 am"), 1.5);
        assert_eq!(parse_duration_hours("  04:00 PM TO 05:15 PM  "), 1.25);
    }

    #[test]
    fn test_unparseable_ranges_are_zero() {
        assert_eq!(parse_duration_hours(""), 0.0);
        assert_eq!(parse_duration_hours("09:00 AM"), 0.0);
        assert_eq!(parse_duration_hours("morning to evening"), 0.0);
        assert_eq!(parse_duration_hours("13:00 PM to 14:00 PM"), 0.0);
    }

    #[test]
    fn test_equal_start_and_end_is_zero() {
        assert_eq!(parse_duration_hours("10:00 AM to 10:00 AM"), 0.0);
    }

    #[test]
    fn test_total_hours_sums_and_ignores_garbage() {
        let ranges = ["09:00 AM to 10:30 AM", "", "11:00 PM to 01:00 AM", "n/a"];
        assert_eq!(total_hours(ranges), 3.5);
    }

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(6.0, 12.0), 50.0);
        assert_eq!(percent_complete(15.0, 12.0), 100.0);
        assert_eq!(percent_complete(0.0, 12.0), 0.0);
        assert_eq!(percent_complete(6.0, 0.0), 0.0);
    }

    #[test]
    fn test_target_hours_prefers_contracted() {
        assert_eq!(target_hours(Some(8.0), 12.0), 8.0);
        assert_eq!(target_hours(None, 12.0), 12.0);
        assert_eq!(target_hours(Some(0.0), 12.0), 12.0);
        assert_eq!(target_hours(Some(f64::NAN), 12.0), 12.0);
    }
}
