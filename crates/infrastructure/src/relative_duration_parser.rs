use chrono::TimeDelta;
use grantline_domain::DurationParser;

const MILLIS_PER_SECOND: f64 = 1_000.0;
const MILLIS_PER_MINUTE: f64 = MILLIS_PER_SECOND * 60.0;
const MILLIS_PER_HOUR: f64 = MILLIS_PER_MINUTE * 60.0;
const MILLIS_PER_DAY: f64 = MILLIS_PER_HOUR * 24.0;
const MILLIS_PER_WEEK: f64 = MILLIS_PER_DAY * 7.0;
const MILLIS_PER_YEAR: f64 = MILLIS_PER_DAY * 365.25;

/// Parser for short relative durations such as `30m`, `1.5h` or `2 days`.
///
/// A bare number is read as milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeDurationParser;

impl RelativeDurationParser {
    /// Creates a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DurationParser for RelativeDurationParser {
    fn parse_duration(&self, range: &str) -> Option<TimeDelta> {
        let range = range.trim();
        if range.is_empty() || range.len() > 100 {
            return None;
        }

        let unit_start = range
            .find(|character: char| character.is_ascii_alphabetic())
            .unwrap_or(range.len());
        let (amount, unit) = range.split_at(unit_start);
        let amount = amount.trim().parse::<f64>().ok()?;
        if !amount.is_finite() {
            return None;
        }

        let millis = amount * unit_millis(unit.trim().to_ascii_lowercase().as_str())?;
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }

        TimeDelta::try_milliseconds(millis.round() as i64)
    }
}

fn unit_millis(unit: &str) -> Option<f64> {
    match unit {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => Some(1.0),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(MILLIS_PER_SECOND),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(MILLIS_PER_MINUTE),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(MILLIS_PER_HOUR),
        "d" | "day" | "days" => Some(MILLIS_PER_DAY),
        "w" | "week" | "weeks" => Some(MILLIS_PER_WEEK),
        "y" | "yr" | "yrs" | "year" | "years" => Some(MILLIS_PER_YEAR),
        _ => None,
    }
}
