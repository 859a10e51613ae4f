//! Conversion between relative duration strings and absolute access windows.
//!
//! The duration grammar itself lives behind [`DurationParser`]; this module
//! only anchors parsed spans to a caller-supplied instant so that every
//! result is reproducible for a given `now`.

use chrono::{DateTime, TimeDelta, Utc};

use crate::RoleAssignmentError;

/// Port for turning a human-entered relative duration such as `"1h"` into a
/// time span.
pub trait DurationParser: Send + Sync {
    /// Parses a duration string, returning `None` when it is not understood.
    fn parse_duration(&self, range: &str) -> Option<TimeDelta>;
}

/// Absolute validity window of a temporary grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessWindow {
    /// Instant at which access starts.
    pub start_time: DateTime<Utc>,
    /// Instant after which access is expired.
    pub end_time: DateTime<Utc>,
}

/// Resolves a relative duration against `now`.
///
/// `start_time` is `now` and `end_time` is `now` plus the parsed span.
/// Unparseable, non-positive or overflowing spans fail with
/// [`RoleAssignmentError::InvalidDuration`].
pub fn resolve_access_window<P>(
    parser: &P,
    range: &str,
    now: DateTime<Utc>,
) -> Result<AccessWindow, RoleAssignmentError>
where
    P: DurationParser + ?Sized,
{
    let invalid = || RoleAssignmentError::InvalidDuration {
        range: range.to_owned(),
    };

    let span = parser
        .parse_duration(range)
        .filter(|span| *span > TimeDelta::zero())
        .ok_or_else(invalid)?;
    let end_time = now.checked_add_signed(span).ok_or_else(invalid)?;

    Ok(AccessWindow {
        start_time: now,
        end_time,
    })
}

/// Returns whether a window ending at `end_time` is over at `now`.
#[must_use]
pub fn is_expired(end_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > end_time
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::{DurationParser, is_expired, resolve_access_window};
    use crate::RoleAssignmentError;

    /// Parser understanding `<n>m`, `<n>h` and `<n>d` only.
    pub(crate) struct UnitParser;

    impl DurationParser for UnitParser {
        fn parse_duration(&self, range: &str) -> Option<TimeDelta> {
            let unit = range.chars().last()?;
            let amount = range[..range.len() - unit.len_utf8()].parse::<i64>().ok()?;
            match unit {
                'm' => TimeDelta::try_minutes(amount),
                'h' => TimeDelta::try_hours(amount),
                'd' => TimeDelta::try_days(amount),
                _ => None,
            }
        }
    }

    pub(crate) fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!())
    }

    #[test]
    fn resolves_window_from_now() {
        let window = resolve_access_window(&UnitParser, "1h", t0());
        assert!(window.is_ok());
        let window = window.unwrap_or_else(|_| unreachable!());
        assert_eq!(window.start_time, t0());
        assert_eq!(window.end_time, t0() + TimeDelta::hours(1));
    }

    #[test]
    fn unparseable_range_is_invalid_duration() {
        let window = resolve_access_window(&UnitParser, "soon", t0());
        assert_eq!(
            window,
            Err(RoleAssignmentError::InvalidDuration {
                range: "soon".to_owned()
            })
        );
    }

    #[test]
    fn zero_span_is_invalid_duration() {
        let window = resolve_access_window(&UnitParser, "0h", t0());
        assert!(matches!(
            window,
            Err(RoleAssignmentError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn expiry_is_strictly_after_end_time() {
        let end_time = t0() + TimeDelta::hours(1);
        assert!(!is_expired(end_time, end_time));
        assert!(is_expired(end_time, t0() + TimeDelta::hours(2)));
        assert!(!is_expired(end_time, t0()));
    }
}
