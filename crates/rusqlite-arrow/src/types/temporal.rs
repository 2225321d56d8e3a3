//! Temporal value handling for timestamp columns.
//!
//! SQLite has no dedicated datetime storage class; columns declared as
//! DATE/DATETIME/TIMESTAMP hold ISO-formatted text or Unix-epoch integers.
//! This module parses both forms into a civil [`Timestamp`] and renders the
//! fixed, locale-independent RFC3339 text used for output columns.

use crate::Result;
use crate::error::SqliteArrowError;

/// A civil (timezone-naive) calendar timestamp.
///
/// Accumulated by timestamp columns during row materialization and
/// rendered as RFC3339 text (`YYYY-MM-DDTHH:MM:SSZ`, with fractional
/// seconds when present) at column assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
    /// Second, 0-59.
    pub second: u32,
    /// Sub-second fraction in nanoseconds.
    pub nanos: u32,
}

impl Timestamp {
    /// Parse a SQLite datetime string.
    ///
    /// Accepted forms: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.frac]]`, and
    /// the `T`-separated variant, with an optional trailing `Z`.
    ///
    /// Returns `None` when the string is not one of the accepted forms or
    /// a field is out of range.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s.strip_suffix('Z').unwrap_or(s);

        let (date_part, time_part) = match s.find(['T', ' ']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };

        let (year, month, day) = parse_date(date_part)?;
        let (hour, minute, second, nanos) = match time_part {
            Some(t) => parse_time(t)?,
            None => (0, 0, 0, 0),
        };

        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanos,
        })
    }

    /// Build a timestamp from seconds since the Unix epoch (UTC).
    #[must_use]
    pub fn from_unix_seconds(seconds: i64) -> Self {
        let days = seconds.div_euclid(86_400);
        let secs_of_day = seconds.rem_euclid(86_400) as u32;

        #[allow(clippy::cast_possible_truncation)]
        let (year, month, day) = civil_from_days(days as i32);

        Self {
            year,
            month,
            day,
            hour: secs_of_day / 3600,
            minute: secs_of_day % 3600 / 60,
            second: secs_of_day % 60,
            nanos: 0,
        }
    }

    /// Render as RFC3339 text.
    ///
    /// Fractional seconds are included only when non-zero, with trailing
    /// zeros trimmed: `2024-06-15T12:30:45.5Z`.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        let mut out = format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        if self.nanos > 0 {
            let frac = format!("{:09}", self.nanos);
            out.push('.');
            out.push_str(frac.trim_end_matches('0'));
        }
        out.push('Z');
        out
    }
}

/// Parse and range-check a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Option<(i32, u32, u32)> {
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }
    Some((year, month, day))
}

/// Parse and range-check a `HH:MM[:SS[.frac]]` time.
fn parse_time(s: &str) -> Option<(u32, u32, u32, u32)> {
    let (clock, nanos) = match s.split_once('.') {
        Some((clock, frac)) => (clock, parse_fraction(frac)?),
        None => (s, 0),
    };

    let mut parts = clock.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let second: u32 = match parts.next() {
        Some(sec) => sec.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    Some((hour, minute, second, nanos))
}

/// Parse a fractional-seconds suffix into nanoseconds.
///
/// Accepts 1-9 digits; shorter fractions are right-padded (`.5` is 500ms).
fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{frac:0<9}");
    padded.parse().ok()
}

const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Convert days since the Unix epoch to (year, month, day).
///
/// Algorithm from <https://howardhinnant.github.io/date_algorithms.html>.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
const fn civil_from_days(days: i32) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i32 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    (if month <= 2 { y + 1 } else { y }, month, day)
}

/// Decode a timestamp cell from its raw storage, naming the column on
/// failure.
pub(crate) fn timestamp_from_text(text: &str, column: &str) -> Result<Timestamp> {
    Timestamp::parse(text).ok_or_else(|| {
        SqliteArrowError::scan(column, format!("cannot parse '{text}' as a timestamp"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days() {
        // Unix epoch
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        // Day after epoch
        assert_eq!(civil_from_days(1), (1970, 1, 2));
        // Year 2000
        assert_eq!(civil_from_days(10957), (2000, 1, 1));
        // Before epoch
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
    }

    #[test]
    fn test_parse_date_only() {
        let ts = Timestamp::parse("2024-06-15").unwrap();
        assert_eq!((ts.year, ts.month, ts.day), (2024, 6, 15));
        assert_eq!((ts.hour, ts.minute, ts.second, ts.nanos), (0, 0, 0, 0));
    }

    #[test]
    fn test_parse_space_separated() {
        let ts = Timestamp::parse("2024-06-15 12:30:45").unwrap();
        assert_eq!((ts.hour, ts.minute, ts.second), (12, 30, 45));
    }

    #[test]
    fn test_parse_t_separated_with_fraction() {
        let ts = Timestamp::parse("2024-06-15T12:30:45.5Z").unwrap();
        assert_eq!(ts.nanos, 500_000_000);
    }

    #[test]
    fn test_parse_hour_minute_only() {
        let ts = Timestamp::parse("2024-06-15 12:30").unwrap();
        assert_eq!((ts.hour, ts.minute, ts.second), (12, 30, 0));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(Timestamp::parse("2024-13-01").is_none());
        assert!(Timestamp::parse("2024-02-30").is_none());
        assert!(Timestamp::parse("2024-06-15 24:00:00").is_none());
        assert!(Timestamp::parse("not a date").is_none());
        assert!(Timestamp::parse("2024-06-15 12:30:45.").is_none());
    }

    #[test]
    fn test_parse_leap_day() {
        assert!(Timestamp::parse("2024-02-29").is_some());
        assert!(Timestamp::parse("2023-02-29").is_none());
        assert!(Timestamp::parse("2000-02-29").is_some());
        assert!(Timestamp::parse("1900-02-29").is_none());
    }

    #[test]
    fn test_from_unix_seconds() {
        let epoch = Timestamp::from_unix_seconds(0);
        assert_eq!(epoch.to_rfc3339(), "1970-01-01T00:00:00Z");

        let ts = Timestamp::from_unix_seconds(1_718_454_645);
        assert_eq!(ts.to_rfc3339(), "2024-06-15T12:30:45Z");

        let before_epoch = Timestamp::from_unix_seconds(-1);
        assert_eq!(before_epoch.to_rfc3339(), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn test_rfc3339_fraction_trimming() {
        let ts = Timestamp::parse("2024-06-15 12:30:45.250").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-06-15T12:30:45.25Z");
    }

    #[test]
    fn test_parse_format_round_trip() {
        let rendered = "2024-06-15T12:30:45Z";
        let ts = Timestamp::parse(rendered).unwrap();
        assert_eq!(ts.to_rfc3339(), rendered);
    }
}
