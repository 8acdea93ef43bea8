//! ISO-8601 sampling instants as sensor gateways write them.
//!
//! Accepted shapes, in extended or basic form:
//! - date: `YYYY-MM-DD`, `YYYYMMDD`, `YYYY-Www-D`, `YYYYWwwD`
//! - optional time after any single separator character: `HH`, `HH:MM`,
//!   `HH:MM:SS`, `HHMM`, `HHMMSS`, with a `.` or `,` fraction on seconds
//! - optional offset: `Z`, `±HH`, `±HH:MM`, `±HHMM`, `±HH:MM:SS`, `±HHMMSS`
//!
//! Fractions beyond microseconds are truncated.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

fn number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn week_date(year: &str, week: &str, day: Option<&str>) -> Option<NaiveDate> {
    let weekday = match day.map(number) {
        None => Weekday::Mon,
        Some(Some(1)) => Weekday::Mon,
        Some(Some(2)) => Weekday::Tue,
        Some(Some(3)) => Weekday::Wed,
        Some(Some(4)) => Weekday::Thu,
        Some(Some(5)) => Weekday::Fri,
        Some(Some(6)) => Weekday::Sat,
        Some(Some(7)) => Weekday::Sun,
        Some(_) => return None,
    };
    NaiveDate::from_isoywd_opt(number(year)? as i32, number(week)?, weekday)
}

/// Splits the leading date off `value` and returns it with the remainder.
fn parse_date(value: &str) -> Option<(NaiveDate, &str)> {
    let bytes = value.as_bytes();
    if bytes.len() < 7 {
        return None;
    }

    if bytes[4] == b'-' {
        if bytes[5] == b'W' {
            // YYYY-Www-D or YYYY-Www
            if bytes.get(8) == Some(&b'-') {
                let date = week_date(value.get(..4)?, value.get(6..8)?, Some(value.get(9..10)?))?;
                return Some((date, value.get(10..)?));
            }
            let date = week_date(value.get(..4)?, value.get(6..8)?, None)?;
            return Some((date, value.get(8..)?));
        }
        if bytes.get(7) != Some(&b'-') {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(
            number(value.get(..4)?)? as i32,
            number(value.get(5..7)?)?,
            number(value.get(8..10)?)?,
        )?;
        return Some((date, &value[10..]));
    }

    if bytes[4] == b'W' {
        // YYYYWwwD or YYYYWww
        if matches!(bytes.get(7), Some(b) if b.is_ascii_digit()) {
            let date = week_date(value.get(..4)?, value.get(5..7)?, Some(value.get(7..8)?))?;
            return Some((date, &value[8..]));
        }
        let date = week_date(value.get(..4)?, value.get(5..7)?, None)?;
        return Some((date, value.get(7..)?));
    }

    let date = NaiveDate::from_ymd_opt(
        number(value.get(..4)?)? as i32,
        number(value.get(4..6)?)?,
        number(value.get(6..8)?)?,
    )?;
    Some((date, &value[8..]))
}

/// Microseconds from a fraction's digits, truncated after six.
fn parse_fraction(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kept: String = digits.chars().take(6).collect();
    let scale = 10u32.pow(6 - kept.len() as u32);
    Some(number(&kept)? * scale)
}

/// `[hour, minute?, second?]` from `HH:MM:SS` or `HHMMSS` style input.
fn clock_fields(clock: &str) -> Option<Vec<u32>> {
    let parts: Vec<&str> = if clock.contains(':') {
        clock.split(':').collect()
    } else {
        if clock.len() % 2 != 0 || !clock.is_ascii() {
            return None;
        }
        (0..clock.len()).step_by(2).map(|i| &clock[i..i + 2]).collect()
    };

    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.len() != 2) {
        return None;
    }
    parts.into_iter().map(number).collect()
}

fn parse_time(clock: &str) -> Option<NaiveTime> {
    let (main, fraction) = match clock.find(&['.', ','][..]) {
        Some(i) => (&clock[..i], Some(&clock[i + 1..])),
        None => (clock, None),
    };

    let fields = clock_fields(main)?;
    let micro = match fraction {
        // a fraction is only allowed on seconds
        Some(digits) if fields.len() == 3 => parse_fraction(digits)?,
        Some(_) => return None,
        None => 0,
    };

    NaiveTime::from_hms_micro_opt(
        fields[0],
        fields.get(1).copied().unwrap_or(0),
        fields.get(2).copied().unwrap_or(0),
        micro,
    )
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    if offset == "Z" || offset == "z" {
        return FixedOffset::east_opt(0);
    }

    let sign = match offset.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let fields = clock_fields(&offset[1..])?;
    let seconds = fields[0] * 3600
        + fields.get(1).copied().unwrap_or(0) * 60
        + fields.get(2).copied().unwrap_or(0);
    if seconds >= 24 * 3600 {
        return None;
    }
    FixedOffset::east_opt(sign * seconds as i32)
}

impl Timestamp {
    /// Parses an ISO-8601 date or date-time; see the module docs for the shapes.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (date, rest) = parse_date(value)?;

        let mut chars = rest.chars();
        let Some(_separator) = chars.next() else {
            return date.and_hms_opt(0, 0, 0).map(Self::Naive);
        };
        let time_part = chars.as_str();

        let (clock, offset) = match time_part.find(&['Z', 'z', '+', '-'][..]) {
            Some(i) => (&time_part[..i], Some(&time_part[i..])),
            None => (time_part, None),
        };

        let naive = date.and_time(parse_time(clock)?);
        match offset {
            None => Some(Self::Naive(naive)),
            Some(offset) => {
                let offset = parse_offset(offset)?;
                naive
                    .and_local_timezone(offset)
                    .single()
                    .map(Self::Offset)
            }
        }
    }

    /// Drops minutes, seconds and sub-second precision.
    pub fn truncate_to_hour(&self) -> Self {
        match self {
            Self::Naive(dt) => Self::Naive(
                dt.with_minute(0)
                    .and_then(|d| d.with_second(0))
                    .and_then(|d| d.with_nanosecond(0))
                    .unwrap_or(*dt),
            ),
            Self::Offset(dt) => Self::Offset(
                dt.with_minute(0)
                    .and_then(|d| d.with_second(0))
                    .and_then(|d| d.with_nanosecond(0))
                    .unwrap_or(*dt),
            ),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Offset(dt) if dt.offset().local_minus_utc() % 60 != 0 => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%::z"))
            }
            Self::Offset(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(value: &str) -> Option<String> {
        Timestamp::parse(value).map(|ts| ts.to_string())
    }

    #[test]
    fn test_extended_date_times() {
        assert_eq!(parsed("2024-01-15T10:35:00").as_deref(), Some("2024-01-15T10:35:00"));
        assert_eq!(parsed("2024-01-15T10:35").as_deref(), Some("2024-01-15T10:35:00"));
        assert_eq!(parsed("2024-01-15T10").as_deref(), Some("2024-01-15T10:00:00"));
        assert_eq!(
            parsed("2024-01-15 10:35:12.250").as_deref(),
            Some("2024-01-15T10:35:12.250")
        );
        assert_eq!(
            parsed("2024-01-15T10:35:12,5").as_deref(),
            Some("2024-01-15T10:35:12.500")
        );
    }

    #[test]
    fn test_basic_forms() {
        assert_eq!(parsed("20240115T103000").as_deref(), Some("2024-01-15T10:30:00"));
        assert_eq!(parsed("20240115T1030").as_deref(), Some("2024-01-15T10:30:00"));
        assert_eq!(parsed("20240115").as_deref(), Some("2024-01-15T00:00:00"));
        assert_eq!(parsed("2024-01-15T103000").as_deref(), Some("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_week_dates() {
        assert_eq!(parsed("2024-W03-1T08:00").as_deref(), Some("2024-01-15T08:00:00"));
        assert_eq!(parsed("2024W031").as_deref(), Some("2024-01-15T00:00:00"));
        assert_eq!(parsed("2024-W03").as_deref(), Some("2024-01-15T00:00:00"));
        assert_eq!(parsed("2024W03T09").as_deref(), Some("2024-01-15T09:00:00"));
        assert!(Timestamp::parse("2024-W03-8").is_none());
    }

    #[test]
    fn test_date_only() {
        assert_eq!(parsed("2024-01-15").as_deref(), Some("2024-01-15T00:00:00"));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(
            parsed("2024-01-15T10:35:00Z").as_deref(),
            Some("2024-01-15T10:35:00+00:00")
        );
        assert_eq!(
            parsed("2024-01-15T10:35+0530").as_deref(),
            Some("2024-01-15T10:35:00+05:30")
        );
        assert_eq!(
            parsed("2024-01-15T10-03").as_deref(),
            Some("2024-01-15T10:00:00-03:00")
        );
        assert_eq!(
            parsed("2024-01-15T10:00:00+01:00:30").as_deref(),
            Some("2024-01-15T10:00:00+01:00:30")
        );
    }

    #[test]
    fn test_other_separators() {
        assert_eq!(parsed("2024-01-15_10:35").as_deref(), Some("2024-01-15T10:35:00"));
    }

    #[test]
    fn test_rejected_shapes() {
        for value in [
            "",
            "yesterday",
            "2024-1-5",
            "2024-01-15T",
            "2024-01-15T25:00",
            "2024-01-15T10:3",
            "2024-01-15T10.5",
            "2024-13-01",
            "2024-01-15T10:00+24:00",
            "2024-01-15T10:00:00+",
        ] {
            assert!(Timestamp::parse(value).is_none(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_truncate_to_hour_keeps_offset() {
        let ts = Timestamp::parse("2024-06-01T13:47:09.5+02:00").unwrap();
        assert_eq!(ts.truncate_to_hour().to_string(), "2024-06-01T13:00:00+02:00");

        let naive = Timestamp::parse("2024-06-01T13:47:09").unwrap();
        assert_eq!(naive.truncate_to_hour().to_string(), "2024-06-01T13:00:00");
    }
}
