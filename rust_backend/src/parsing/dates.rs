//! Lenient parsing of date-like text into timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-and-time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a date or date-time string.
///
/// Returns `None` for empty input or text matching none of the supported
/// layouts. RFC 3339 values are converted to their UTC wall-clock time.
///
/// # Examples
///
/// ```
/// use nyc_airbnb_prep::parsing::dates::parse_timestamp;
///
/// assert!(parse_timestamp("2019-05-21").is_some());
/// assert!(parse_timestamp("05/21/2019").is_some());
/// assert!(parse_timestamp("not-a-date").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_date_only_layouts() {
        assert_eq!(parse_timestamp("2019-05-21"), Some(ymd(2019, 5, 21)));
        assert_eq!(parse_timestamp("2019/05/21"), Some(ymd(2019, 5, 21)));
        assert_eq!(parse_timestamp("05/21/2019"), Some(ymd(2019, 5, 21)));
        assert_eq!(parse_timestamp("  2018-10-19 "), Some(ymd(2018, 10, 19)));
    }

    #[test]
    fn test_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2019, 7, 5)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2019-07-05 13:45:00"), Some(expected));
        assert_eq!(parse_timestamp("2019-07-05T13:45:00"), Some(expected));
        assert_eq!(parse_timestamp("2019-07-05T15:45:00+02:00"), Some(expected));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp("2019-13-40"), None);
        assert_eq!(parse_timestamp("12345"), None);
    }
}
