use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp and normalize it to UTC.
///
/// The time part may stop at hours, minutes or seconds (with an optional
/// fraction), separated from the date by `T` or a space. An uppercase `Z`
/// or a numeric offset (`+00:00` / `+0000`) pins the zone; without one the
/// value is read as UTC. A bare `YYYY-MM-DD` becomes midnight UTC.
/// Returns `None` for anything else, including a lowercase `z`.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if input.trim() != input || input.contains('z') {
        return None;
    }
    let normalized = input.replace('Z', "+00:00");
    let expanded = with_minutes(&normalized);

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&expanded, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&expanded, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM-DDTHH[±offset]` gains `:00` so the minute formats apply.
fn with_minutes(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let hour_only = bytes.len() >= 13
        && matches!(bytes[10], b'T' | b' ')
        && bytes[11].is_ascii_digit()
        && bytes[12].is_ascii_digit()
        && matches!(bytes.get(13), None | Some(b'+') | Some(b'-'));
    if hour_only {
        Cow::Owned(format!("{}:00{}", &input[..13], &input[13..]))
    } else {
        Cow::Borrowed(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_zulu() {
        let dt = parse_timestamp("2099-01-01T00:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_normalizes_to_utc() {
        let dt = parse_timestamp("2099-01-01T08:00:00+08:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_timestamp("2099-01-01T00:00:00.250Z").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_without_seconds() {
        let expected = Utc.with_ymd_and_hms(2099, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2099-01-01T12:30Z"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01T12:30"), Some(expected));
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let expected = Utc.with_ymd_and_hms(2099, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2099-01-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01 12:30:00"), Some(expected));
    }

    #[test]
    fn test_parse_hour_only() {
        let expected = Utc.with_ymd_and_hms(2099, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2099-01-01T12"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01 12"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01T12Z"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01T14+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_space_separator_with_offset() {
        let expected = Utc.with_ymd_and_hms(2099, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2099-01-01 12:30+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01 12:30Z"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01 12:30:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_offset_without_colon() {
        let expected = Utc.with_ymd_and_hms(2099, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2099-01-01T12:30:00+0000"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01T14:30:00+0200"), Some(expected));
        assert_eq!(parse_timestamp("2099-01-01T12:30+0000"), Some(expected));
    }

    #[test]
    fn test_rejects_lowercase_zulu() {
        assert_eq!(parse_timestamp("2099-01-01T12:30:00z"), None);
        assert_eq!(parse_timestamp("2099-01-01T12:30z"), None);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2099-01-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2099-13-01T00:00:00Z"), None);
        assert_eq!(parse_timestamp(" 2099-01-01"), None);
        assert_eq!(parse_timestamp("2099-01-01T1"), None);
        assert_eq!(parse_timestamp("2099-01-01T12:30:00+00:00junk"), None);
    }
}
