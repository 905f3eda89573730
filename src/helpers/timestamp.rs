use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

/// Formats accepted besides RFC 3339. The space-separated variant is what
/// Python's `str(datetime)` produces.
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("a timestamp is required")]
    Missing,
    #[error("'{0}' is not an ISO-8601 timestamp")]
    Malformed(String),
    #[error("'{0}' has no timezone offset")]
    MissingOffset(String),
}

/// Parse a timezone-aware ISO-8601 timestamp and convert it to UTC.
///
/// Timestamps without an offset are rejected rather than guessed.
pub fn parse_aware_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimestampError::Missing);
    }

    if let Some(parsed) = parse_with_offset(raw) {
        return Ok(parsed);
    }

    // An unescaped `+` in a query string arrives as a space
    if let Some(restored) = restore_plus_sign(raw) {
        if let Some(parsed) = parse_with_offset(&restored) {
            return Ok(parsed);
        }
    }

    let is_naive = NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(raw, format).is_ok())
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();

    if is_naive {
        Err(TimestampError::MissingOffset(raw.to_string()))
    } else {
        Err(TimestampError::Malformed(raw.to_string()))
    }
}

fn parse_with_offset(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        })
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn restore_plus_sign(raw: &str) -> Option<String> {
    let (head, offset) = raw.rsplit_once(' ')?;
    let looks_like_offset = matches!(offset.len(), 4 | 5)
        && offset.chars().all(|c| c.is_ascii_digit() || c == ':');

    (looks_like_offset && head.contains(':')).then(|| format!("{}+{}", head, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_rfc3339() {
        let parsed = parse_aware_timestamp("2023-08-08T17:21:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 8, 8, 17, 21, 0).unwrap());
    }

    #[test]
    fn test_converts_offsets_to_utc() {
        let parsed = parse_aware_timestamp("2023-08-08T19:21:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 8, 8, 17, 21, 0).unwrap());
    }

    #[test]
    fn test_parses_space_separated_with_fraction() {
        let parsed = parse_aware_timestamp("2023-08-08 17:21:00.250000+00:00").unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 8, 8, 17, 21, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parses_compact_offset() {
        let parsed = parse_aware_timestamp("2023-08-08T17:21:00+0000").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 8, 8, 17, 21, 0).unwrap());
    }

    #[test]
    fn test_accepts_offset_with_decoded_plus_sign() {
        let parsed = parse_aware_timestamp("2023-08-08T19:21:00.5 02:00").unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 8, 8, 17, 21, 0).unwrap()
            + chrono::Duration::milliseconds(500);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_rejects_missing_value() {
        assert_eq!(parse_aware_timestamp(""), Err(TimestampError::Missing));
        assert_eq!(parse_aware_timestamp("   "), Err(TimestampError::Missing));
    }

    #[test]
    fn test_rejects_naive_timestamps() {
        assert_eq!(
            parse_aware_timestamp("2023-08-08T17:21:00"),
            Err(TimestampError::MissingOffset("2023-08-08T17:21:00".to_string()))
        );
        assert_eq!(
            parse_aware_timestamp("2023-08-08"),
            Err(TimestampError::MissingOffset("2023-08-08".to_string()))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(
            parse_aware_timestamp("yesterday"),
            Err(TimestampError::Malformed("yesterday".to_string()))
        );
        assert!(matches!(
            parse_aware_timestamp("2023-13-45T99:00:00Z"),
            Err(TimestampError::Malformed(_))
        ));
    }
}
