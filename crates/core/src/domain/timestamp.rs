use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// RFC 3339, or ISO 8601 without an offset (read as UTC).
pub fn parse_lenient(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
            .map(|naive| Utc.from_utc_datetime(&naive)),
    }
}

/// `deserialize_with` adapter for [`parse_lenient`].
pub fn lenient_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn accepts_offset_and_naive_forms() {
        let zulu = parse_lenient("2025-06-01T10:30:00Z").unwrap();
        assert_eq!(zulu, Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap());

        let shifted = parse_lenient("2025-06-01T12:30:00+02:00").unwrap();
        assert_eq!(shifted, zulu);

        let naive = parse_lenient("2025-06-01T10:30:00.123456").unwrap();
        assert_eq!(naive.with_nanosecond(0).unwrap(), zulu);
        assert_eq!(naive.nanosecond(), 123_456_000);

        assert_eq!(parse_lenient("2025-06-01T10:30:00").unwrap(), zulu);
    }

    #[test]
    fn rejects_non_timestamps() {
        assert!(parse_lenient("yesterday").is_err());
        assert!(parse_lenient("2025-06-01").is_err());
    }
}
