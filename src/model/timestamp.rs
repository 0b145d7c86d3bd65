use chrono::{DateTime, TimeZone, Utc};

use crate::error::Result;

// Unix timestamp in seconds — the unit OpenTSDB uses for datapoint keys.
pub type Timestamp = i64;

/// Converts an epoch-seconds timestamp into a calendar UTC instant.
pub fn to_datetime(ts: Timestamp) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| format!("timestamp {} is out of range", ts).into())
}

/// Parses the wire form of a datapoint time key (string-encoded epoch seconds).
pub fn parse_timestamp(s: &str) -> Result<Timestamp> {
    s.parse::<Timestamp>()
        .map_err(|e| (format!("couldn't parse datapoint time key '{}'", s), e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(1000, parse_timestamp("1000").unwrap());
        assert_eq!(-5, parse_timestamp("-5").unwrap());
        assert!(parse_timestamp("10s0").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_to_datetime() {
        let expected = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(expected, to_datetime(1609459200).unwrap());
    }
}
