// In crates/core-types/src/time.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses a user- or service-supplied timestamp.
///
/// Accepts, in order:
/// 1. RFC 3339 (`2024-01-01T00:00:00Z`, `2024-01-01T00:00:00+00:00`)
/// 2. A naive ISO date-time (`2024-01-01T09:30:00`, fractional seconds allowed), read as UTC
/// 3. A bare calendar date (`2024-01-01`), read as midnight UTC
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// Serde helper for timestamps on the wire: always written as RFC 3339,
/// read with the lenient rules of [`parse_timestamp`].
pub mod lenient {
    use super::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("unrecognised timestamp '{raw}'")))
    }
}
