//! Timestamp normalization.
//!
//! Academy records carry dates in several shapes: native document-store timestamps
//! (`{seconds, nanoseconds}`), their serialized REST form (`{_seconds, _nanoseconds}`),
//! ISO-8601 strings, chrono values, or nothing at all. Everything here converts those
//! shapes into a single `DateTime<Utc>`.
//!
//! Unrecognized shapes never error: they normalize to `None`, and callers decide
//! whether a missing date excludes a record.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Anything that can convert itself into a UTC instant.
pub trait AsInstant {
    /// Returns the instant this value denotes, or `None` if it is out of range.
    fn as_instant(&self) -> Option<DateTime<Utc>>;
}

impl AsInstant for DateTime<Utc> {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        Some(*self)
    }
}

impl AsInstant for DateTime<FixedOffset> {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

/// Naive date-times are taken to be UTC.
impl AsInstant for NaiveDateTime {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        Some(self.and_utc())
    }
}

/// A bare date denotes midnight UTC of that day.
impl AsInstant for NaiveDate {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        self.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
    }
}

/// Native document-store timestamp, as returned by the store's client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTimestamp {
    /// Seconds since the Unix epoch
    pub seconds: i64,
    /// Sub-second part
    #[serde(default)]
    pub nanoseconds: i64,
}

impl AsInstant for StoreTimestamp {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        from_parts(self.seconds, self.nanoseconds)
    }
}

/// Timestamp serialized by the REST backend, with underscore-prefixed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTimestamp {
    /// Seconds since the Unix epoch
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    /// Sub-second part
    #[serde(rename = "_nanoseconds", default)]
    pub nanoseconds: i64,
}

impl AsInstant for SerializedTimestamp {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        from_parts(self.seconds, self.nanoseconds)
    }
}

/// Every timestamp shape accepted in incoming documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// `{"_seconds": .., "_nanoseconds": ..}`
    Serialized(SerializedTimestamp),
    /// `{"seconds": .., "nanoseconds": ..}`
    Store(StoreTimestamp),
    /// ISO-8601 text
    Text(String),
}

impl AsInstant for RawTimestamp {
    fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Serialized(ts) => ts.as_instant(),
            Self::Store(ts) => ts.as_instant(),
            Self::Text(text) => parse_iso(text),
        }
    }
}

/// Normalizes an optional value of any supported shape.
pub fn normalize<T: AsInstant>(value: Option<&T>) -> Option<DateTime<Utc>> {
    value.and_then(AsInstant::as_instant)
}

/// Normalizes an arbitrary JSON value.
///
/// Accepts `{_seconds, _nanoseconds}`, `{seconds, nanoseconds}` and ISO-8601 strings.
/// Null, numbers, booleans, arrays and any other object yield `None`.
#[must_use]
pub fn normalize_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_iso(text),
        Value::Object(_) => serde_json::from_value::<RawTimestamp>(value.clone())
            .ok()
            .and_then(|raw| raw.as_instant()),
        _ => None,
    }
}

/// Parses ISO-8601 text.
///
/// Accepts RFC 3339 with an offset, naive date-times (taken as UTC, with `T` or a
/// space separator) and bare `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.as_instant();
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return naive.as_instant();
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.as_instant())
}

fn from_parts(seconds: i64, nanoseconds: i64) -> Option<DateTime<Utc>> {
    let carry = nanoseconds.div_euclid(NANOS_PER_SECOND);
    let nanos = u32::try_from(nanoseconds.rem_euclid(NANOS_PER_SECOND)).ok()?;
    DateTime::from_timestamp(seconds.checked_add(carry)?, nanos)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn jan_15_1030() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_chrono_value_normalizes_to_itself() {
        let expected = jan_15_1030();
        assert_eq!(normalize(Some(&expected)), Some(expected));
    }

    #[test]
    fn test_serialized_pair_normalizes_to_the_millisecond() {
        let expected = jan_15_1030() + chrono::Duration::milliseconds(250);
        let value = json!({
            "_seconds": jan_15_1030().timestamp(),
            "_nanoseconds": 250_000_000
        });

        let normalized = normalize_value(&value).unwrap();
        assert_eq!(normalized, expected);
        assert_eq!(normalized.timestamp_millis(), expected.timestamp_millis());
    }

    #[test]
    fn test_store_timestamp_normalizes() {
        let value = json!({ "seconds": jan_15_1030().timestamp(), "nanoseconds": 0 });
        assert_eq!(normalize_value(&value), Some(jan_15_1030()));

        let typed = StoreTimestamp {
            seconds: jan_15_1030().timestamp(),
            nanoseconds: 0,
        };
        assert_eq!(normalize(Some(&typed)), Some(jan_15_1030()));
    }

    #[test]
    fn test_iso_strings_normalize() {
        assert_eq!(parse_iso("2025-01-15T10:30:00Z"), Some(jan_15_1030()));
        assert_eq!(parse_iso("2025-01-15T10:30:00.000Z"), Some(jan_15_1030()));
        assert_eq!(parse_iso("2025-01-15T15:30:00+05:00"), Some(jan_15_1030()));
        assert_eq!(parse_iso("2025-01-15T10:30:00"), Some(jan_15_1030()));
        assert_eq!(parse_iso("2025-01-15 10:30:00"), Some(jan_15_1030()));
        assert_eq!(
            parse_iso("2025-01-15"),
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_value_normalizes_to_none() {
        assert_eq!(normalize::<RawTimestamp>(None), None);
        assert_eq!(normalize_value(&Value::Null), None);
    }

    #[test]
    fn test_unrecognized_shapes_normalize_to_none() {
        assert_eq!(normalize_value(&json!(1_736_937_000)), None);
        assert_eq!(normalize_value(&json!(true)), None);
        assert_eq!(normalize_value(&json!(["2025-01-15"])), None);
        assert_eq!(normalize_value(&json!({ "date": "2025-01-15" })), None);
        assert_eq!(normalize_value(&json!("")), None);
        assert_eq!(normalize_value(&json!("next tuesday")), None);
        assert_eq!(normalize_value(&json!("2025-13-45")), None);
    }

    #[test]
    fn test_nanoseconds_overflow_carries_into_seconds() {
        let ts = SerializedTimestamp {
            seconds: jan_15_1030().timestamp() - 1,
            nanoseconds: NANOS_PER_SECOND,
        };
        assert_eq!(ts.as_instant(), Some(jan_15_1030()));
    }

    #[test]
    fn test_raw_timestamp_deserializes_every_shape() {
        let serialized: RawTimestamp =
            serde_json::from_value(json!({ "_seconds": 10, "_nanoseconds": 5 })).unwrap();
        assert!(matches!(serialized, RawTimestamp::Serialized(_)));

        let store: RawTimestamp =
            serde_json::from_value(json!({ "seconds": 10, "nanoseconds": 5 })).unwrap();
        assert!(matches!(store, RawTimestamp::Store(_)));

        let text: RawTimestamp = serde_json::from_value(json!("2025-01-15")).unwrap();
        assert!(matches!(text, RawTimestamp::Text(_)));
    }
}
