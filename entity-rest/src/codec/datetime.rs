//! ISO-8601 encodings for date/time attributes
//!
//! Three families are supported, each as a pair of plain functions and a
//! serde `with` module (plus an `option` submodule for `Option<_>` fields):
//!
//! | Rust type | Module | Wire shape |
//! |---|---|---|
//! | `DateTime<FixedOffset>` | [`zoned`] | `2014-06-14T18:42:34.060+02:00` |
//! | `NaiveDateTime` | [`local`] | `2014-06-14T18:42:34.018` |
//! | `DateTime<Utc>` | [`utc`] | `2014-06-14T16:42:33.970Z` |
//!
//! Millisecond digits are always written. Zoned and local values with a
//! sub-millisecond component are written with all nine digits so they survive
//! a round trip; the UTC family is millisecond precision by contract.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Timelike, Utc};

use super::error::CodecError;

const LOCAL_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const LOCAL_NANOS: &str = "%Y-%m-%dT%H:%M:%S%.9f";

fn has_sub_millis(nanos: u32) -> bool {
    nanos % 1_000_000 != 0
}

/// Format a zoned date-time with its explicit offset
#[must_use]
pub fn format_zoned(value: &DateTime<FixedOffset>) -> String {
    let precision = if has_sub_millis(value.nanosecond()) {
        SecondsFormat::Nanos
    } else {
        SecondsFormat::Millis
    };
    value.to_rfc3339_opts(precision, false)
}

/// Parse a zoned date-time, keeping the offset it was written with
pub fn parse_zoned(raw: &str) -> Result<DateTime<FixedOffset>, CodecError> {
    DateTime::parse_from_rfc3339(raw).map_err(|_| CodecError::timestamp(raw))
}

/// Format a local (zoneless) date-time
#[must_use]
pub fn format_local(value: &NaiveDateTime) -> String {
    let pattern = if has_sub_millis(value.nanosecond()) {
        LOCAL_NANOS
    } else {
        LOCAL_MILLIS
    };
    value.format(pattern).to_string()
}

/// Parse a local date-time; an offset suffix is rejected
pub fn parse_local(raw: &str) -> Result<NaiveDateTime, CodecError> {
    raw.parse::<NaiveDateTime>()
        .map_err(|_| CodecError::timestamp(raw))
}

/// Format a UTC timestamp with a literal `Z` and millisecond precision
#[must_use]
pub fn format_utc(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a UTC timestamp
///
/// Any explicit offset is accepted and normalized to UTC.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, CodecError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| CodecError::timestamp(raw))
}

macro_rules! timestamp_serde {
    ($module:ident, $ty:ty, $format:path, $parse:path, $doc:literal) => {
        #[doc = $doc]
        pub mod $module {
            use serde::{de, Deserialize, Deserializer, Serializer};

            pub fn serialize<S: Serializer>(value: &$ty, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&$format(value))
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$ty, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $parse(&raw).map_err(de::Error::custom)
            }

            /// Same encoding for optional attributes; `null` maps to `None`
            pub mod option {
                use serde::{de, Deserialize, Deserializer, Serializer};

                pub fn serialize<S: Serializer>(
                    value: &Option<$ty>,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    match value {
                        Some(value) => serializer.serialize_some(&$format(value)),
                        None => serializer.serialize_none(),
                    }
                }

                pub fn deserialize<'de, D: Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Option<$ty>, D::Error> {
                    Option::<String>::deserialize(deserializer)?
                        .map(|raw| $parse(&raw).map_err(de::Error::custom))
                        .transpose()
                }
            }
        }
    };
}

timestamp_serde!(
    zoned,
    ::chrono::DateTime<::chrono::FixedOffset>,
    crate::codec::format_zoned,
    crate::codec::parse_zoned,
    "Serde adapter for `DateTime<FixedOffset>` attributes"
);
timestamp_serde!(
    local,
    ::chrono::NaiveDateTime,
    crate::codec::format_local,
    crate::codec::parse_local,
    "Serde adapter for `NaiveDateTime` attributes"
);
timestamp_serde!(
    utc,
    ::chrono::DateTime<::chrono::Utc>,
    crate::codec::format_utc,
    crate::codec::parse_utc,
    "Serde adapter for legacy `DateTime<Utc>` timestamps"
);
