//! Text encoding for stored timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC with a fixed nanosecond fraction,
//! so the lexical order of the encoded text matches chronological order. That
//! property is what lets the store sort on `created_at` without decoding.
//!
//! Reads are lenient: any RFC 3339 offset is accepted and converted to UTC, and
//! naive ISO-8601 timestamps (no offset) are taken as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Encodes a timestamp in the canonical stored form.
pub fn encode(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Decodes a stored timestamp.
///
/// # Errors
///
/// Returns the RFC 3339 parse error if the text is neither RFC 3339 nor a
/// naive ISO-8601 date-time.
pub fn decode(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(err) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| err),
    }
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    decode(&text).map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{text}': {e}")))
}

/// Same encoding for `Option<DateTime<Utc>>` fields; `None` is written as null.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_some(&super::encode(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => super::decode(&text).map(Some).map_err(|e| {
                serde::de::Error::custom(format!("invalid timestamp '{text}': {e}"))
            }),
            None => Ok(None),
        }
    }
}
