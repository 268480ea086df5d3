//! Wall-clock time representation helpers.
//!
//! Lecture start/end times are persisted and transported as `HH:MM` strings.
//! This module provides the parsing helper and a serde adapter used by every
//! wire-facing type carrying a time of day.

use chrono::NaiveTime;

/// Format used for lecture start/end times on the wire and in storage.
pub const HHMM_FORMAT: &str = "%H:%M";

/// Parse a `HH:MM` string into a `NaiveTime`.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, HHMM_FORMAT)
}

/// Render a `NaiveTime` as `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format(HHMM_FORMAT).to_string()
}

/// Serde adapter serializing `NaiveTime` as a `HH:MM` string.
///
/// Usage: `#[serde(with = "crate::models::time::hhmm")]`.
pub mod hhmm {
    use super::{format_hhmm, parse_hhmm};
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}
