// SPDX-License-Identifier: Apache-2.0

//! Decoders for scalars whose JSON type is not fixed across API versions.
//!
//! Identifiers may arrive as `123` or `"123"`; severity levels may arrive as
//! `"error"` or as the numeric code `40`. Both decode `null` to an empty
//! value instead of failing.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Number;

/// A raw scalar token that is either a JSON string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(Number),
}

/// Maps a numeric severity code to its name.
///
/// Returns `None` for codes outside the known set.
#[must_use]
pub fn level_name(code: i64) -> Option<&'static str> {
    match code {
        10 => Some("debug"),
        20 => Some("info"),
        30 => Some("warning"),
        40 => Some("error"),
        50 => Some("critical"),
        _ => None,
    }
}

/// Parses a string made only of ASCII decimal digits into a `u64`.
pub(crate) fn parse_digits(value: &str) -> Result<u64, String> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("parse string uint64: invalid digits {value:?}"));
    }
    value
        .parse::<u64>()
        .map_err(|e| format!("parse string uint64: {e}"))
}

/// Deserializes a `u64` that may be encoded as a number, a digit string or `null`.
pub fn u64_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Scalar::Text(text)) => parse_digits(&text).map_err(de::Error::custom),
        Some(Scalar::Number(number)) => number
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("decode uint64: {number} is not unsigned"))),
    }
}

/// Deserializes a severity level from a name, a numeric code or `null`.
///
/// Unknown integer codes degrade to their decimal text; only fractional
/// numbers are rejected.
pub fn level<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(String::new()),
        Some(Scalar::Text(text)) => Ok(text),
        Some(Scalar::Number(number)) => {
            if let Some(code) = number.as_i64() {
                Ok(level_name(code).map_or_else(|| code.to_string(), str::to_string))
            } else if let Some(code) = number.as_u64() {
                Ok(code.to_string())
            } else {
                Err(de::Error::custom(format!(
                    "decode level: {number} is not an integer"
                )))
            }
        }
    }
}
