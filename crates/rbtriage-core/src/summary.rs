// SPDX-License-Identifier: Apache-2.0

//! Main-error extraction from occurrence payloads.
//!
//! SDKs put the human-readable error in different places depending on
//! language and version. The resolver walks a fixed list of known paths,
//! first over the `data` envelope and then over the `body`, and returns the
//! first non-empty string it finds.

use serde_json::Value;

/// Returned when no path yields a message.
pub const UNKNOWN: &str = "unknown";

/// Candidate paths, highest priority first.
const ERROR_PATHS: &[&[&str]] = &[
    &["trace", "exception", "description"],
    &["trace", "exception", "message"],
    &["trace_chain", "0", "exception", "description"],
    &["trace_chain", "0", "exception", "message"],
    &["body", "trace_chain", "0", "exception", "description"],
    &["body", "trace_chain", "0", "exception", "message"],
    &["exception", "description"],
    &["exception", "message"],
    &["message", "body"],
    &["message"],
    &["body", "message"],
    &["body"],
];

/// Returns the main error message for an occurrence, or [`UNKNOWN`].
///
/// `data` is searched before `body`. Missing (`null`) blobs never match.
#[must_use]
pub fn main_error(body: &Value, data: &Value) -> String {
    search(data)
        .or_else(|| search(body))
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn search(value: &Value) -> Option<&str> {
    ERROR_PATHS
        .iter()
        .find_map(|path| string_at_path(value, path))
        .or_else(|| value.as_str().filter(|s| !s.is_empty()))
}

/// Follows `path` and returns the leaf if it is a non-empty string.
///
/// Objects are indexed by key (digit segments included); arrays only by
/// all-digit segments. Hitting a scalar before the end fails the path.
fn string_at_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(array_index(segment)?)?,
            _ => return None,
        };
    }
    current.as_str().filter(|s| !s.is_empty())
}

fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
