// SPDX-License-Identifier: Apache-2.0

//! Text and time formatting helpers shared by renderers.

use chrono::{DateTime, SecondsFormat};

/// Placeholder for values that are missing or cannot be shown.
pub const UNKNOWN_VALUE: &str = "unknown";

/// Truncates text to a maximum length with a custom suffix.
///
/// Uses character count (not byte count) to safely handle multi-byte UTF-8.
///
/// # Examples
///
/// ```
/// use rbtriage_core::utils::truncate_with_suffix;
///
/// assert_eq!(truncate_with_suffix("NullPointerException", 8, ".."), "NullPo..");
/// assert_eq!(truncate_with_suffix("short", 8, ".."), "short");
/// ```
#[must_use]
pub fn truncate_with_suffix(text: &str, max_len: usize, suffix: &str) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(suffix.chars().count());
    let truncated: String = text.chars().take(keep).collect();
    format!("{truncated}{suffix}")
}

/// Truncates text to a maximum length with the suffix "...".
#[must_use]
pub fn truncate(text: &str, max_len: usize) -> String {
    truncate_with_suffix(text, max_len, "...")
}

/// Returns the trimmed value, or `"unknown"` when it is blank.
#[must_use]
pub fn fallback(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN_VALUE
    } else {
        trimmed
    }
}

/// Formats unix seconds as RFC 3339 UTC.
///
/// Missing and unrepresentable timestamps render as `"unknown"`.
///
/// # Examples
///
/// ```
/// use rbtriage_core::utils::format_timestamp;
///
/// assert_eq!(format_timestamp(Some(1_700_000_000)), "2023-11-14T22:13:20Z");
/// assert_eq!(format_timestamp(None), "unknown");
/// ```
#[must_use]
pub fn format_timestamp(seconds: Option<u64>) -> String {
    seconds
        .and_then(|s| i64::try_from(s).ok())
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map_or_else(
            || UNKNOWN_VALUE.to_string(),
            |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
}

/// Formats an optional count, `"unknown"` when absent.
#[must_use]
pub fn format_count(count: Option<u64>) -> String {
    count.map_or_else(|| UNKNOWN_VALUE.to_string(), |c| c.to_string())
}
