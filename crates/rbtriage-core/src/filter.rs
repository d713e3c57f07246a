// SPDX-License-Identifier: Apache-2.0

//! Issue filtering and ordering.
//!
//! Filters are optional predicates combined with AND. Text filters compare
//! trimmed values case-insensitively; time and occurrence bounds are
//! inclusive.

use chrono::{DateTime, Utc};

use crate::Result;
use crate::error::TriageError;
use crate::rollbar::Item;

/// Optional criteria an issue must satisfy to be listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilters {
    /// Environment name; empty means any.
    pub environment: String,
    /// Status; empty means any.
    pub status: String,
    /// Earliest accepted last-occurrence time.
    pub since: Option<DateTime<Utc>>,
    /// Latest accepted last-occurrence time.
    pub until: Option<DateTime<Utc>>,
    /// Minimum effective occurrence count.
    pub min_occurrences: Option<u64>,
    /// Maximum effective occurrence count.
    pub max_occurrences: Option<u64>,
}

impl IssueFilters {
    /// Builds filters from raw command-line values and validates them.
    ///
    /// Times accept non-negative unix seconds or RFC 3339; counts accept
    /// unsigned integers. Empty strings mean "not set".
    pub fn parse(
        environment: &str,
        status: &str,
        since: Option<&str>,
        until: Option<&str>,
        min_occurrences: Option<&str>,
        max_occurrences: Option<&str>,
    ) -> Result<Self> {
        let filters = Self {
            environment: environment.trim().to_string(),
            status: status.trim().to_string(),
            since: parse_filter_time(since).map_err(|e| prefixed("--since", e))?,
            until: parse_filter_time(until).map_err(|e| prefixed("--until", e))?,
            min_occurrences: parse_optional_u64(min_occurrences)
                .map_err(|e| prefixed("--min-occurrences", e))?,
            max_occurrences: parse_optional_u64(max_occurrences)
                .map_err(|e| prefixed("--max-occurrences", e))?,
        };
        filters.validate()?;
        Ok(filters)
    }

    /// Rejects inverted ranges.
    pub fn validate(&self) -> Result<()> {
        if let (Some(since), Some(until)) = (self.since, self.until)
            && since > until
        {
            return Err(TriageError::Validation(
                "--since must be before or equal to --until".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_occurrences, self.max_occurrences)
            && min > max
        {
            return Err(TriageError::Validation(
                "--min-occurrences must be <= --max-occurrences".to_string(),
            ));
        }
        Ok(())
    }

    /// True when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environment.trim().is_empty()
            && self.status.trim().is_empty()
            && self.since.is_none()
            && self.until.is_none()
            && self.min_occurrences.is_none()
            && self.max_occurrences.is_none()
    }

    /// Returns whether `item` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        matches_text(&item.environment, &self.environment)
            && matches_text(&item.status, &self.status)
            && self.matches_time(item.last_occurrence_timestamp)
            && self.matches_occurrences(item)
    }

    fn matches_time(&self, timestamp: Option<u64>) -> bool {
        if self.since.is_none() && self.until.is_none() {
            return true;
        }
        // Missing or out-of-range timestamps never fall inside a window.
        let Some(ts) = timestamp.and_then(|ts| i64::try_from(ts).ok()) else {
            return false;
        };
        if let Some(since) = self.since
            && ts < since.timestamp()
        {
            return false;
        }
        if let Some(until) = self.until
            && ts > until.timestamp()
        {
            return false;
        }
        true
    }

    fn matches_occurrences(&self, item: &Item) -> bool {
        let count = item.effective_occurrences().unwrap_or(0);
        self.min_occurrences.is_none_or(|min| count >= min)
            && self.max_occurrences.is_none_or(|max| count <= max)
    }
}

fn matches_text(value: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || value.trim().to_lowercase() == filter.to_lowercase()
}

fn prefixed(flag: &str, err: TriageError) -> TriageError {
    TriageError::Validation(format!("parse {flag}: {err}"))
}

/// Keeps the items matching `filters`, preserving order.
#[must_use]
pub fn filter_items(items: Vec<Item>, filters: &IssueFilters) -> Vec<Item> {
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| filters.matches(item))
        .collect()
}

/// Orders items most recently seen first, then by occurrence count.
///
/// The sort is stable: items equal on both keys keep their input order.
pub fn sort_recent(items: &mut [Item]) {
    items.sort_by(|a, b| {
        let ts = |item: &Item| item.last_occurrence_timestamp.unwrap_or(0);
        let count = |item: &Item| item.effective_occurrences().unwrap_or(0);
        ts(b).cmp(&ts(a)).then_with(|| count(b).cmp(&count(a)))
    });
}

/// Parses a filter bound given as unix seconds or RFC 3339.
pub fn parse_filter_time(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(seconds) = value.parse::<i64>() {
        if seconds < 0 {
            return Err(TriageError::Validation(
                "unix seconds must be non-negative".to_string(),
            ));
        }
        return DateTime::from_timestamp(seconds, 0).map(Some).ok_or_else(|| {
            TriageError::Validation(format!("unix seconds out of range: {seconds}"))
        });
    }

    DateTime::parse_from_rfc3339(value)
        .map(|parsed| Some(parsed.with_timezone(&Utc)))
        .map_err(|e| TriageError::Validation(format!("parse rfc3339: {e}")))
}

/// Parses an optional unsigned count.
pub fn parse_optional_u64(value: Option<&str>) -> Result<Option<u64>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|e| TriageError::Validation(format!("parse uint64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollbar::{ItemCounter, ItemId};

    fn item(id: u64, env: &str, status: &str, ts: Option<u64>, total: Option<u64>) -> Item {
        Item {
            id: ItemId(id),
            counter: ItemCounter(id),
            environment: env.to_string(),
            status: status.to_string(),
            last_occurrence_timestamp: ts,
            total_occurrences: total,
            ..Item::default()
        }
    }

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|item| item.id.0).collect()
    }

    fn at(seconds: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(seconds, 0)
    }

    #[test]
    fn test_no_filters_returns_input_unchanged() {
        let items = vec![item(2, "", "", None, None), item(1, "", "", None, None)];
        let out = filter_items(items.clone(), &IssueFilters::default());
        assert_eq!(out, items);
    }

    #[test]
    fn test_text_filters_trim_and_ignore_case() {
        let items = vec![
            item(1, " Production ", "active", None, None),
            item(2, "staging", "active", None, None),
            item(3, "production", "RESOLVED", None, None),
        ];
        let filters = IssueFilters {
            environment: "  production".to_string(),
            status: "Active ".to_string(),
            ..IssueFilters::default()
        };
        assert_eq!(ids(&filter_items(items, &filters)), vec![1]);
    }

    #[test]
    fn test_time_window_is_inclusive() {
        let items = vec![
            item(1, "", "", Some(100), None),
            item(2, "", "", Some(200), None),
            item(3, "", "", Some(300), None),
        ];
        let filters = IssueFilters {
            since: at(100),
            until: at(200),
            ..IssueFilters::default()
        };
        assert_eq!(ids(&filter_items(items, &filters)), vec![1, 2]);
    }

    #[test]
    fn test_time_window_excludes_missing_and_overflowing_timestamps() {
        let items = vec![
            item(1, "", "", None, None),
            item(2, "", "", Some(u64::MAX), None),
            item(3, "", "", Some(50), None),
        ];
        let filters = IssueFilters {
            since: at(0),
            ..IssueFilters::default()
        };
        assert_eq!(ids(&filter_items(items, &filters)), vec![3]);
    }

    #[test]
    fn test_occurrence_range_uses_effective_count() {
        let mut legacy = item(1, "", "", None, None);
        legacy.occurrences = Some(5);
        let items = vec![
            legacy,
            item(2, "", "", None, Some(50)),
            item(3, "", "", None, None),
        ];
        let filters = IssueFilters {
            min_occurrences: Some(5),
            max_occurrences: Some(10),
            ..IssueFilters::default()
        };
        assert_eq!(ids(&filter_items(items.clone(), &filters)), vec![1]);

        let filters = IssueFilters {
            max_occurrences: Some(0),
            ..IssueFilters::default()
        };
        assert_eq!(ids(&filter_items(items, &filters)), vec![3]);
    }

    #[test]
    fn test_filter_output_is_ordered_subset() {
        let items: Vec<Item> = (1..=6)
            .map(|n| item(n, if n % 2 == 0 { "prod" } else { "dev" }, "", None, None))
            .collect();
        let filters = IssueFilters {
            environment: "prod".to_string(),
            ..IssueFilters::default()
        };
        assert_eq!(ids(&filter_items(items, &filters)), vec![2, 4, 6]);
    }

    #[test]
    fn test_sort_recent_orders_by_time_then_occurrences() {
        let mut items = vec![
            item(1, "", "", Some(100), Some(1)),
            item(2, "", "", Some(300), Some(1)),
            item(3, "", "", None, Some(99)),
            item(4, "", "", Some(100), Some(7)),
            item(5, "", "", Some(100), Some(1)),
        ];
        sort_recent(&mut items);
        assert_eq!(ids(&items), vec![2, 4, 1, 5, 3]);
    }

    #[test]
    fn test_total_occurrences_win_over_legacy() {
        let mut both = item(1, "", "", Some(100), Some(50));
        both.occurrences = Some(5);
        let mut legacy_only = item(2, "", "", Some(100), None);
        legacy_only.occurrences = Some(20);

        let filters = IssueFilters {
            min_occurrences: Some(10),
            ..IssueFilters::default()
        };
        assert_eq!(
            ids(&filter_items(vec![both.clone(), legacy_only.clone()], &filters)),
            vec![1, 2]
        );

        let filters = IssueFilters {
            max_occurrences: Some(10),
            ..IssueFilters::default()
        };
        assert!(filter_items(vec![both.clone()], &filters).is_empty());

        let mut items = vec![legacy_only, both];
        sort_recent(&mut items);
        assert_eq!(ids(&items), vec![1, 2]);
    }

    #[test]
    fn test_parse_filter_time_unix_and_rfc3339() {
        assert_eq!(parse_filter_time(Some("0")).unwrap(), at(0));
        assert_eq!(
            parse_filter_time(Some("2024-01-02T03:04:05+02:00")).unwrap(),
            at(1_704_157_445)
        );
        assert_eq!(parse_filter_time(None).unwrap(), None);
        assert_eq!(parse_filter_time(Some("")).unwrap(), None);
    }

    #[test]
    fn test_parse_filter_time_rejects_bad_input() {
        assert_eq!(
            parse_filter_time(Some("-5")).unwrap_err().to_string(),
            "unix seconds must be non-negative"
        );
        assert!(parse_filter_time(Some("yesterday")).is_err());
    }

    #[test]
    fn test_parse_rejects_inverted_ranges() {
        let err = IssueFilters::parse("", "", Some("200"), Some("100"), None, None).unwrap_err();
        assert_eq!(err.to_string(), "--since must be before or equal to --until");

        let err = IssueFilters::parse("", "", None, None, Some("9"), Some("3")).unwrap_err();
        assert_eq!(err.to_string(), "--min-occurrences must be <= --max-occurrences");
    }

    #[test]
    fn test_parse_prefixes_flag_name() {
        let err = IssueFilters::parse("", "", None, None, Some("many"), None).unwrap_err();
        assert!(err.to_string().starts_with("parse --min-occurrences: parse uint64"));
    }

    #[test]
    fn test_parse_accepts_equal_bounds() {
        let filters =
            IssueFilters::parse("prod", "", Some("100"), Some("100"), Some("2"), Some("2")).unwrap();
        assert_eq!(filters.environment, "prod");
        assert_eq!(filters.min_occurrences, Some(2));
        assert!(!filters.is_empty());
    }
}
