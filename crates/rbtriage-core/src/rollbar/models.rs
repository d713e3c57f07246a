// SPDX-License-Identifier: Apache-2.0

//! Rollbar data types and response normalization.
//!
//! List endpoints answer either with a bare JSON array or with an object
//! wrapping the array (`{"items": [...]}`, `{"instances": [...]}`). The
//! `parse_*` functions try both shapes independently and hydrate every
//! record so the rest of the crate only sees one form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::flexible;
use crate::error::TriageError;

/// Stable, human-facing item number, unique within a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemCounter(pub u64);

impl fmt::Display for ItemCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemCounter {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        flexible::parse_digits(s)
            .map(ItemCounter)
            .map_err(|e| TriageError::Validation(format!("parse item counter: {e}")))
    }
}

impl<'de> Deserialize<'de> for ItemCounter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        flexible::u64_or_string(deserializer).map(ItemCounter)
    }
}

/// Internal item identifier, resolved from an [`ItemCounter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        flexible::u64_or_string(deserializer).map(ItemId)
    }
}

/// A Rollbar item (an issue / error group).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Internal identifier.
    #[serde(default)]
    pub id: ItemId,
    /// Owning project.
    #[serde(default)]
    pub project_id: u64,
    /// Human-facing counter.
    #[serde(default)]
    pub counter: ItemCounter,
    /// Item title.
    #[serde(default)]
    pub title: String,
    /// Status (`active`, `resolved`, `muted`, ...).
    #[serde(default)]
    pub status: String,
    /// Environment the item was reported from.
    #[serde(default)]
    pub environment: String,
    /// Severity level name.
    #[serde(default, deserialize_with = "flexible::level")]
    pub level: String,
    /// Identifier of the most recent occurrence.
    #[serde(default)]
    pub last_occurrence_id: Option<u64>,
    /// Unix seconds of the most recent occurrence.
    #[serde(default)]
    pub last_occurrence_timestamp: Option<u64>,
    /// Legacy occurrence count.
    #[serde(default)]
    pub occurrences: Option<u64>,
    /// Total occurrence count; preferred over `occurrences`.
    #[serde(default)]
    pub total_occurrences: Option<u64>,
    /// Raw payload kept for JSON passthrough.
    #[serde(skip)]
    pub raw: Value,
}

impl Item {
    /// Occurrence count used for display, filtering and sorting.
    ///
    /// `total_occurrences` wins over the legacy `occurrences` field.
    #[must_use]
    pub fn effective_occurrences(&self) -> Option<u64> {
        self.total_occurrences.or(self.occurrences)
    }

    /// Fills derived fields and captures the normalized record as raw JSON.
    #[must_use]
    pub fn hydrate(mut self, default_status: Option<&str>) -> Self {
        if let Some(status) = default_status
            && self.status.is_empty()
        {
            self.status = status.to_string();
        }
        if self.total_occurrences.is_none() {
            self.total_occurrences = self.occurrences;
        }
        self.raw = serde_json::to_value(&self).unwrap_or(Value::Null);
        self
    }
}

/// A single occurrence of an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Instance identifier.
    #[serde(default, deserialize_with = "flexible::u64_or_string")]
    pub id: u64,
    /// Unix seconds when the occurrence was recorded.
    #[serde(default)]
    pub timestamp: Option<u64>,
    /// Free-form error body; schema varies by SDK.
    #[serde(default)]
    pub body: Value,
    /// Free-form event data; schema varies by SDK.
    #[serde(default)]
    pub data: Value,
    /// Raw payload kept for JSON passthrough.
    #[serde(skip)]
    pub raw: Value,
}

impl ItemInstance {
    /// Captures the normalized record as raw JSON.
    #[must_use]
    pub fn hydrate(mut self) -> Self {
        self.raw = serde_json::to_value(&self).unwrap_or(Value::Null);
        self
    }
}

/// Body of an item PATCH request. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemPatch {
    /// New status.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Version the item was resolved in.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resolved_in_version: String,
    /// Whether snoozing is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_enabled: Option<bool>,
    /// Snooze duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_expiration_in_seconds: Option<i64>,
}

/// Result of the counter-to-id lookup.
///
/// Some API versions answer with a redirect-like `{"itemId": ...}`, others
/// with the item itself (`{"id": ...}`).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ItemByCounterResult {
    #[serde(default)]
    id: ItemId,
    #[serde(default, rename = "itemId")]
    item_id: ItemId,
}

impl ItemByCounterResult {
    /// Prefers a non-zero `itemId`, then a non-zero `id`.
    pub(crate) fn resolved_id(&self) -> Result<ItemId, TriageError> {
        if self.item_id.0 != 0 {
            return Ok(self.item_id);
        }
        if self.id.0 != 0 {
            return Ok(self.id);
        }
        Err(TriageError::decode("resolve item_id", "missing id"))
    }
}

#[derive(Deserialize)]
struct ItemsEnvelope {
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct InstancesEnvelope {
    instances: Vec<ItemInstance>,
}

#[derive(Deserialize)]
struct TopActiveItem {
    item: Item,
}

/// Decodes the item id out of an `item_by_counter` result.
pub fn parse_item_id(result: &Value) -> Result<ItemId, TriageError> {
    let lookup = ItemByCounterResult::deserialize(result)
        .map_err(|e| TriageError::decode("decode item_by_counter result", e))?;
    lookup.resolved_id()
}

/// Normalizes an item list from either a bare array or `{"items": [...]}`.
pub fn parse_items(result: &Value) -> Result<Vec<Item>, TriageError> {
    let items = match Vec::<Item>::deserialize(result) {
        Ok(list) => list,
        Err(_) => {
            ItemsEnvelope::deserialize(result)
                .map_err(|e| TriageError::decode("decode wrapped items", e))?
                .items
        }
    };
    Ok(items.into_iter().map(|item| item.hydrate(None)).collect())
}

/// Normalizes the top-active-items report.
///
/// The report wraps each record as `{"item": {...}}`; records without a
/// status are active by definition. Lists that are not in the wrapped shape
/// fall back to the plain item shapes. A malformed wrapped record fails the
/// whole list.
pub fn parse_top_active_items(result: &Value) -> Result<Vec<Item>, TriageError> {
    if !is_wrapped_report(result) {
        return parse_items(result);
    }
    let wrapped = Vec::<TopActiveItem>::deserialize(result)
        .map_err(|e| TriageError::decode("decode top active items", e))?;
    Ok(wrapped
        .into_iter()
        .map(|entry| entry.item.hydrate(Some("active")))
        .collect())
}

fn is_wrapped_report(result: &Value) -> bool {
    result
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .is_some_and(|entry| entry.contains_key("item"))
}

/// Normalizes an instance list from either a bare array or `{"instances": [...]}`.
pub fn parse_instances(result: &Value) -> Result<Vec<ItemInstance>, TriageError> {
    let instances = match Vec::<ItemInstance>::deserialize(result) {
        Ok(list) => list,
        Err(_) => {
            InstancesEnvelope::deserialize(result)
                .map_err(|e| TriageError::decode("decode wrapped instances", e))?
                .instances
        }
    };
    Ok(instances.into_iter().map(ItemInstance::hydrate).collect())
}

/// Decodes a single item and keeps the untouched result as its raw payload.
pub fn parse_item(result: &Value) -> Result<Item, TriageError> {
    let mut item =
        Item::deserialize(result).map_err(|e| TriageError::decode("decode item response", e))?;
    item.raw = result.clone();
    Ok(item)
}
