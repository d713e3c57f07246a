// SPDX-License-Identifier: Apache-2.0

//! Triage operations built on top of a [`RollbarApi`].
//!
//! Every public operation runs under one overall deadline. Errors carry an
//! operation prefix (`get item: ...`) added with `anyhow` context.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::TriageError;
use crate::filter::{IssueFilters, filter_items, sort_recent};
use crate::rollbar::{Item, ItemCounter, ItemId, ItemInstance, ItemPatch, RollbarApi, trim_items};
use crate::summary::{UNKNOWN, main_error};

/// Longest accepted `resolved_in_version`.
pub const MAX_RESOLVED_VERSION_LEN: usize = 40;

/// List projection of an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSummary {
    /// Internal identifier.
    pub item_id: ItemId,
    /// Human-facing counter.
    pub counter: ItemCounter,
    /// Item title.
    pub title: String,
    /// Item status.
    pub status: String,
    /// Environment.
    pub environment: String,
    /// Unix seconds of the most recent occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_occurrence_timestamp: Option<u64>,
    /// Effective occurrence count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<u64>,
    /// Raw item payload.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl From<Item> for IssueSummary {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.id,
            counter: item.counter,
            occurrences: item.effective_occurrences(),
            last_occurrence_timestamp: item.last_occurrence_timestamp,
            title: item.title,
            status: item.status,
            environment: item.environment,
            raw: item.raw,
        }
    }
}

/// Full view of a single item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueDetail {
    /// Summary of the item.
    pub issue: IssueSummary,
    /// Best human-readable error message.
    pub main_error: String,
    /// Raw item payload as returned by the API.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub item_raw: Value,
    /// Most recent occurrence, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<ItemInstance>,
    /// Raw payload of the most recent occurrence.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub instance_raw: Value,
}

/// Outcome of a mutating action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemActionResult {
    /// `resolved`, `reopened` or `muted`.
    pub action: String,
    /// The item as re-fetched after the update.
    pub issue: IssueSummary,
}

/// Issue triage service.
pub struct TriageService<A> {
    api: A,
    deadline: Duration,
}

impl<A: RollbarApi> TriageService<A> {
    /// Wraps `api`, bounding each operation by `deadline`.
    pub fn new(api: A, deadline: Duration) -> Self {
        Self { api, deadline }
    }

    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.deadline, operation).await {
            Ok(result) => result,
            Err(_) => Err(TriageError::Timeout {
                seconds: self.deadline.as_secs(),
            }
            .into()),
        }
    }

    /// Lists the top active items, filtered, in API order.
    ///
    /// `limit` is applied by the listing before filters run.
    #[instrument(skip(self, filters))]
    pub async fn active(&self, limit: i64, filters: &IssueFilters) -> Result<Vec<IssueSummary>> {
        self.bounded(async {
            let items = self
                .api
                .list_active_items(limit)
                .await
                .context("list active items")?;
            let items = filter_items(items, filters);
            debug!(count = items.len(), "Active items after filters");
            Ok(items.into_iter().map(IssueSummary::from).collect())
        })
        .await
    }

    /// Lists active items, filtered, most recently seen first.
    #[instrument(skip(self, filters))]
    pub async fn recent(&self, limit: i64, filters: &IssueFilters) -> Result<Vec<IssueSummary>> {
        self.bounded(async {
            let items = self
                .api
                .list_items("active", 1)
                .await
                .context("list recent items")?;
            let mut items = filter_items(items, filters);
            sort_recent(&mut items);
            let items = trim_items(items, limit);
            debug!(count = items.len(), "Recent items after filters");
            Ok(items.into_iter().map(IssueSummary::from).collect())
        })
        .await
    }

    /// Fetches an item and its latest occurrence and extracts the main error.
    #[instrument(skip(self), fields(counter = %counter))]
    pub async fn show(&self, counter: ItemCounter) -> Result<IssueDetail> {
        self.bounded(async {
            let id = self.resolve_id(counter).await?;

            let (item, instance) = tokio::try_join!(
                async { self.api.get_item(id).await.context("get item") },
                async {
                    self.api
                        .latest_instance(id)
                        .await
                        .context("get latest instance")
                },
            )?;

            let mut message = instance
                .as_ref()
                .map_or_else(|| UNKNOWN.to_string(), |i| main_error(&i.body, &i.data));
            if message == UNKNOWN && !item.title.trim().is_empty() {
                message.clone_from(&item.title);
            }

            let instance_raw = instance
                .as_ref()
                .map_or(Value::Null, |i| i.raw.clone());
            let item_raw = item.raw.clone();

            Ok(IssueDetail {
                issue: IssueSummary::from(item),
                main_error: message,
                item_raw,
                instance,
                instance_raw,
            })
        })
        .await
    }

    /// Marks an item resolved, optionally in a specific version.
    pub async fn resolve(
        &self,
        counter: ItemCounter,
        resolved_in_version: &str,
    ) -> Result<ItemActionResult> {
        let version = resolved_in_version.trim();
        if version.chars().count() > MAX_RESOLVED_VERSION_LEN {
            return Err(TriageError::Validation(format!(
                "resolved_in_version must be <= {MAX_RESOLVED_VERSION_LEN} characters"
            ))
            .into());
        }

        let patch = ItemPatch {
            status: "resolved".to_string(),
            resolved_in_version: version.to_string(),
            ..ItemPatch::default()
        };
        self.update_and_fetch(counter, patch, "resolved").await
    }

    /// Reactivates an item.
    pub async fn reopen(&self, counter: ItemCounter) -> Result<ItemActionResult> {
        let patch = ItemPatch {
            status: "active".to_string(),
            ..ItemPatch::default()
        };
        self.update_and_fetch(counter, patch, "reopened").await
    }

    /// Mutes an item, for `duration_seconds` when given.
    pub async fn mute(
        &self,
        counter: ItemCounter,
        duration_seconds: Option<u64>,
    ) -> Result<ItemActionResult> {
        let expiration = duration_seconds
            .map(i64::try_from)
            .transpose()
            .map_err(|_| TriageError::Validation("mute duration is too large".to_string()))?;

        let patch = ItemPatch {
            status: "muted".to_string(),
            snooze_enabled: Some(true),
            snooze_expiration_in_seconds: expiration,
            ..ItemPatch::default()
        };
        self.update_and_fetch(counter, patch, "muted").await
    }

    async fn resolve_id(&self, counter: ItemCounter) -> Result<ItemId> {
        self.api
            .resolve_item_id(counter)
            .await
            .context("resolve item id")
    }

    #[instrument(skip(self, patch), fields(counter = %counter))]
    async fn update_and_fetch(
        &self,
        counter: ItemCounter,
        patch: ItemPatch,
        action: &str,
    ) -> Result<ItemActionResult> {
        self.bounded(async {
            let id = self.resolve_id(counter).await?;
            self.api
                .update_item(id, &patch)
                .await
                .context("update item")?;
            let item = self.api.get_item(id).await.context("get item")?;

            Ok(ItemActionResult {
                action: action.to_string(),
                issue: IssueSummary::from(item),
            })
        })
        .await
    }
}
