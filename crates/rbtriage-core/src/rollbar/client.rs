// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the Rollbar REST API.
//!
//! Every response is wrapped in an `{"err", "result", "message"}` envelope.
//! [`RollbarClient`] unwraps it, maps failures onto [`TriageError`] and masks
//! the access token in anything it reports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::models::{
    Item, ItemCounter, ItemId, ItemInstance, ItemPatch, parse_instances, parse_item,
    parse_item_id, parse_items, parse_top_active_items,
};
use crate::Result;
use crate::config::ApiConfig;
use crate::error::TriageError;
use crate::redact::redact_str;

/// Fallback when the API reports an error without a message.
const UNKNOWN_API_ERROR: &str = "unknown error from Rollbar";

/// Number of body bytes kept from a non-success response.
const STATUS_BODY_LIMIT: usize = 2048;

/// Read and write operations the triage service needs from Rollbar.
#[async_trait]
pub trait RollbarApi: Send + Sync {
    /// Maps a project-scoped counter to the internal item id.
    async fn resolve_item_id(&self, counter: ItemCounter) -> Result<ItemId>;

    /// Fetches a single item.
    async fn get_item(&self, id: ItemId) -> Result<Item>;

    /// Applies a partial update to an item.
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<()>;

    /// Fetches the most recent occurrence, if the item has any.
    async fn latest_instance(&self, id: ItemId) -> Result<Option<ItemInstance>>;

    /// Lists the top active items, truncated to `limit` (`<= 0` is unlimited).
    async fn list_active_items(&self, limit: i64) -> Result<Vec<Item>>;

    /// Lists one page of items with the given status.
    async fn list_items(&self, status: &str, page: u32) -> Result<Vec<Item>>;
}

#[derive(Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    err: i64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Rollbar API client authenticated with a project access token.
pub struct RollbarClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl std::fmt::Debug for RollbarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollbarClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RollbarClient {
    /// Creates a client for the API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Validation` if the token is blank.
    pub fn new(access_token: SecretString, config: &ApiConfig) -> Result<Self> {
        if access_token.expose_secret().trim().is_empty() {
            return Err(TriageError::Validation(
                "rollbar access token is required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("rbtriage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| TriageError::Network {
                operation: "build http client".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header("X-Rollbar-Access-Token", self.access_token.expose_secret())
    }

    fn redact(&self, text: &str) -> String {
        redact_str(text, self.access_token.expose_secret())
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder, operation: &str) -> Result<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|source| TriageError::Network {
                operation: operation.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped(response, STATUS_BODY_LIMIT).await;
            let text = String::from_utf8_lossy(&body);
            return Err(TriageError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body: self.redact(text.trim()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TriageError::Network {
                operation: operation.to_string(),
                source,
            })?;

        debug!(operation, bytes = body.len(), "Received response");
        Ok(body.to_vec())
    }

    /// Decodes the envelope and checks its `err` flag.
    fn open_envelope(&self, body: &[u8], operation: &str) -> Result<ApiEnvelope> {
        let envelope: ApiEnvelope = serde_json::from_slice(body)
            .map_err(|e| TriageError::decode(format!("decode {operation} envelope"), e))?;

        if envelope.err != 0 {
            let message = envelope
                .message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_API_ERROR);
            return Err(TriageError::Api {
                operation: operation.to_string(),
                message: self.redact(message),
            });
        }

        Ok(envelope)
    }

    /// Performs a GET and returns the envelope's non-null `result`.
    async fn get_result(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> Result<Value> {
        let request = self.request(Method::GET, path).query(query);
        let body = self.execute(request, operation).await?;

        match self.open_envelope(&body, operation)?.result {
            Some(result) if !result.is_null() => Ok(result),
            _ => Err(TriageError::decode(
                format!("{operation} response"),
                "missing result",
            )),
        }
    }
}

#[async_trait]
impl RollbarApi for RollbarClient {
    #[instrument(skip(self), fields(counter = %counter))]
    async fn resolve_item_id(&self, counter: ItemCounter) -> Result<ItemId> {
        let result = self
            .get_result(&format!("/item_by_counter/{counter}"), &[], "item_by_counter")
            .await?;
        let id = parse_item_id(&result)?;
        debug!(item_id = %id, "Resolved item id");
        Ok(id)
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn get_item(&self, id: ItemId) -> Result<Item> {
        let result = self.get_result(&format!("/item/{id}/"), &[], "item").await?;
        parse_item(&result)
    }

    #[instrument(skip(self, patch), fields(item_id = %id))]
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<()> {
        let request = self.request(Method::PATCH, &format!("/item/{id}")).json(patch);
        let body = self.execute(request, "update item").await?;
        self.open_envelope(&body, "update item")?;
        debug!("Item updated");
        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn latest_instance(&self, id: ItemId) -> Result<Option<ItemInstance>> {
        let result = self
            .get_result(
                &format!("/item/{id}/instances"),
                &[("per_page", "1".to_string())],
                "item instances",
            )
            .await?;
        let mut instances = parse_instances(&result)
            .map_err(|e| TriageError::decode("decode instances response", e))?;
        debug!(count = instances.len(), "Decoded instances");
        Ok(instances.pop())
    }

    #[instrument(skip(self))]
    async fn list_active_items(&self, limit: i64) -> Result<Vec<Item>> {
        let result = self
            .get_result("/reports/top_active_items", &[], "top active items")
            .await?;
        let items = parse_top_active_items(&result)
            .map_err(|e| TriageError::decode("decode top active items", e))?;
        debug!(count = items.len(), "Decoded top active items");
        Ok(trim_items(items, limit))
    }

    #[instrument(skip(self))]
    async fn list_items(&self, status: &str, page: u32) -> Result<Vec<Item>> {
        let mut query = Vec::new();
        if !status.is_empty() {
            query.push(("status", status.to_string()));
        }
        if page > 0 {
            query.push(("page", page.to_string()));
        }

        let result = self.get_result("/items", &query, "items").await?;
        let items =
            parse_items(&result).map_err(|e| TriageError::decode("decode items response", e))?;
        debug!(count = items.len(), "Decoded items");
        Ok(items)
    }
}

/// Keeps the first `limit` items; `limit <= 0` keeps everything.
#[must_use]
pub fn trim_items(mut items: Vec<Item>, limit: i64) -> Vec<Item> {
    if let Ok(limit) = usize::try_from(limit)
        && limit > 0
    {
        items.truncate(limit);
    }
    items
}

/// Reads at most `limit` bytes of an error body. A body that fails
/// midway keeps what arrived.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Vec<u8> {
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Error body read stopped: {e}");
                break;
            }
        }
    }
    body
}
