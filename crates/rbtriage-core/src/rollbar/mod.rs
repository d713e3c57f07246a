// SPDX-License-Identifier: Apache-2.0

//! Rollbar REST API integration.
//!
//! - [`client`] - HTTP client and the [`RollbarApi`] seam
//! - [`models`] - item and instance types plus response normalization
//! - [`flexible`] - decoders for string-or-number scalars

pub mod client;
pub mod flexible;
pub mod models;

pub use client::{RollbarApi, RollbarClient, trim_items};
pub use models::{
    Item, ItemCounter, ItemId, ItemInstance, ItemPatch, parse_instances, parse_item,
    parse_item_id, parse_items, parse_top_active_items,
};
