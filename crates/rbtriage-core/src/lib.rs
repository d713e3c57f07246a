// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # rbtriage Core
//!
//! Core library for rbtriage - command-line triage of Rollbar issues.
//!
//! This crate provides reusable components for:
//! - Tolerant decoding of Rollbar API responses
//! - Main-error extraction from occurrence payloads
//! - Issue filtering and ordering
//! - Secret redaction
//! - The project token store and layered configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use rbtriage_core::{IssueFilters, RollbarClient, TriageService, load_config};
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config()?;
//! let client = RollbarClient::new(SecretString::from("project-read-token"), &config.api)?;
//! let service = TriageService::new(client, Duration::from_secs(config.api.timeout_seconds));
//!
//! for issue in service.recent(10, &IssueFilters::default()).await? {
//!     println!("#{} {}", issue.counter, issue.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`rollbar`] - API client, data types and response normalization
//! - [`summary`] - Main-error extraction
//! - [`filter`] - Issue filters and recent ordering
//! - [`redact`] - Secret masking
//! - [`service`] - Triage operations
//! - [`projects`] - Project token store
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types

// ============================================================================
// Authentication
// ============================================================================

pub use auth::TokenProvider;

// ============================================================================
// Error Handling
// ============================================================================

pub use error::TriageError;

/// Convenience Result type for rbtriage operations.
///
/// This is equivalent to `std::result::Result<T, TriageError>`.
pub type Result<T> = std::result::Result<T, TriageError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    ApiConfig, AppConfig, OutputConfig, UiConfig, config_dir, config_file_path, load_config,
    projects_file_path,
};

// ============================================================================
// Rollbar API
// ============================================================================

pub use rollbar::{
    Item, ItemCounter, ItemId, ItemInstance, ItemPatch, RollbarApi, RollbarClient,
};

// ============================================================================
// Triage
// ============================================================================

pub use filter::IssueFilters;
pub use redact::{redact_str, redact_value};
pub use service::{IssueDetail, IssueSummary, ItemActionResult, TriageService};
pub use summary::main_error;

// ============================================================================
// Project Store
// ============================================================================

pub use projects::{Project, ProjectStore, ProjectsFile};

// ============================================================================
// Modules
// ============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod projects;
pub mod redact;
pub mod rollbar;
pub mod service;
pub mod summary;
pub mod utils;
