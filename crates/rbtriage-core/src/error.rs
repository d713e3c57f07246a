// SPDX-License-Identifier: Apache-2.0

//! Error types for rbtriage.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Service and CLI code wrap these in `anyhow::Error` with operation context,
//! so callers can still downcast to [`TriageError`] for hints.

use thiserror::Error;

/// Errors that can occur during rbtriage operations.
#[derive(Error, Debug)]
pub enum TriageError {
    /// Network failure while talking to the Rollbar API.
    #[error("request {operation}: {source}")]
    Network {
        /// Operation that was being performed (e.g. `item_by_counter`).
        operation: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with an HTTP status outside `[200, 300)`.
    #[error("{operation} returned non-success status: status {status}: {body}")]
    Status {
        /// Operation that was being performed.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// The API envelope carried a non-zero `err`.
    #[error("rollbar {operation}: {message}")]
    Api {
        /// Operation that was being performed.
        operation: String,
        /// Message reported by the API.
        message: String,
    },

    /// A response did not have the expected JSON shape.
    #[error("{context}: {message}")]
    Decode {
        /// What was being decoded (e.g. `decode items response`).
        context: String,
        /// Decoder error message.
        message: String,
    },

    /// Bad user input, rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Configuration or local project store error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// A named project is not present in the project store.
    #[error("project \"{name}\" not found")]
    ProjectNotFound {
        /// Requested project name.
        name: String,
    },

    /// The project store holds no projects.
    #[error("no configured projects")]
    NoProjects,

    /// An explicitly requested project has no token and no fallback exists.
    #[error("project \"{project}\" not configured and ROLLBAR_ACCESS_TOKEN is missing")]
    ProjectNotConfigured {
        /// Requested project name.
        project: String,
    },

    /// No access token could be resolved from any source.
    #[error(
        "no token available: add a project via `rbtriage project add ...` or set ROLLBAR_ACCESS_TOKEN"
    )]
    NotAuthenticated,

    /// The overall command deadline elapsed.
    #[error("operation timed out after {seconds}s")]
    Timeout {
        /// Deadline in seconds.
        seconds: u64,
    },
}

impl TriageError {
    /// Builds a decode error from any displayable decoder failure.
    pub fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        TriageError::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for TriageError {
    fn from(err: config::ConfigError) -> Self {
        TriageError::Config {
            message: err.to_string(),
        }
    }
}
