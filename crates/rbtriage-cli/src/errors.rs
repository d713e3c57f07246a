// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `TriageError` and appends a hint for the
//! error kinds a user can act on. The message always keeps the full context
//! chain (`get item: rollbar item: ...`).

use anyhow::Error;
use rbtriage_core::TriageError;

/// Formats an error for CLI display with helpful hints.
pub fn format_error(error: &Error) -> String {
    let message = format!("{error:#}");

    let hint = error.downcast_ref::<TriageError>().and_then(hint_for);
    match hint {
        Some(hint) => format!("{message}\n\nTip: {hint}"),
        None => message,
    }
}

fn hint_for(error: &TriageError) -> Option<String> {
    match error {
        TriageError::NotAuthenticated | TriageError::ProjectNotConfigured { .. } => Some(
            "add a project with `rbtriage project add <name> --token <token>`.".to_string(),
        ),
        TriageError::NoProjects | TriageError::ProjectNotFound { .. } => {
            Some("list configured projects with `rbtriage project list`.".to_string())
        }
        TriageError::Status { status: 401 | 403, .. } => Some(
            "check that the access token is valid and has read scope for this project.".to_string(),
        ),
        TriageError::Network { .. } => {
            Some("check your internet connection and try again.".to_string())
        }
        TriageError::Timeout { .. } => Some(
            "raise the deadline with RBTRIAGE_API__TIMEOUT_SECONDS if the API is slow.".to_string(),
        ),
        TriageError::Config { .. } => Some(
            rbtriage_core::config_file_path().map_or_else(
                |_| "check your config file.".to_string(),
                |path| format!("check your config file at {}", path.display()),
            ),
        ),
        TriageError::Status { .. }
        | TriageError::Api { .. }
        | TriageError::Decode { .. }
        | TriageError::Validation(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_format_not_authenticated_has_tip() {
        let err = anyhow::Error::new(TriageError::NotAuthenticated);
        let formatted = format_error(&err);

        assert!(formatted.starts_with("no token available"));
        assert!(formatted.contains("Tip: add a project"));
    }

    #[test]
    fn test_format_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(TriageError::Api {
            operation: "item".to_string(),
            message: "Not found".to_string(),
        })
        .context("get item");

        assert_eq!(format_error(&err.unwrap_err()), "get item: rollbar item: Not found");
    }

    #[test]
    fn test_format_unauthorized_status() {
        let err = anyhow::Error::new(TriageError::Status {
            operation: "items".to_string(),
            status: 401,
            body: "invalid token".to_string(),
        });
        assert!(format_error(&err).contains("Tip: check that the access token"));
    }

    #[test]
    fn test_format_plain_error() {
        let err = anyhow::anyhow!("something broke");
        assert_eq!(format_error(&err), "something broke");
    }
}
