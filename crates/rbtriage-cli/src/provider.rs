// SPDX-License-Identifier: Apache-2.0

//! CLI-specific `TokenProvider` implementation.
//!
//! Resolves the Rollbar access token from, in order: the `--token` flag, the
//! project store (`--project` or the active project) and the
//! `ROLLBAR_ACCESS_TOKEN` environment variable.

use rbtriage_core::{ProjectStore, TokenProvider, TriageError};
use secrecy::SecretString;
use tracing::debug;

/// Environment variable consulted when no other source has a token.
pub const TOKEN_ENV_VAR: &str = "ROLLBAR_ACCESS_TOKEN";

/// CLI implementation of `TokenProvider`.
pub struct CliTokenProvider {
    explicit: Option<String>,
    project: Option<String>,
    store: Option<ProjectStore>,
    env_token: Option<String>,
}

impl CliTokenProvider {
    /// Builds a provider over explicit sources.
    pub fn new(
        explicit: Option<String>,
        project: Option<String>,
        store: Option<ProjectStore>,
        env_token: Option<String>,
    ) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            explicit: non_blank(explicit),
            project: non_blank(project),
            store,
            env_token: non_blank(env_token),
        }
    }

    /// Builds a provider over the default project store and the process environment.
    pub fn from_env(explicit: Option<String>, project: Option<String>) -> Self {
        let store = ProjectStore::open()
            .inspect_err(|e| debug!("Project store unavailable: {e:#}"))
            .ok();
        Self::new(explicit, project, store, std::env::var(TOKEN_ENV_VAR).ok())
    }
}

impl TokenProvider for CliTokenProvider {
    fn rollbar_token(&self) -> rbtriage_core::Result<SecretString> {
        if let Some(token) = &self.explicit {
            debug!("Using access token from --token");
            return Ok(SecretString::from(token.clone()));
        }

        if let Some(store) = &self.store {
            match store.resolve_token(self.project.as_deref()) {
                Ok((token, name)) => {
                    debug!(project = %name, "Using access token from project store");
                    return Ok(token);
                }
                Err(e) => debug!("No token from project store: {e:#}"),
            }
        }

        if let Some(token) = &self.env_token {
            debug!("Using access token from {TOKEN_ENV_VAR}");
            return Ok(SecretString::from(token.clone()));
        }

        match &self.project {
            Some(project) => Err(TriageError::ProjectNotConfigured {
                project: project.clone(),
            }),
            None => Err(TriageError::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn store_with(projects: &[(&str, &str)]) -> (tempfile::TempDir, ProjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::at_path(dir.path().join("projects.json"));
        for (name, token) in projects {
            store.add_project(name, token).unwrap();
        }
        (dir, store)
    }

    fn token(provider: &CliTokenProvider) -> String {
        provider.rollbar_token().unwrap().expose_secret().to_string()
    }

    #[test]
    fn test_explicit_token_wins() {
        let (_dir, store) = store_with(&[("web", "store-token")]);
        let provider = CliTokenProvider::new(
            Some("flag-token".to_string()),
            None,
            Some(store),
            Some("env-token".to_string()),
        );
        assert_eq!(token(&provider), "flag-token");
    }

    #[test]
    fn test_store_before_env() {
        let (_dir, store) = store_with(&[("web", "web-token"), ("api", "api-token")]);
        let provider =
            CliTokenProvider::new(None, None, Some(store.clone()), Some("env".to_string()));
        assert_eq!(token(&provider), "web-token");

        let provider = CliTokenProvider::new(None, Some("api".to_string()), Some(store), None);
        assert_eq!(token(&provider), "api-token");
    }

    #[test]
    fn test_env_fallback() {
        let (_dir, store) = store_with(&[]);
        let provider = CliTokenProvider::new(None, None, Some(store), Some("env".to_string()));
        assert_eq!(token(&provider), "env");
    }

    #[test]
    fn test_unknown_project_falls_back_to_env() {
        let (_dir, store) = store_with(&[("web", "web-token")]);
        let provider = CliTokenProvider::new(
            None,
            Some("other".to_string()),
            Some(store),
            Some("env".to_string()),
        );
        assert_eq!(token(&provider), "env");
    }

    #[test]
    fn test_missing_token_errors() {
        let provider = CliTokenProvider::new(None, Some("other".to_string()), None, None);
        assert_eq!(
            provider.rollbar_token().unwrap_err().to_string(),
            "project \"other\" not configured and ROLLBAR_ACCESS_TOKEN is missing"
        );

        let provider = CliTokenProvider::new(None, None, None, Some(String::new()));
        assert!(matches!(
            provider.rollbar_token(),
            Err(TriageError::NotAuthenticated)
        ));
    }
}
