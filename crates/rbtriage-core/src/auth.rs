// SPDX-License-Identifier: Apache-2.0

//! Token provider abstraction for access token resolution.
//!
//! The library never reads credentials itself. Front ends implement
//! [`TokenProvider`] over whatever sources they support (flags, the project
//! store, environment variables).

use secrecy::SecretString;

/// Provides the Rollbar project access token for API calls.
pub trait TokenProvider: Send + Sync {
    /// Resolves the access token.
    ///
    /// Returns an error describing the missing source when no token is available.
    fn rollbar_token(&self) -> crate::Result<SecretString>;
}
