//! Platform configuration and credential resolution.
//!
//! The configuration exposes three optional string keys: `username`,
//! `password`, and `oauth-token`. Resolution picks exactly one credential
//! form, once, before any action is dispatched:
//!
//! - a username forces password validation and wins over any token that is
//!   also present (the token is dropped silently — a policy choice, the
//!   opposite precedence would be as defensible);
//! - otherwise a non-empty token is used on its own;
//! - otherwise the platform starts anonymously and authenticated actions
//!   are unavailable.

use serde::Deserialize;

use crate::{PlatformError, Username};

// ---------------------------------------------------------------------------

/// Credential configuration for one platform instance.
///
/// Typically deserialized from the `[tracker]` table of the composition
/// root's TOML configuration file; any mapping that yields the three
/// optional keys works. `Debug` redacts secret values.
#[derive(Clone, Default, Deserialize)]
pub struct PlatformConfig {
    /// Remote-service login.
    pub username: Option<String>,
    /// Password for `username`; required whenever `username` is set.
    pub password: Option<String>,
    /// Alternative credential, lower priority than username/password.
    #[serde(rename = "oauth-token")]
    pub oauth_token: Option<String>,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ---------------------------------------------------------------------------

/// The single credential form resolved from a [`PlatformConfig`].
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username/password pair.
    Login {
        /// The account login.
        username: Username,
        /// The account password.
        password: String,
    },
    /// OAuth token.
    Token {
        /// The token value.
        token: String,
    },
    /// No credentials were supplied; only unauthenticated use is possible.
    Anonymous,
}

impl Credentials {
    /// Resolves the active credential form from `config`.
    ///
    /// Resolution is pure and idempotent; the lifecycle manager calls it
    /// exactly once per platform instance. An empty `username` key is
    /// treated the same as an absent one.
    ///
    /// # Errors
    ///
    /// [`PlatformError::Configuration`] when a username is present without
    /// a non-empty password.
    pub fn resolve(config: &PlatformConfig) -> Result<Self, PlatformError> {
        if let Some(username) = config.username.as_deref().and_then(Username::new) {
            let password = config.password.as_deref().unwrap_or_default();
            if password.is_empty() {
                return Err(PlatformError::Configuration {
                    message: format!(
                        "a password is required for the configured username '{username}' \
                         (configuration key: password)"
                    ),
                });
            }
            // Username wins: any oauth-token also present is dropped.
            return Ok(Credentials::Login {
                username,
                password: password.to_string(),
            });
        }
        match config.oauth_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(Credentials::Token {
                token: token.to_string(),
            }),
            _ => Ok(Credentials::Anonymous),
        }
    }

    /// Whether this is the [`Credentials::Anonymous`] form.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credentials::Anonymous)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Token { .. } => f.debug_struct("Token").field("token", &"<redacted>").finish(),
            Credentials::Anonymous => write!(f, "Anonymous"),
        }
    }
}
