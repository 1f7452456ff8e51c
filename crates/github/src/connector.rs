//! Construction of authenticated GitHub clients from resolved credentials.

use std::sync::Arc;

use async_trait::async_trait;
use octocrab::Octocrab;

use platform::{ClientHandle, Credentials, TrackerConnector, TrackerError};

use crate::client::GithubTracker;
use crate::error::map_octocrab;

/// [`TrackerConnector`] that builds [`GithubTracker`] clients.
///
/// Construction only wires the authentication scheme into the HTTP client;
/// whether the credentials are actually accepted is discovered by the
/// lifecycle manager's self-identity call.
#[derive(Debug, Default)]
pub struct GithubConnector;

impl GithubConnector {
    /// Creates a connector against the public GitHub API.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TrackerConnector for GithubConnector {
    async fn connect(&self, credentials: &Credentials) -> Result<ClientHandle, TrackerError> {
        let builder = Octocrab::builder();
        let builder = match credentials {
            Credentials::Login { username, password } => {
                tracing::debug!(username = %username, "building GitHub client from username/password");
                builder.basic_auth(username.as_str().to_string(), password.clone())
            }
            Credentials::Token { token } => {
                tracing::debug!("building GitHub client from oauth token");
                builder.personal_token(token.clone())
            }
            Credentials::Anonymous => builder,
        };
        let octocrab = builder.build().map_err(map_octocrab)?;
        let handle: ClientHandle = Arc::new(GithubTracker::new(octocrab));
        Ok(handle)
    }
}
