//! Client lifecycle: credential resolution, one-time construction, and
//! validation of the tracker client handle.
//!
//! [`initialize`] runs exactly once per platform instance, before any
//! action is dispatched. The [`ClientState`] it produces never changes
//! afterwards — the handle is shared read-only state, and it is never
//! re-validated per call.

use crate::{
    ClientHandle, Credentials, PlatformConfig, PlatformError, TrackerConnector, TrackerError,
};

// ---------------------------------------------------------------------------

/// The once-set state of the tracker client handle.
///
/// Transitions exactly once at start-up from "being resolved" into one of
/// these three shapes, then stays immutable for the platform's lifetime.
pub enum ClientState {
    /// Credentials validated; the handle is ready for dispatch.
    Ready(ClientHandle),
    /// No credentials were configured. Not an error — the platform can
    /// still be constructed for unauthenticated uses.
    Unconfigured,
    /// Credentials were configured but start-up validation failed. The
    /// platform degrades gracefully; the error is kept for diagnostics.
    Failed(PlatformError),
}

impl ClientState {
    /// Returns the handle when one was established.
    pub fn handle(&self) -> Option<&ClientHandle> {
        match self {
            ClientState::Ready(handle) => Some(handle),
            ClientState::Unconfigured | ClientState::Failed(_) => None,
        }
    }

    /// Returns the start-up validation failure, when one occurred.
    pub fn startup_error(&self) -> Option<&PlatformError> {
        match self {
            ClientState::Failed(error) => Some(error),
            ClientState::Ready(_) | ClientState::Unconfigured => None,
        }
    }
}

// The handle is a trait object, so Debug is written out by hand.
impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientState::Ready(_) => f.write_str("Ready"),
            ClientState::Unconfigured => f.write_str("Unconfigured"),
            ClientState::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
        }
    }
}

// ---------------------------------------------------------------------------

/// Resolves credentials and establishes the client handle, at most once.
///
/// - Malformed configuration (username without password) fails outright.
/// - Absent credentials yield [`ClientState::Unconfigured`] with a warning.
/// - Auth or network failures during validation yield
///   [`ClientState::Failed`]; the caller still gets a usable (degraded)
///   platform.
///
/// # Errors
///
/// [`PlatformError::Configuration`] only; every other start-up failure is
/// recorded in the returned state.
pub async fn initialize(
    config: &PlatformConfig,
    connector: &dyn TrackerConnector,
) -> Result<ClientState, PlatformError> {
    let credentials = Credentials::resolve(config)?;
    if credentials.is_anonymous() {
        tracing::warn!(
            "no authentication method set in the configuration; the platform will not be able \
             to call the remote tracker API — supply a username/password or an oauth token to \
             enable authenticated operations"
        );
        return Ok(ClientState::Unconfigured);
    }
    match connect_and_validate(connector, &credentials).await {
        Ok(handle) => Ok(ClientState::Ready(handle)),
        Err(error) => {
            tracing::error!(
                error = %error,
                "tracker client validation failed at start-up; authenticated operations are \
                 disabled"
            );
            Ok(ClientState::Failed(error))
        }
    }
}

/// Builds the client and performs the lightweight self-identity call that
/// validates the credentials. The resolved identity is only logged.
async fn connect_and_validate(
    connector: &dyn TrackerConnector,
    credentials: &Credentials,
) -> Result<ClientHandle, PlatformError> {
    let handle = connector
        .connect(credentials)
        .await
        .map_err(classify_startup)?;
    let login = handle
        .authenticated_login()
        .await
        .map_err(classify_startup)?;
    tracing::info!(login = %login, "logged in to the remote tracker");
    Ok(handle)
}

/// At start-up, transport problems are network errors and everything the
/// tracker answered with is a credential problem — the only call made is
/// the self-identity check.
fn classify_startup(error: TrackerError) -> PlatformError {
    match error {
        TrackerError::Transport { .. } => PlatformError::Network { source: error },
        TrackerError::CredentialsRejected { .. } | TrackerError::Remote { .. } => {
            PlatformError::Auth { source: error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_classification_separates_transport_from_rejection() {
        assert!(matches!(
            classify_startup(TrackerError::Transport {
                message: "dns failure".into(),
                source: None,
            }),
            PlatformError::Network { .. }
        ));
        assert!(matches!(
            classify_startup(TrackerError::CredentialsRejected {
                message: "bad credentials".into(),
            }),
            PlatformError::Auth { .. }
        ));
    }

    #[test]
    fn client_state_exposes_handle_and_failure_disjointly() {
        let failed = ClientState::Failed(PlatformError::ClientNotInitialized);
        assert!(failed.handle().is_none());
        assert!(failed.startup_error().is_some());
        assert!(ClientState::Unconfigured.handle().is_none());
        assert!(ClientState::Unconfigured.startup_error().is_none());
    }
}
