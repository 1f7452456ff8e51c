//! Error and retry-policy types for the issue_works platform.
//!
//! [`PlatformError`] is the taxonomy surfaced to the calling engine; every
//! public operation fails with one of its variants. [`TrackerError`] is the
//! lower-level error produced by implementations of the tracker port traits;
//! the lifecycle manager and the dispatcher translate it into the platform
//! taxonomy, keeping the original cause attached.
//!
//! [`RetryPolicy`] is a cross-cutting concern: the platform never retries on
//! its own, but it classifies every failure so the calling engine can decide
//! whether re-invoking the operation is worthwhile.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ActionKind;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by [`PlatformError::retry_policy`] to let the calling engine
/// decide whether to re-invoke an operation. The platform itself performs a
/// single attempt per invocation.
///
/// ## Rules
///
/// - `Retryable`: transport-level failures reaching the remote tracker.
/// - `NonRetryable`: credential problems, invalid input, missing client
///   handle, remote rejections of a specific operation, and internal
///   invariant violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without caller intervention.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Port-level errors
// ---------------------------------------------------------------------------

/// Failure reported by an implementation of the tracker port traits.
///
/// Infrastructure adapters map their client library's error type onto these
/// three shapes; the platform core never sees wire-level detail beyond them.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The remote tracker could not be reached at the transport level.
    #[error("transport failure contacting the remote tracker: {message}")]
    Transport {
        /// Human-readable description of the transport failure.
        message: String,
        /// The client library's underlying error, when available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The tracker answered but rejected the supplied credentials.
    #[error("the remote tracker rejected the supplied credentials: {message}")]
    CredentialsRejected {
        /// The rejection message reported by the tracker.
        message: String,
    },

    /// The tracker accepted the request but reported an error for the
    /// specific operation (e.g. issue not found, repository not found).
    #[error("the remote tracker reported an error (status {status:?}): {message}")]
    Remote {
        /// HTTP-level status code, when the client library exposes one.
        status: Option<u16>,
        /// The error message reported by the tracker.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Platform-level errors
// ---------------------------------------------------------------------------

/// Errors surfaced to the calling engine.
///
/// Start-up failures (`Configuration`, `Auth`, `Network` during validation)
/// and per-action failures share this taxonomy; none are caught and retried
/// internally.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Malformed or incomplete credential configuration, e.g. a username
    /// without a password. Fails platform construction.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Credentials were accepted by the client library but rejected by the
    /// remote tracker during start-up validation.
    #[error("Cannot access the remote tracker API, please check your credentials")]
    Auth {
        /// The rejection reported by the tracker.
        #[source]
        source: TrackerError,
    },

    /// Transport failure contacting the remote tracker, during start-up
    /// validation or while executing an action.
    #[error("Network failure contacting the remote tracker")]
    Network {
        /// The transport failure reported by the adapter.
        #[source]
        source: TrackerError,
    },

    /// An authenticated action was attempted but no client handle was
    /// established at start-up. Fixable by supplying valid credentials.
    #[error(
        "No tracker client is available, make sure credentials were supplied \
         and validated when the platform was started"
    )]
    ClientNotInitialized,

    /// The tracker accepted the request but reported an error for the
    /// dispatched action. The original cause is always attached.
    #[error("The remote tracker rejected the {action} operation")]
    RemoteOperation {
        /// Kind of the action that failed.
        action: ActionKind,
        /// The error reported by the adapter.
        #[source]
        source: TrackerError,
    },

    /// An envelope was unwrapped as a value shape its action kind does not
    /// produce. Indicates a bug in the dispatch pipeline, not a caller
    /// mistake; unreachable while the dispatcher's contracts hold.
    #[error("Envelope produced by a {actual} action does not carry a {requested} value")]
    InternalType {
        /// Value shape the caller asked the unwrapper for.
        requested: &'static str,
        /// Kind of the action that produced the envelope.
        actual: ActionKind,
    },

    /// A required operation argument was empty or malformed.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the offending argument.
        message: String,
    },
}

impl PlatformError {
    /// Classifies this error for the calling engine's retry decision.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            PlatformError::Network { .. } => RetryPolicy::Retryable { after: None },
            _ => RetryPolicy::NonRetryable,
        }
    }

    /// Shorthand for an [`PlatformError::InvalidArgument`] with the given
    /// field name.
    pub(crate) fn empty_field(field: &str) -> Self {
        PlatformError::InvalidArgument {
            message: format!("{field} must not be empty"),
        }
    }
}
