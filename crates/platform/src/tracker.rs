//! Port traits for the remote issue tracker.
//!
//! The platform core never talks to the network. It declares *what* it
//! needs from a tracker here; infrastructure crates supply the *how* (the
//! `github` crate implements these traits with its client library, and the
//! test suites implement them in memory).
//!
//! Both traits are object-safe so a platform instance can hold its client
//! as `Arc<dyn IssueTracker>` — the shared, read-only client handle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    CommentRecord, Credentials, IssueNumber, IssueRecord, IssueRef, LabelName, RepositoryId,
    TrackerError, Username,
};

/// Shared handle to an authenticated tracker client.
///
/// Created at most once per platform instance and reused, unmodified, for
/// every dispatched action.
pub type ClientHandle = Arc<dyn IssueTracker>;

// ---------------------------------------------------------------------------

/// The remote operations the dispatcher needs.
///
/// One method per wire primitive; the only composite behaviour (the
/// create-label-if-absent fallback of set-label) lives in the dispatcher,
/// not here. Implementations must be safe for concurrent use — the handle
/// is shared read-only state after start-up.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns the login of the authenticated account.
    ///
    /// Used once, at start-up, as the lightweight credential-validation
    /// call.
    async fn authenticated_login(&self) -> Result<Username, TrackerError>;

    /// Fetches one issue.
    async fn fetch_issue(
        &self,
        repository: &RepositoryId,
        number: IssueNumber,
    ) -> Result<IssueRecord, TrackerError>;

    /// Creates a new issue and returns it as reported by the tracker.
    async fn create_issue(
        &self,
        repository: &RepositoryId,
        title: &str,
        body: &str,
    ) -> Result<IssueRecord, TrackerError>;

    /// Posts a comment on an issue.
    async fn post_comment(&self, issue: &IssueRef, body: &str)
        -> Result<CommentRecord, TrackerError>;

    /// Adds a user to an issue's assignees.
    async fn add_assignee(&self, issue: &IssueRef, username: &Username)
        -> Result<(), TrackerError>;

    /// Lists the labels defined on a repository.
    async fn repository_labels(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<LabelName>, TrackerError>;

    /// Creates a label on a repository.
    async fn create_label(
        &self,
        repository: &RepositoryId,
        label: &LabelName,
    ) -> Result<(), TrackerError>;

    /// Lists the labels currently applied to an issue.
    async fn issue_labels(&self, issue: &IssueRef) -> Result<Vec<LabelName>, TrackerError>;

    /// Applies an existing label to an issue.
    async fn apply_label(&self, issue: &IssueRef, label: &LabelName) -> Result<(), TrackerError>;
}

// ---------------------------------------------------------------------------

/// Builds a tracker client from resolved credentials.
///
/// Implementations construct the client only; validation of the
/// credentials (the self-identity call) is the lifecycle manager's job and
/// happens exactly once, right after `connect` returns.
#[async_trait]
pub trait TrackerConnector: Send + Sync {
    /// Constructs a client for the given credentials.
    ///
    /// Never called with [`Credentials::Anonymous`].
    async fn connect(&self, credentials: &Credentials) -> Result<ClientHandle, TrackerError>;
}
