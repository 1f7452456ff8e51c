//! The engine-facing platform: start-up plus the five public operations.
//!
//! [`TrackerPlatform`] composes the lifecycle manager, the action
//! descriptors, the dispatcher, and the envelope unwrapping. Every public
//! operation is the same thin pipeline — validate arguments, build the
//! descriptor, dispatch with the current handle and the caller's execution
//! context, unwrap the typed result — and none of them holds state between
//! calls.

use async_trait::async_trait;

use crate::{
    dispatch, lifecycle, Action, ClientHandle, ClientState, CommentRecord, Envelope,
    ExecutionContext, IssueRecord, IssueRef, LabelName, PlatformConfig, PlatformError,
    TrackerConnector, Username,
};

// ---------------------------------------------------------------------------

/// The capability the calling engine programs against: execute one typed
/// action, get one envelope back.
///
/// Kept as an interface contract rather than a base class so adapters for
/// other trackers can implement it without an inheritance chain.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Executes one descriptor under the caller's execution context.
    async fn execute_action(&self, context: &ExecutionContext, action: &Action) -> Envelope;
}

// ---------------------------------------------------------------------------

/// A platform instance bound to one remote tracker account (or to none,
/// when no credentials were configured).
///
/// The client handle inside is established at most once by
/// [`TrackerPlatform::start`] and shared read-only afterwards; instances
/// are safe to use from multiple tasks to the extent the underlying client
/// is.
#[derive(Debug)]
pub struct TrackerPlatform {
    client: ClientState,
}

impl TrackerPlatform {
    /// Starts a platform: resolves credentials from `config`, builds the
    /// tracker client through `connector`, and validates it once.
    ///
    /// Auth and network failures during validation do not fail
    /// construction; they leave the platform degraded (see
    /// [`TrackerPlatform::startup_error`]) and every authenticated
    /// operation failing with [`PlatformError::ClientNotInitialized`].
    ///
    /// # Errors
    ///
    /// [`PlatformError::Configuration`] when the credential configuration
    /// is malformed (username without password).
    pub async fn start(
        config: &PlatformConfig,
        connector: &dyn TrackerConnector,
    ) -> Result<Self, PlatformError> {
        let client = lifecycle::initialize(config, connector).await?;
        Ok(Self { client })
    }

    /// Returns the validated client handle.
    ///
    /// # Errors
    ///
    /// [`PlatformError::ClientNotInitialized`] when no handle was
    /// established — whether because no credentials were configured or
    /// because start-up validation failed.
    pub fn client(&self) -> Result<&ClientHandle, PlatformError> {
        self.client.handle().ok_or(PlatformError::ClientNotInitialized)
    }

    /// The start-up validation failure, when one occurred. `None` for
    /// healthy and for unconfigured platforms.
    pub fn startup_error(&self) -> Option<&PlatformError> {
        self.client.startup_error()
    }

    /// Whether a validated client handle is available.
    pub fn is_authenticated(&self) -> bool {
        self.client.handle().is_some()
    }

    // -- public operations --------------------------------------------------

    /// Assigns `username` to `issue` and returns the assigned login.
    pub async fn assign_user(
        &self,
        context: &ExecutionContext,
        issue: &IssueRef,
        username: &str,
    ) -> Result<Username, PlatformError> {
        let action = Action::assign_user(issue.clone(), username)?;
        self.dispatch(context, &action).await.into_username()
    }

    /// Posts `body` as a comment on `issue` and returns the stored comment.
    pub async fn comment_issue(
        &self,
        context: &ExecutionContext,
        issue: &IssueRef,
        body: &str,
    ) -> Result<CommentRecord, PlatformError> {
        let action = Action::comment_issue(issue.clone(), body)?;
        self.dispatch(context, &action).await.into_comment()
    }

    /// Retrieves issue `number` from `owner`'s `repository`.
    pub async fn get_issue(
        &self,
        context: &ExecutionContext,
        owner: &str,
        repository: &str,
        number: u64,
    ) -> Result<IssueRecord, PlatformError> {
        let action = Action::get_issue(owner, repository, number)?;
        self.dispatch(context, &action).await.into_issue()
    }

    /// Opens an issue titled `title` on `owner`'s `repository` and returns
    /// it as reported by the tracker.
    pub async fn open_issue(
        &self,
        context: &ExecutionContext,
        owner: &str,
        repository: &str,
        title: &str,
        body: &str,
    ) -> Result<IssueRecord, PlatformError> {
        let action = Action::open_issue(owner, repository, title, body)?;
        self.dispatch(context, &action).await.into_issue()
    }

    /// Applies `label` to `issue`, creating the label on the repository
    /// first when absent, and returns the applied label name. Applying an
    /// already-present label is a successful no-op.
    pub async fn set_label(
        &self,
        context: &ExecutionContext,
        issue: &IssueRef,
        label: &str,
    ) -> Result<LabelName, PlatformError> {
        let action = Action::set_label(issue.clone(), label)?;
        self.dispatch(context, &action).await.into_label()
    }

    async fn dispatch(&self, context: &ExecutionContext, action: &Action) -> Envelope {
        dispatch::execute(self.client.handle(), context, action).await
    }
}

#[async_trait]
impl Platform for TrackerPlatform {
    async fn execute_action(&self, context: &ExecutionContext, action: &Action) -> Envelope {
        self.dispatch(context, action).await
    }
}
