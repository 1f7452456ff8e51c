//! The result envelope produced by the dispatcher, and its unwrapping.
//!
//! Every dispatched action yields an [`Envelope`]: the action kind, the
//! success value or failure cause, and the elapsed wall time of the remote
//! round trip. The `into_*` methods are the typed unwrapping step — they
//! extract the operation-specific value and refuse, with
//! [`PlatformError::InternalType`], to hand back a value shape the
//! producing action kind cannot have created.

use std::time::Duration;

use crate::{ActionKind, CommentRecord, IssueRecord, LabelName, PlatformError, RetryPolicy, Username};

// ---------------------------------------------------------------------------

/// The success payload of a dispatched action.
///
/// Which variant an action produces is fixed by its [`ActionKind`]:
/// assign-user yields `Username`, set-label yields `Label`, comment-issue
/// yields `Comment`, and get-issue/open-issue yield `Issue`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionValue {
    /// The username that was assigned.
    Username(Username),
    /// The label name that was applied.
    Label(LabelName),
    /// The comment that was posted.
    Comment(CommentRecord),
    /// The issue that was retrieved or created.
    Issue(IssueRecord),
}

// ---------------------------------------------------------------------------

/// Outcome of one dispatched action.
#[derive(Debug)]
pub struct Envelope {
    kind: ActionKind,
    outcome: Result<ActionValue, PlatformError>,
    elapsed: Duration,
}

impl Envelope {
    /// Wraps a successful outcome.
    pub fn success(kind: ActionKind, value: ActionValue, elapsed: Duration) -> Self {
        Self {
            kind,
            outcome: Ok(value),
            elapsed,
        }
    }

    /// Wraps a failed outcome, keeping the original cause.
    pub fn failure(kind: ActionKind, error: PlatformError, elapsed: Duration) -> Self {
        Self {
            kind,
            outcome: Err(error),
            elapsed,
        }
    }

    /// Kind of the action that produced this envelope.
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Wall time the remote round trip took, including the label-creation
    /// fallback for set-label.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the action succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Retry classification of the failure, if any. `None` for successes.
    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.outcome.as_ref().err().map(PlatformError::retry_policy)
    }

    /// Borrows the raw outcome.
    pub fn outcome(&self) -> &Result<ActionValue, PlatformError> {
        &self.outcome
    }

    /// Consumes the envelope into its raw outcome.
    pub fn into_outcome(self) -> Result<ActionValue, PlatformError> {
        self.outcome
    }

    // -- typed unwrapping ---------------------------------------------------

    /// Extracts the assigned username from an assign-user envelope.
    pub fn into_username(self) -> Result<Username, PlatformError> {
        let kind = self.kind;
        match self.outcome? {
            ActionValue::Username(username) => Ok(username),
            _ => Err(PlatformError::InternalType {
                requested: "username",
                actual: kind,
            }),
        }
    }

    /// Extracts the applied label name from a set-label envelope.
    pub fn into_label(self) -> Result<LabelName, PlatformError> {
        let kind = self.kind;
        match self.outcome? {
            ActionValue::Label(label) => Ok(label),
            _ => Err(PlatformError::InternalType {
                requested: "label",
                actual: kind,
            }),
        }
    }

    /// Extracts the posted comment from a comment-issue envelope.
    pub fn into_comment(self) -> Result<CommentRecord, PlatformError> {
        let kind = self.kind;
        match self.outcome? {
            ActionValue::Comment(comment) => Ok(comment),
            _ => Err(PlatformError::InternalType {
                requested: "comment record",
                actual: kind,
            }),
        }
    }

    /// Extracts the issue record from a get-issue or open-issue envelope.
    pub fn into_issue(self) -> Result<IssueRecord, PlatformError> {
        let kind = self.kind;
        match self.outcome? {
            ActionValue::Issue(issue) => Ok(issue),
            _ => Err(PlatformError::InternalType {
                requested: "issue record",
                actual: kind,
            }),
        }
    }
}
