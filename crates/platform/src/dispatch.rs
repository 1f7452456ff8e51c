//! The action dispatcher: one descriptor in, one envelope out.
//!
//! [`execute`] runs a descriptor against the live client handle, times the
//! remote round trip, and wraps the outcome. It performs a single attempt —
//! transient failures are classified via [`crate::RetryPolicy`] but never
//! retried here. Side effects are limited to the one remote operation the
//! descriptor names; the create-label-if-absent fallback of set-label is
//! the only multi-step orchestration.
//!
//! The caller's execution context is attached to the dispatch span and
//! otherwise forwarded untouched.

use std::time::Instant;

use tracing::Instrument;

use crate::{
    Action, ActionKind, ActionValue, ClientHandle, Envelope, ExecutionContext, IssueRef,
    IssueTracker, LabelName, PlatformError, TrackerError,
};

/// Executes one action against the tracker and wraps the outcome.
///
/// Fails with [`PlatformError::ClientNotInitialized`] when the descriptor
/// needs remote access and no handle was established at start-up.
pub async fn execute(
    client: Option<&ClientHandle>,
    context: &ExecutionContext,
    action: &Action,
) -> Envelope {
    let kind = action.kind();
    let span = tracing::info_span!("dispatch", context = %context, action = %kind);
    let started = Instant::now();
    let outcome = run(client, action).instrument(span).await;
    let elapsed = started.elapsed();
    match outcome {
        Ok(value) => {
            tracing::debug!(
                context = %context,
                action = %kind,
                elapsed_ms = elapsed.as_millis() as u64,
                "action completed"
            );
            Envelope::success(kind, value, elapsed)
        }
        Err(error) => {
            tracing::warn!(
                context = %context,
                action = %kind,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error,
                "action failed"
            );
            Envelope::failure(kind, error, elapsed)
        }
    }
}

async fn run(client: Option<&ClientHandle>, action: &Action) -> Result<ActionValue, PlatformError> {
    // Every current action kind performs a remote call, so a missing handle
    // fails the dispatch outright.
    let Some(client) = client else {
        return Err(PlatformError::ClientNotInitialized);
    };
    let kind = action.kind();
    match action {
        Action::AssignUser { issue, username } => {
            client
                .add_assignee(issue, username)
                .await
                .map_err(|e| classify(kind, e))?;
            Ok(ActionValue::Username(username.clone()))
        }
        Action::CommentIssue { issue, body } => {
            let comment = client
                .post_comment(issue, body)
                .await
                .map_err(|e| classify(kind, e))?;
            Ok(ActionValue::Comment(comment))
        }
        Action::GetIssue { repository, number } => {
            let issue = client
                .fetch_issue(repository, *number)
                .await
                .map_err(|e| classify(kind, e))?;
            Ok(ActionValue::Issue(issue))
        }
        Action::OpenIssue {
            repository,
            title,
            body,
        } => {
            let issue = client
                .create_issue(repository, title, body)
                .await
                .map_err(|e| classify(kind, e))?;
            Ok(ActionValue::Issue(issue))
        }
        Action::SetLabel { issue, label } => {
            set_label(client.as_ref(), issue, label)
                .await
                .map_err(|e| classify(kind, e))?;
            Ok(ActionValue::Label(label.clone()))
        }
    }
}

/// Applies `label` to `issue`, creating it on the repository when absent.
///
/// Idempotent: an already-applied label is a successful no-op, and nothing
/// is created twice.
async fn set_label(
    client: &dyn IssueTracker,
    issue: &IssueRef,
    label: &LabelName,
) -> Result<(), TrackerError> {
    let applied = client.issue_labels(issue).await?;
    if applied.contains(label) {
        return Ok(());
    }
    let defined = client.repository_labels(&issue.repository).await?;
    if !defined.contains(label) {
        client.create_label(&issue.repository, label).await?;
    }
    client.apply_label(issue, label).await
}

/// Maps an adapter failure onto the platform taxonomy: transport problems
/// become [`PlatformError::Network`], everything else is a remote rejection
/// of this specific action.
fn classify(kind: ActionKind, error: TrackerError) -> PlatformError {
    match error {
        TrackerError::Transport { .. } => PlatformError::Network { source: error },
        TrackerError::CredentialsRejected { .. } | TrackerError::Remote { .. } => {
            PlatformError::RemoteOperation {
                action: kind,
                source: error,
            }
        }
    }
}
