//! Action descriptors: immutable, typed units of remote work.
//!
//! Each descriptor names exactly one remote operation together with its
//! target and payload. Descriptors are validated when constructed and never
//! modified afterwards; the dispatcher pattern-matches on the variant, so
//! adding a kind is a compile-time-checked change rather than a new
//! subclass.

use serde::{Deserialize, Serialize};

use crate::{IssueNumber, IssueRef, LabelName, PlatformError, RepositoryId, Username};

// ---------------------------------------------------------------------------

/// The kind of remote operation an [`Action`] performs.
///
/// Determines the shape of the success value in the result envelope; the
/// unwrapper checks against it instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Assign a user to an issue. Succeeds with the assigned username.
    AssignUser,
    /// Post a comment on an issue. Succeeds with the posted comment record.
    CommentIssue,
    /// Retrieve an issue. Succeeds with the issue record.
    GetIssue,
    /// Open a new issue. Succeeds with the created issue record.
    OpenIssue,
    /// Apply a label to an issue, creating the label on the repository
    /// first when absent. Succeeds with the applied label name.
    SetLabel,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::AssignUser => "assign-user",
            ActionKind::CommentIssue => "comment-issue",
            ActionKind::GetIssue => "get-issue",
            ActionKind::OpenIssue => "open-issue",
            ActionKind::SetLabel => "set-label",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------

/// An immutable description of one remote operation: target plus payload.
///
/// Construct through the validating constructors ([`Action::assign_user`]
/// and friends); they reject empty required fields so the dispatcher only
/// ever sees well-formed work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    /// Assign `username` to `issue`.
    AssignUser {
        /// The issue to assign the user to.
        issue: IssueRef,
        /// Login of the user to assign.
        username: Username,
    },
    /// Post a comment with `body` on `issue`.
    CommentIssue {
        /// The issue to comment on.
        issue: IssueRef,
        /// Body of the comment to post.
        body: String,
    },
    /// Retrieve issue `number` from `repository`.
    GetIssue {
        /// The repository containing the issue.
        repository: RepositoryId,
        /// The tracker-assigned issue number.
        number: IssueNumber,
    },
    /// Open a new issue titled `title` on `repository`.
    OpenIssue {
        /// The repository to open the issue on.
        repository: RepositoryId,
        /// Title of the new issue.
        title: String,
        /// Body of the new issue. May be empty.
        body: String,
    },
    /// Apply `label` to `issue`, creating the label on the repository when
    /// it does not exist yet.
    SetLabel {
        /// The issue to label.
        issue: IssueRef,
        /// Name of the label to apply.
        label: LabelName,
    },
}

impl Action {
    /// Builds an assign-user descriptor.
    ///
    /// # Errors
    ///
    /// [`PlatformError::InvalidArgument`] if `username` is empty.
    pub fn assign_user(issue: IssueRef, username: &str) -> Result<Self, PlatformError> {
        let username = Username::new(username).ok_or_else(|| PlatformError::empty_field("username"))?;
        Ok(Action::AssignUser { issue, username })
    }

    /// Builds a comment-issue descriptor.
    ///
    /// # Errors
    ///
    /// [`PlatformError::InvalidArgument`] if `body` is empty.
    pub fn comment_issue(issue: IssueRef, body: &str) -> Result<Self, PlatformError> {
        if body.is_empty() {
            return Err(PlatformError::empty_field("comment body"));
        }
        Ok(Action::CommentIssue {
            issue,
            body: body.to_string(),
        })
    }

    /// Builds a get-issue descriptor.
    ///
    /// # Errors
    ///
    /// [`PlatformError::InvalidArgument`] if `owner` or `repository` is
    /// empty.
    pub fn get_issue(owner: &str, repository: &str, number: u64) -> Result<Self, PlatformError> {
        let repository = RepositoryId::new(owner, repository)
            .ok_or_else(|| PlatformError::empty_field("repository owner/name"))?;
        Ok(Action::GetIssue {
            repository,
            number: IssueNumber::new(number),
        })
    }

    /// Builds an open-issue descriptor.
    ///
    /// # Errors
    ///
    /// [`PlatformError::InvalidArgument`] if `owner`, `repository`, or
    /// `title` is empty.
    pub fn open_issue(
        owner: &str,
        repository: &str,
        title: &str,
        body: &str,
    ) -> Result<Self, PlatformError> {
        let repository = RepositoryId::new(owner, repository)
            .ok_or_else(|| PlatformError::empty_field("repository owner/name"))?;
        if title.is_empty() {
            return Err(PlatformError::empty_field("issue title"));
        }
        Ok(Action::OpenIssue {
            repository,
            title: title.to_string(),
            body: body.to_string(),
        })
    }

    /// Builds a set-label descriptor.
    ///
    /// # Errors
    ///
    /// [`PlatformError::InvalidArgument`] if `label` is empty.
    pub fn set_label(issue: IssueRef, label: &str) -> Result<Self, PlatformError> {
        let label = LabelName::new(label).ok_or_else(|| PlatformError::empty_field("label"))?;
        Ok(Action::SetLabel { issue, label })
    }

    /// Returns the kind of remote operation this descriptor performs.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AssignUser { .. } => ActionKind::AssignUser,
            Action::CommentIssue { .. } => ActionKind::CommentIssue,
            Action::GetIssue { .. } => ActionKind::GetIssue,
            Action::OpenIssue { .. } => ActionKind::OpenIssue,
            Action::SetLabel { .. } => ActionKind::SetLabel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> IssueRef {
        IssueRef::new(
            RepositoryId::new("acme", "repo1").unwrap(),
            IssueNumber::new(7),
        )
    }

    #[test]
    fn constructors_reject_empty_required_fields() {
        assert!(matches!(
            Action::assign_user(issue(), ""),
            Err(PlatformError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Action::comment_issue(issue(), ""),
            Err(PlatformError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Action::get_issue("", "repo1", 7),
            Err(PlatformError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Action::open_issue("acme", "repo1", "", "body"),
            Err(PlatformError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Action::set_label(issue(), ""),
            Err(PlatformError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            Action::open_issue("acme", "repo1", "Bug", "desc")
                .unwrap()
                .kind(),
            ActionKind::OpenIssue
        );
        assert_eq!(
            Action::set_label(issue(), "bug").unwrap().kind(),
            ActionKind::SetLabel
        );
    }

}
