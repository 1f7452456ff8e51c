//! Shared value types for the issue_works domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types
//! carry the data returned by remote operations: the issue and comment
//! records handed back to the calling engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IssueNumber, IssueRef, RepositoryId, Username};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// An issue as reported by the remote tracker.
///
/// Returned by the get-issue and open-issue operations. Only the fields the
/// calling engine consumes are modelled; the adapter discards the rest of
/// the wire payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// The repository the issue belongs to.
    pub repository: RepositoryId,
    /// The tracker-assigned issue number.
    pub number: IssueNumber,
    /// The issue title.
    pub title: String,
    /// The issue body. Empty when the issue was opened without one.
    pub body: String,
    /// Current state reported by the tracker (e.g. `"open"`, `"closed"`).
    pub state: String,
    /// Labels currently applied to the issue.
    pub labels: Vec<String>,
    /// Moment the tracker recorded the issue's creation, when reported.
    pub created_at: Option<Timestamp>,
}

impl IssueRecord {
    /// Returns the [`IssueRef`] locating this issue.
    pub fn issue_ref(&self) -> IssueRef {
        IssueRef::new(self.repository.clone(), self.number)
    }
}

// ---------------------------------------------------------------------------

/// A comment as reported by the remote tracker after posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// The issue the comment was posted on.
    pub issue: IssueRef,
    /// Tracker-assigned comment identifier.
    pub id: u64,
    /// The comment body as stored by the tracker.
    pub body: String,
    /// Login of the account that authored the comment.
    pub author: Option<Username>,
    /// Moment the tracker recorded the comment, when reported.
    pub created_at: Option<Timestamp>,
}
