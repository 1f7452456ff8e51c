//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct
//! newtype wrapping a primitive. This prevents accidentally interchanging —
//! for example — a [`Username`] with a [`LabelName`] even though both are
//! `String` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — tracker-integer-backed
// ---------------------------------------------------------------------------

/// The number the remote tracker assigned to an issue within its repository.
///
/// Wraps the positive integer visible in the issue URL; never generated
/// locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Creates an [`IssueNumber`] from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// A tracker account login, either the authenticated bot account or a
    /// user being assigned to an issue.
    Username
}

string_id! {
    /// The name of an issue label (e.g. `"bug"`, `"needs-triage"`).
    ///
    /// Label names are compared verbatim; the remote tracker owns any
    /// case-folding rules.
    LabelName
}

// ---------------------------------------------------------------------------

/// Identifies a repository on the remote tracker in `"owner/name"` format.
///
/// Both segments must be non-empty and the name segment must not itself
/// contain a `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Creates a [`RepositoryId`] from separate owner and repository names.
    ///
    /// Returns `None` if either segment is empty or the name contains a `/`.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            None
        } else {
            Some(Self { owner, name })
        }
    }

    /// Parses an `"owner/name"` slug.
    #[must_use]
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, name) = slug.split_once('/')?;
        Self::new(owner.trim(), name.trim())
    }

    /// Returns the owning user or organisation.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name within the owner's namespace.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------

/// Locates one issue: the repository it lives in plus its number.
///
/// All issue-targeted actions carry an [`IssueRef`] so the dispatcher never
/// has to thread owner/repository/number triples separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueRef {
    /// The repository containing the issue.
    pub repository: RepositoryId,
    /// The tracker-assigned issue number.
    pub number: IssueNumber,
}

impl IssueRef {
    /// Creates an [`IssueRef`].
    pub fn new(repository: RepositoryId, number: IssueNumber) -> Self {
        Self { repository, number }
    }
}

impl std::fmt::Display for IssueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

// ---------------------------------------------------------------------------
// Execution context — caller-supplied correlation token
// ---------------------------------------------------------------------------

/// Opaque per-conversation-turn token supplied by the calling engine.
///
/// The platform never interprets the contents; it only attaches the token to
/// the tracing span of every dispatched action so remote activity can be
/// correlated back to the conversation that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionContext(String);

impl ExecutionContext {
    /// Wraps a caller-supplied correlation token.
    ///
    /// Returns `None` if the token is empty.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let t = token.into();
        if t.is_empty() { None } else { Some(Self(t)) }
    }

    /// Generates a random context token for callers that do not maintain
    /// their own correlation scheme.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
