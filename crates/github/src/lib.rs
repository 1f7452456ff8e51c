//! issue_works GitHub infrastructure adapter.
//!
//! Implements the tracker port traits defined in the [`platform`] crate
//! ([`platform::IssueTracker`], [`platform::TrackerConnector`]) using
//! [`octocrab`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. All
//! GitHub API details (authentication schemes, endpoint shapes, HTTP
//! status interpretation, pagination) are handled here; the [`platform`]
//! crate never sees them.

mod client;
mod connector;
mod error;

pub use client::GithubTracker;
pub use connector::GithubConnector;
