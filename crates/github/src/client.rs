//! The octocrab-backed tracker client.

use async_trait::async_trait;
use octocrab::models;
use octocrab::Octocrab;

use platform::{
    CommentRecord, IssueNumber, IssueRecord, IssueRef, IssueTracker, LabelName, RepositoryId,
    Timestamp, TrackerError, Username,
};

use crate::error::map_octocrab;

/// Colour assigned to labels the platform creates on the fly; GitHub
/// requires one and the calling engine has no opinion.
const DEFAULT_LABEL_COLOR: &str = "ededed";

/// [`IssueTracker`] implementation over the GitHub REST API.
///
/// Holds one authenticated [`Octocrab`] instance; `octocrab` clients are
/// cheap to clone and safe for concurrent use, which is what makes the
/// shared read-only client handle workable.
pub struct GithubTracker {
    octocrab: Octocrab,
}

impl GithubTracker {
    /// Wraps an already-built `octocrab` client.
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

fn issue_state(state: &models::IssueState) -> String {
    match state {
        models::IssueState::Open => "open".to_string(),
        models::IssueState::Closed => "closed".to_string(),
        _ => "unknown".to_string(),
    }
}

fn issue_record(repository: &RepositoryId, issue: models::issues::Issue) -> IssueRecord {
    IssueRecord {
        repository: repository.clone(),
        number: IssueNumber::new(issue.number),
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        state: issue_state(&issue.state),
        labels: issue.labels.into_iter().map(|label| label.name).collect(),
        created_at: Some(Timestamp::from_utc(issue.created_at)),
    }
}

fn comment_record(issue: &IssueRef, comment: models::issues::Comment) -> CommentRecord {
    CommentRecord {
        issue: issue.clone(),
        id: comment.id.0,
        body: comment.body.unwrap_or_default(),
        author: Username::new(comment.user.login),
        created_at: Some(Timestamp::from_utc(comment.created_at)),
    }
}

#[async_trait]
impl IssueTracker for GithubTracker {
    async fn authenticated_login(&self) -> Result<Username, TrackerError> {
        let author = self
            .octocrab
            .current()
            .user()
            .await
            .map_err(map_octocrab)?;
        Username::new(author.login).ok_or_else(|| TrackerError::Remote {
            status: None,
            message: "GitHub reported an empty login for the authenticated user".to_string(),
        })
    }

    async fn fetch_issue(
        &self,
        repository: &RepositoryId,
        number: IssueNumber,
    ) -> Result<IssueRecord, TrackerError> {
        let issue = self
            .octocrab
            .issues(repository.owner(), repository.name())
            .get(number.as_u64())
            .await
            .map_err(map_octocrab)?;
        Ok(issue_record(repository, issue))
    }

    async fn create_issue(
        &self,
        repository: &RepositoryId,
        title: &str,
        body: &str,
    ) -> Result<IssueRecord, TrackerError> {
        let issue = self
            .octocrab
            .issues(repository.owner(), repository.name())
            .create(title)
            .body(body)
            .send()
            .await
            .map_err(map_octocrab)?;
        tracing::debug!(repository = %repository, number = issue.number, "issue created");
        Ok(issue_record(repository, issue))
    }

    async fn post_comment(
        &self,
        issue: &IssueRef,
        body: &str,
    ) -> Result<CommentRecord, TrackerError> {
        let comment = self
            .octocrab
            .issues(issue.repository.owner(), issue.repository.name())
            .create_comment(issue.number.as_u64(), body)
            .await
            .map_err(map_octocrab)?;
        Ok(comment_record(issue, comment))
    }

    async fn add_assignee(
        &self,
        issue: &IssueRef,
        username: &Username,
    ) -> Result<(), TrackerError> {
        self.octocrab
            .issues(issue.repository.owner(), issue.repository.name())
            .add_assignees(issue.number.as_u64(), &[username.as_str()])
            .await
            .map_err(map_octocrab)?;
        Ok(())
    }

    async fn repository_labels(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<LabelName>, TrackerError> {
        let page = self
            .octocrab
            .issues(repository.owner(), repository.name())
            .list_labels_for_repo()
            .per_page(100)
            .send()
            .await
            .map_err(map_octocrab)?;
        let labels = self.octocrab.all_pages(page).await.map_err(map_octocrab)?;
        Ok(labels
            .into_iter()
            .filter_map(|label| LabelName::new(label.name))
            .collect())
    }

    async fn create_label(
        &self,
        repository: &RepositoryId,
        label: &LabelName,
    ) -> Result<(), TrackerError> {
        self.octocrab
            .issues(repository.owner(), repository.name())
            .create_label(label.as_str(), DEFAULT_LABEL_COLOR, "")
            .await
            .map_err(map_octocrab)?;
        tracing::debug!(repository = %repository, label = %label, "label created");
        Ok(())
    }

    async fn issue_labels(&self, issue: &IssueRef) -> Result<Vec<LabelName>, TrackerError> {
        let page = self
            .octocrab
            .issues(issue.repository.owner(), issue.repository.name())
            .list_labels_for_issue(issue.number.as_u64())
            .per_page(100)
            .send()
            .await
            .map_err(map_octocrab)?;
        let labels = self.octocrab.all_pages(page).await.map_err(map_octocrab)?;
        Ok(labels
            .into_iter()
            .filter_map(|label| LabelName::new(label.name))
            .collect())
    }

    async fn apply_label(&self, issue: &IssueRef, label: &LabelName) -> Result<(), TrackerError> {
        self.octocrab
            .issues(issue.repository.owner(), issue.repository.name())
            .add_labels(issue.number.as_u64(), &[label.as_str().to_string()])
            .await
            .map_err(map_octocrab)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_states_render_as_lowercase_strings() {
        assert_eq!(issue_state(&models::IssueState::Open), "open");
        assert_eq!(issue_state(&models::IssueState::Closed), "closed");
    }
}
