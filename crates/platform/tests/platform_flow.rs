//! End-to-end platform scenarios against an in-memory tracker.
//!
//! The fake implements the port traits the way the remote service behaves
//! observably: issues get sequential numbers, labels live per repository,
//! and credential validation happens through the self-identity call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use platform::{
    Action, ClientHandle, CommentRecord, Credentials, ExecutionContext, IssueNumber, IssueRecord,
    IssueRef, IssueTracker, LabelName, Platform, PlatformConfig, PlatformError, RepositoryId,
    TrackerConnector, TrackerError, TrackerPlatform, Username,
};

// ---------------------------------------------------------------------------
// In-memory tracker
// ---------------------------------------------------------------------------

/// How the fake answers the start-up self-identity call.
#[derive(Clone)]
enum LoginBehaviour {
    Valid(&'static str),
    Rejected,
    Unreachable,
}

#[derive(Default)]
struct RepoState {
    labels: Vec<LabelName>,
    issues: HashMap<u64, StoredIssue>,
    next_number: u64,
}

struct StoredIssue {
    title: String,
    body: String,
    labels: Vec<LabelName>,
    assignees: Vec<Username>,
    comments: Vec<(u64, String)>,
}

struct FakeTracker {
    login: LoginBehaviour,
    repos: Mutex<HashMap<String, RepoState>>,
    next_comment_id: AtomicUsize,
    create_label_calls: AtomicUsize,
    apply_label_calls: AtomicUsize,
}

impl FakeTracker {
    fn new(login: LoginBehaviour) -> Arc<Self> {
        Arc::new(Self {
            login,
            repos: Mutex::new(HashMap::new()),
            next_comment_id: AtomicUsize::new(1),
            create_label_calls: AtomicUsize::new(0),
            apply_label_calls: AtomicUsize::new(0),
        })
    }

    fn with_repo(self: Arc<Self>, repository: &RepositoryId) -> Arc<Self> {
        self.repos
            .lock()
            .unwrap()
            .insert(repository.to_string(), RepoState {
                next_number: 1,
                ..RepoState::default()
            });
        self
    }

    fn record(repository: &RepositoryId, number: u64, stored: &StoredIssue) -> IssueRecord {
        IssueRecord {
            repository: repository.clone(),
            number: IssueNumber::new(number),
            title: stored.title.clone(),
            body: stored.body.clone(),
            state: "open".to_string(),
            labels: stored.labels.iter().map(|l| l.as_str().to_string()).collect(),
            created_at: None,
        }
    }
}

fn not_found(what: &str) -> TrackerError {
    TrackerError::Remote {
        status: Some(404),
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn authenticated_login(&self) -> Result<Username, TrackerError> {
        match &self.login {
            LoginBehaviour::Valid(login) => Ok(Username::new(*login).unwrap()),
            LoginBehaviour::Rejected => Err(TrackerError::CredentialsRejected {
                message: "bad credentials".into(),
            }),
            LoginBehaviour::Unreachable => Err(TrackerError::Transport {
                message: "connection refused".into(),
                source: None,
            }),
        }
    }

    async fn fetch_issue(
        &self,
        repository: &RepositoryId,
        number: IssueNumber,
    ) -> Result<IssueRecord, TrackerError> {
        let repos = self.repos.lock().unwrap();
        let repo = repos
            .get(&repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        let stored = repo
            .issues
            .get(&number.as_u64())
            .ok_or_else(|| not_found("issue"))?;
        Ok(Self::record(repository, number.as_u64(), stored))
    }

    async fn create_issue(
        &self,
        repository: &RepositoryId,
        title: &str,
        body: &str,
    ) -> Result<IssueRecord, TrackerError> {
        let mut repos = self.repos.lock().unwrap();
        let repo = repos
            .get_mut(&repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        let number = repo.next_number;
        repo.next_number += 1;
        let stored = StoredIssue {
            title: title.to_string(),
            body: body.to_string(),
            labels: Vec::new(),
            assignees: Vec::new(),
            comments: Vec::new(),
        };
        let record = Self::record(repository, number, &stored);
        repo.issues.insert(number, stored);
        Ok(record)
    }

    async fn post_comment(
        &self,
        issue: &IssueRef,
        body: &str,
    ) -> Result<CommentRecord, TrackerError> {
        let mut repos = self.repos.lock().unwrap();
        let repo = repos
            .get_mut(&issue.repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        let stored = repo
            .issues
            .get_mut(&issue.number.as_u64())
            .ok_or_else(|| not_found("issue"))?;
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst) as u64;
        stored.comments.push((id, body.to_string()));
        Ok(CommentRecord {
            issue: issue.clone(),
            id,
            body: body.to_string(),
            author: None,
            created_at: None,
        })
    }

    async fn add_assignee(
        &self,
        issue: &IssueRef,
        username: &Username,
    ) -> Result<(), TrackerError> {
        let mut repos = self.repos.lock().unwrap();
        let repo = repos
            .get_mut(&issue.repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        let stored = repo
            .issues
            .get_mut(&issue.number.as_u64())
            .ok_or_else(|| not_found("issue"))?;
        stored.assignees.push(username.clone());
        Ok(())
    }

    async fn repository_labels(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<LabelName>, TrackerError> {
        let repos = self.repos.lock().unwrap();
        let repo = repos
            .get(&repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        Ok(repo.labels.clone())
    }

    async fn create_label(
        &self,
        repository: &RepositoryId,
        label: &LabelName,
    ) -> Result<(), TrackerError> {
        self.create_label_calls.fetch_add(1, Ordering::SeqCst);
        let mut repos = self.repos.lock().unwrap();
        let repo = repos
            .get_mut(&repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        if repo.labels.contains(label) {
            return Err(TrackerError::Remote {
                status: Some(422),
                message: "label already exists".into(),
            });
        }
        repo.labels.push(label.clone());
        Ok(())
    }

    async fn issue_labels(&self, issue: &IssueRef) -> Result<Vec<LabelName>, TrackerError> {
        let repos = self.repos.lock().unwrap();
        let repo = repos
            .get(&issue.repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        let stored = repo
            .issues
            .get(&issue.number.as_u64())
            .ok_or_else(|| not_found("issue"))?;
        Ok(stored.labels.clone())
    }

    async fn apply_label(&self, issue: &IssueRef, label: &LabelName) -> Result<(), TrackerError> {
        self.apply_label_calls.fetch_add(1, Ordering::SeqCst);
        let mut repos = self.repos.lock().unwrap();
        let repo = repos
            .get_mut(&issue.repository.to_string())
            .ok_or_else(|| not_found("repository"))?;
        if !repo.labels.contains(label) {
            return Err(not_found("label"));
        }
        let stored = repo
            .issues
            .get_mut(&issue.number.as_u64())
            .ok_or_else(|| not_found("issue"))?;
        if !stored.labels.contains(label) {
            stored.labels.push(label.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

struct FakeConnector {
    tracker: Arc<FakeTracker>,
}

#[async_trait]
impl TrackerConnector for FakeConnector {
    async fn connect(&self, credentials: &Credentials) -> Result<ClientHandle, TrackerError> {
        assert!(!credentials.is_anonymous());
        let handle: ClientHandle = self.tracker.clone();
        Ok(handle)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn login_config() -> PlatformConfig {
    PlatformConfig {
        username: Some("bot".into()),
        password: Some("s3cr3t".into()),
        oauth_token: None,
    }
}

fn token_config(token: &str) -> PlatformConfig {
    PlatformConfig {
        username: None,
        password: None,
        oauth_token: Some(token.into()),
    }
}

fn repo() -> RepositoryId {
    RepositoryId::new("acme", "repo1").unwrap()
}

async fn started_platform(tracker: Arc<FakeTracker>) -> TrackerPlatform {
    let connector = FakeConnector { tracker };
    TrackerPlatform::start(&login_config(), &connector)
        .await
        .expect("start succeeds")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_conversation_flow_against_one_issue() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot")).with_repo(&repo());
    let platform = started_platform(tracker.clone()).await;
    assert!(platform.is_authenticated());
    assert!(platform.startup_error().is_none());

    let ctx = ExecutionContext::new("conversation-1").unwrap();

    let issue = platform
        .open_issue(&ctx, "acme", "repo1", "Bug", "desc")
        .await
        .unwrap();
    assert_eq!(issue.title, "Bug");
    assert_eq!(issue.body, "desc");

    let issue_ref = issue.issue_ref();
    let comment = platform.comment_issue(&ctx, &issue_ref, "ack").await.unwrap();
    assert_eq!(comment.body, "ack");

    let label = platform.set_label(&ctx, &issue_ref, "bug").await.unwrap();
    assert_eq!(label.as_str(), "bug");
    assert_eq!(tracker.create_label_calls.load(Ordering::SeqCst), 1);

    let assigned = platform.assign_user(&ctx, &issue_ref, "alice").await.unwrap();
    assert_eq!(assigned.as_str(), "alice");
}

#[tokio::test]
async fn set_label_twice_is_idempotent() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot")).with_repo(&repo());
    let platform = started_platform(tracker.clone()).await;
    let ctx = ExecutionContext::new_random();

    let issue = platform
        .open_issue(&ctx, "acme", "repo1", "Bug", "desc")
        .await
        .unwrap();
    let issue_ref = issue.issue_ref();

    let first = platform.set_label(&ctx, &issue_ref, "bug").await.unwrap();
    let second = platform.set_label(&ctx, &issue_ref, "bug").await.unwrap();
    assert_eq!(first, second);
    // The label was created once and applied once; the second call was a
    // pure read.
    assert_eq!(tracker.create_label_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.apply_label_calls.load(Ordering::SeqCst), 1);

    let after = platform.get_issue(&ctx, "acme", "repo1", 1).await.unwrap();
    assert_eq!(after.labels, vec!["bug".to_string()]);
}

#[tokio::test]
async fn get_issue_reads_back_what_open_issue_wrote() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot")).with_repo(&repo());
    let platform = started_platform(tracker).await;
    let ctx = ExecutionContext::new_random();

    let opened = platform
        .open_issue(&ctx, "acme", "repo1", "Bug", "desc")
        .await
        .unwrap();
    let fetched = platform
        .get_issue(&ctx, "acme", "repo1", opened.number.as_u64())
        .await
        .unwrap();
    assert_eq!(fetched.number, opened.number);
    assert_eq!(fetched.title, opened.title);
}

#[tokio::test]
async fn bad_token_degrades_to_client_not_initialized() {
    let tracker = FakeTracker::new(LoginBehaviour::Rejected);
    let connector = FakeConnector { tracker };
    let platform = TrackerPlatform::start(&token_config("bad-token"), &connector)
        .await
        .expect("auth failure does not fail construction");

    assert!(!platform.is_authenticated());
    assert!(matches!(
        platform.startup_error(),
        Some(PlatformError::Auth { .. })
    ));

    let ctx = ExecutionContext::new_random();
    let err = platform.get_issue(&ctx, "acme", "repo1", 1).await.unwrap_err();
    assert!(matches!(err, PlatformError::ClientNotInitialized));
    assert!(matches!(
        platform.client(),
        Err(PlatformError::ClientNotInitialized)
    ));
}

#[tokio::test]
async fn unreachable_tracker_records_a_network_failure() {
    let tracker = FakeTracker::new(LoginBehaviour::Unreachable);
    let connector = FakeConnector { tracker };
    let platform = TrackerPlatform::start(&token_config("tok"), &connector)
        .await
        .unwrap();
    assert!(matches!(
        platform.startup_error(),
        Some(PlatformError::Network { .. })
    ));
}

#[tokio::test]
async fn anonymous_platform_constructs_but_cannot_act() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot"));
    let connector = FakeConnector { tracker };
    let platform = TrackerPlatform::start(&PlatformConfig::default(), &connector)
        .await
        .unwrap();
    assert!(!platform.is_authenticated());
    assert!(platform.startup_error().is_none());

    let ctx = ExecutionContext::new_random();
    let err = platform
        .comment_issue(
            &ctx,
            &IssueRef::new(repo(), IssueNumber::new(1)),
            "hello",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::ClientNotInitialized));
}

#[tokio::test]
async fn username_without_password_fails_construction() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot"));
    let connector = FakeConnector { tracker };
    let config = PlatformConfig {
        username: Some("bot".into()),
        password: None,
        oauth_token: Some("tok".into()),
    };
    let err = TrackerPlatform::start(&config, &connector).await.unwrap_err();
    assert!(matches!(err, PlatformError::Configuration { .. }));
}

#[tokio::test]
async fn remote_rejections_surface_with_their_cause() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot")).with_repo(&repo());
    let platform = started_platform(tracker).await;
    let ctx = ExecutionContext::new_random();

    let err = platform.get_issue(&ctx, "acme", "repo1", 99).await.unwrap_err();
    match err {
        PlatformError::RemoteOperation { action, source } => {
            assert_eq!(action, platform::ActionKind::GetIssue);
            assert!(source.to_string().contains("issue not found"));
        }
        other => panic!("expected a remote-operation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn engine_seam_executes_raw_descriptors() {
    let tracker = FakeTracker::new(LoginBehaviour::Valid("bot")).with_repo(&repo());
    let platform = started_platform(tracker).await;
    let engine_view: &dyn Platform = &platform;

    let ctx = ExecutionContext::new("turn-42").unwrap();
    let action = Action::open_issue("acme", "repo1", "Bug", "desc").unwrap();
    let envelope = engine_view.execute_action(&ctx, &action).await;
    assert!(envelope.is_success());
    let issue = envelope.into_issue().unwrap();
    assert_eq!(issue.title, "Bug");
}
