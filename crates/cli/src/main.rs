//! issue_works CLI entry point.
//!
//! This binary is the composition root for the whole system:
//!
//! 1. **Parse configuration** — load the TOML credentials file.
//! 2. **Wire observability** — install `tracing-subscriber` with an
//!    env-filter layer; all spans and events from every crate in the
//!    workspace flow through it.
//! 3. **Construct infrastructure** — create the GitHub connector and start
//!    the platform (credential resolution plus one-time validation).
//! 4. **Execute** — run the requested operation once and print the result,
//!    records as JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use github::GithubConnector;
use platform::{ExecutionContext, IssueNumber, IssueRef, PlatformConfig, RepositoryId, TrackerPlatform};

#[derive(Debug, Parser)]
#[command(name = "issueworks", about = "Invoke issue-tracker operations under one authenticated session.")]
struct Cli {
    /// Path to the TOML configuration file holding tracker credentials.
    #[arg(long, default_value = ".issueworks/config.toml")]
    config: PathBuf,

    /// Correlation token attached to the operation; generated when absent.
    #[arg(long)]
    context: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Retrieve an issue and print it as JSON.
    GetIssue {
        owner: String,
        repository: String,
        number: u64,
    },
    /// Open a new issue and print it as JSON.
    OpenIssue {
        owner: String,
        repository: String,
        title: String,
        #[arg(default_value = "")]
        body: String,
    },
    /// Post a comment on an issue and print it as JSON.
    CommentIssue {
        owner: String,
        repository: String,
        number: u64,
        body: String,
    },
    /// Assign a user to an issue.
    AssignUser {
        owner: String,
        repository: String,
        number: u64,
        username: String,
    },
    /// Apply a label to an issue, creating it on the repository when absent.
    SetLabel {
        owner: String,
        repository: String,
        number: u64,
        label: String,
    },
}

/// Root of the TOML configuration file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    tracker: PlatformConfig,
}

fn load_config(path: &Path) -> anyhow::Result<FileConfig> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "configuration file not found, starting without credentials");
        return Ok(FileConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse configuration file {}", path.display()))
}

fn issue_ref(owner: &str, repository: &str, number: u64) -> anyhow::Result<IssueRef> {
    let repository = RepositoryId::new(owner, repository)
        .context("repository owner and name must not be empty")?;
    Ok(IssueRef::new(repository, IssueNumber::new(number)))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(platform: &TrackerPlatform, context: &ExecutionContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::GetIssue {
            owner,
            repository,
            number,
        } => {
            let issue = platform.get_issue(context, &owner, &repository, number).await?;
            print_json(&issue)
        }
        Command::OpenIssue {
            owner,
            repository,
            title,
            body,
        } => {
            let issue = platform
                .open_issue(context, &owner, &repository, &title, &body)
                .await?;
            print_json(&issue)
        }
        Command::CommentIssue {
            owner,
            repository,
            number,
            body,
        } => {
            let issue = issue_ref(&owner, &repository, number)?;
            let comment = platform.comment_issue(context, &issue, &body).await?;
            print_json(&comment)
        }
        Command::AssignUser {
            owner,
            repository,
            number,
            username,
        } => {
            let issue = issue_ref(&owner, &repository, number)?;
            let assigned = platform.assign_user(context, &issue, &username).await?;
            println!("{assigned}");
            Ok(())
        }
        Command::SetLabel {
            owner,
            repository,
            number,
            label,
        } => {
            let issue = issue_ref(&owner, &repository, number)?;
            let applied = platform.set_label(context, &issue, &label).await?;
            println!("{applied}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let connector = GithubConnector::new();
    let platform = TrackerPlatform::start(&config.tracker, &connector).await?;
    if let Some(error) = platform.startup_error() {
        anyhow::bail!("tracker start-up validation failed: {error}");
    }

    let context = match cli.context {
        Some(token) => ExecutionContext::new(token).context("--context must not be empty")?,
        None => ExecutionContext::new_random(),
    };

    run(&platform, &context, cli.command).await
}
