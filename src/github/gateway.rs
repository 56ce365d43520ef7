//! Repository data operations
//!
//! One method per upstream resource. Each issues a single GET, feeds the
//! rate limit observer on success and returns the decoded payload without
//! reshaping it. There is no retry, caching or de-duplication here: two
//! concurrent calls for the same resource are two network requests.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde_json::Value;

use crate::github::client::{decode, GitHubClient};
use crate::github::error_handler::{classify_failure, FailureDescriptor, GitHubError};
use crate::github::types::{
    CommitActivity, Commit, Contributor, Issue, LanguageMap, PullRequest, Release, Repository,
    WeeklyActivity,
};

/// Result of a gateway call
pub type GatewayResult<T> = std::result::Result<T, GitHubError>;

/// Default and maximum page size accepted by GitHub
pub const MAX_PER_PAGE: u8 = 100;

/// State filter for issue and pull request listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ItemState {
    Open,
    Closed,
    #[default]
    All,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
            ItemState::All => "all",
        }
    }
}

/// Repository operations handler
pub struct RepositoryHandler<'a> {
    client: &'a GitHubClient,
}

impl<'a> RepositoryHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Repository metadata
    pub async fn get_repository(&self, owner: &str, repo: &str) -> GatewayResult<Repository> {
        const ACTION: &str = "fetching repository data";
        check_names(owner, repo, ACTION)?;
        self.client
            .get_json(&["repos", owner, repo], &[], ACTION)
            .await
    }

    /// Contributors, most active first
    pub async fn get_contributors(
        &self,
        owner: &str,
        repo: &str,
        per_page: u8,
    ) -> GatewayResult<Vec<Contributor>> {
        const ACTION: &str = "fetching contributors";
        check_names(owner, repo, ACTION)?;
        self.client
            .get_list(
                &["repos", owner, repo, "contributors"],
                &[per_page_param(per_page)],
                ACTION,
            )
            .await
    }

    /// Commits on the default branch, optionally only those after `since`
    pub async fn get_commits(
        &self,
        owner: &str,
        repo: &str,
        per_page: u8,
        since: Option<DateTime<Utc>>,
    ) -> GatewayResult<Vec<Commit>> {
        const ACTION: &str = "fetching commits";
        check_names(owner, repo, ACTION)?;

        let mut query = vec![per_page_param(per_page)];
        if let Some(since) = since {
            query.push((
                "since",
                since.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }

        self.client
            .get_list(&["repos", owner, repo, "commits"], &query, ACTION)
            .await
    }

    /// Bytes of code per language
    pub async fn get_languages(&self, owner: &str, repo: &str) -> GatewayResult<LanguageMap> {
        const ACTION: &str = "fetching languages";
        check_names(owner, repo, ACTION)?;
        self.client
            .get_json(&["repos", owner, repo, "languages"], &[], ACTION)
            .await
    }

    /// Issues in the given state
    ///
    /// GitHub's issue listing includes pull requests. They are returned as-is;
    /// callers wanting an issues-only view filter with
    /// [`Issue::is_pull_request`].
    pub async fn get_issues(
        &self,
        owner: &str,
        repo: &str,
        per_page: u8,
        state: ItemState,
    ) -> GatewayResult<Vec<Issue>> {
        const ACTION: &str = "fetching issues";
        check_names(owner, repo, ACTION)?;
        self.client
            .get_list(
                &["repos", owner, repo, "issues"],
                &[per_page_param(per_page), state_param(state)],
                ACTION,
            )
            .await
    }

    /// Pull requests in the given state
    pub async fn get_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        per_page: u8,
        state: ItemState,
    ) -> GatewayResult<Vec<PullRequest>> {
        const ACTION: &str = "fetching pull requests";
        check_names(owner, repo, ACTION)?;
        self.client
            .get_list(
                &["repos", owner, repo, "pulls"],
                &[per_page_param(per_page), state_param(state)],
                ACTION,
            )
            .await
    }

    /// Releases, newest first
    pub async fn get_releases(
        &self,
        owner: &str,
        repo: &str,
        per_page: u8,
    ) -> GatewayResult<Vec<Release>> {
        const ACTION: &str = "fetching releases";
        check_names(owner, repo, ACTION)?;
        self.client
            .get_list(
                &["repos", owner, repo, "releases"],
                &[per_page_param(per_page)],
                ACTION,
            )
            .await
    }

    /// Last year of weekly commit totals
    ///
    /// `202 Accepted` and `null`/non-array bodies mean GitHub is still
    /// computing the statistics and yield [`CommitActivity::Pending`]. An
    /// empty array is returned as an empty series.
    pub async fn get_weekly_commit_activity(
        &self,
        owner: &str,
        repo: &str,
    ) -> GatewayResult<CommitActivity> {
        const ACTION: &str = "fetching weekly commit activity";
        check_names(owner, repo, ACTION)?;

        let response = self
            .client
            .get(&["repos", owner, repo, "stats", "commit_activity"], &[], ACTION)
            .await?;

        if response.status == StatusCode::ACCEPTED || response.body.trim().is_empty() {
            tracing::debug!("Commit activity for {}/{} is still being computed", owner, repo);
            return Ok(CommitActivity::Pending);
        }

        let value: Value = decode(&response, ACTION)?;
        if !value.is_array() {
            tracing::debug!(
                "Commit activity for {}/{} returned a non-array body, treating as pending",
                owner,
                repo
            );
            return Ok(CommitActivity::Pending);
        }

        let weeks: Vec<WeeklyActivity> = serde_json::from_value(value).map_err(|e| {
            classify_failure(
                &FailureDescriptor::undecodable(
                    response.status.as_u16(),
                    format!("invalid response body: {}", e),
                ),
                ACTION,
            )
        })?;
        Ok(CommitActivity::Weeks(weeks))
    }
}

/// Owner and repository must be single, non-empty path segments
fn check_names(owner: &str, repo: &str, action: &str) -> GatewayResult<()> {
    for (label, value) in [("owner", owner), ("repository", repo)] {
        if value.is_empty() || value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(classify_failure(
                &FailureDescriptor::not_sent(format!("invalid {} name '{}'", label, value)),
                action,
            ));
        }
    }
    Ok(())
}

fn per_page_param(per_page: u8) -> (&'static str, String) {
    ("per_page", per_page.clamp(1, MAX_PER_PAGE).to_string())
}

fn state_param(state: ItemState) -> (&'static str, String) {
    ("state", state.as_str().to_string())
}
