//! Fan-out/join over the gateway
//!
//! A report first fetches the repository itself, since everything else is
//! pointless when that fails, then issues the remaining calls concurrently.
//! How a failure in one of those calls affects the rest is the caller's
//! choice of [`JoinPolicy`].

use futures::{join, try_join};

use crate::github::error_handler::GitHubError;
use crate::github::gateway::{GatewayResult, ItemState, RepositoryHandler};
use crate::github::types::{
    CommitActivity, Commit, Contributor, Issue, LanguageMap, PullRequest, Release, Repository,
};

/// Outcome of one independently fetched part of a report
pub type Section<T> = Result<T, GitHubError>;

/// How concurrent calls are joined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinPolicy {
    /// The first failure fails the whole join
    #[default]
    AllOrNothing,
    /// Every call runs to completion and keeps its own result
    BestEffort,
}

/// Languages, issues and pull requests fetched together
#[derive(Debug)]
pub struct Statistics {
    pub languages: Section<LanguageMap>,
    pub issues: Section<Vec<Issue>>,
    pub pull_requests: Section<Vec<PullRequest>>,
}

/// Everything the gateway knows about one repository
#[derive(Debug)]
pub struct RepositoryReport {
    pub repository: Repository,
    pub contributors: Section<Vec<Contributor>>,
    pub commits: Section<Vec<Commit>>,
    pub languages: Section<LanguageMap>,
    pub issues: Section<Vec<Issue>>,
    pub pull_requests: Section<Vec<PullRequest>>,
    pub releases: Section<Vec<Release>>,
    pub commit_activity: Section<CommitActivity>,
}

impl RepositoryReport {
    /// Sections that failed, with their names
    pub fn failures(&self) -> Vec<(&'static str, &GitHubError)> {
        [
            ("contributors", self.contributors.as_ref().err()),
            ("commits", self.commits.as_ref().err()),
            ("languages", self.languages.as_ref().err()),
            ("issues", self.issues.as_ref().err()),
            ("pull requests", self.pull_requests.as_ref().err()),
            ("releases", self.releases.as_ref().err()),
            ("commit activity", self.commit_activity.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(name, err)| err.map(|e| (name, e)))
        .collect()
    }
}

/// Fetch languages, issues and pull requests concurrently
///
/// With [`JoinPolicy::AllOrNothing`] the first failure is returned and the
/// other calls are dropped. With [`JoinPolicy::BestEffort`] this never fails;
/// each section carries its own result.
pub async fn collect_statistics(
    handler: &RepositoryHandler<'_>,
    owner: &str,
    repo: &str,
    per_page: u8,
    policy: JoinPolicy,
) -> GatewayResult<Statistics> {
    let languages = handler.get_languages(owner, repo);
    let issues = handler.get_issues(owner, repo, per_page, ItemState::All);
    let pull_requests = handler.get_pull_requests(owner, repo, per_page, ItemState::All);

    match policy {
        JoinPolicy::AllOrNothing => {
            let (languages, issues, pull_requests) = try_join!(languages, issues, pull_requests)?;
            Ok(Statistics {
                languages: Ok(languages),
                issues: Ok(issues),
                pull_requests: Ok(pull_requests),
            })
        }
        JoinPolicy::BestEffort => {
            let (languages, issues, pull_requests) = join!(languages, issues, pull_requests);
            Ok(Statistics {
                languages,
                issues,
                pull_requests,
            })
        }
    }
}

/// Fetch the repository, then every other resource concurrently
///
/// A failure fetching the repository itself is always returned, whatever
/// the policy.
pub async fn collect_report(
    handler: &RepositoryHandler<'_>,
    owner: &str,
    repo: &str,
    per_page: u8,
    policy: JoinPolicy,
) -> GatewayResult<RepositoryReport> {
    let repository = handler.get_repository(owner, repo).await?;
    tracing::debug!("Fetched {}, fanning out", repository.full_name);

    let contributors = handler.get_contributors(owner, repo, per_page);
    let commits = handler.get_commits(owner, repo, per_page, None);
    let languages = handler.get_languages(owner, repo);
    let issues = handler.get_issues(owner, repo, per_page, ItemState::All);
    let pull_requests = handler.get_pull_requests(owner, repo, per_page, ItemState::All);
    let releases = handler.get_releases(owner, repo, per_page);
    let commit_activity = handler.get_weekly_commit_activity(owner, repo);

    let report = match policy {
        JoinPolicy::AllOrNothing => {
            let (contributors, commits, languages, issues, pull_requests, releases, activity) = try_join!(
                contributors,
                commits,
                languages,
                issues,
                pull_requests,
                releases,
                commit_activity
            )?;
            RepositoryReport {
                repository,
                contributors: Ok(contributors),
                commits: Ok(commits),
                languages: Ok(languages),
                issues: Ok(issues),
                pull_requests: Ok(pull_requests),
                releases: Ok(releases),
                commit_activity: Ok(activity),
            }
        }
        JoinPolicy::BestEffort => {
            let (contributors, commits, languages, issues, pull_requests, releases, activity) = join!(
                contributors,
                commits,
                languages,
                issues,
                pull_requests,
                releases,
                commit_activity
            );
            RepositoryReport {
                repository,
                contributors,
                commits,
                languages,
                issues,
                pull_requests,
                releases,
                commit_activity: activity,
            }
        }
    };

    for (section, err) in report.failures() {
        tracing::debug!("Section {} failed ({}): {}", section, err.kind, err.message);
    }

    Ok(report)
}
