//! Records returned by the repository gateway
//!
//! These mirror GitHub's response shapes. Fields that consumers read are
//! typed; everything else, at every nesting level, lands in a flattened
//! `extra` map so nothing the API sent is dropped on the way through.
//! Optional fields the API left out stay out when a record is re-encoded;
//! an explicit `null` in one of them re-encodes as an absent key.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Language name → bytes of code, exactly as GitHub reports it
pub type LanguageMap = BTreeMap<String, u64>;

/// A user or organization as embedded in other records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Account,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /repos/{owner}/{repo}/contributors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default)]
    pub contributions: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Git-level author or committer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<GitSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<GitSignature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
    /// GitHub account of the author; absent when the email is not linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Commit {
    /// Authoring date from the git metadata
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /repos/{owner}/{repo}/issues`
///
/// The listing includes pull requests; see [`Issue::is_pull_request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Account>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub comments: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Present only when this entry is a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issue {
    /// Whether this entry is a pull request listed through the issues endpoint
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Account>,
    #[serde(default)]
    pub draft: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One week of `GET /repos/{owner}/{repo}/stats/commit_activity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyActivity {
    /// Commits in the week
    pub total: u64,
    /// Start of the week, Unix seconds
    pub week: i64,
    /// Commits per day, Sunday first
    #[serde(default)]
    pub days: Vec<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of the commit activity endpoint
///
/// GitHub computes these statistics asynchronously. While it does, the
/// endpoint answers `202 Accepted` (or an empty/`null` body). That is a
/// pending state, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "weeks", rename_all = "snake_case")]
pub enum CommitActivity {
    /// Statistics are still being computed
    Pending,
    /// The weekly series as returned, possibly empty
    Weeks(Vec<WeeklyActivity>),
}

impl CommitActivity {
    /// True while there is nothing to show yet
    pub fn is_pending(&self) -> bool {
        match self {
            CommitActivity::Pending => true,
            CommitActivity::Weeks(weeks) => weeks.is_empty(),
        }
    }

    /// The weekly series, empty while pending
    pub fn weeks(&self) -> &[WeeklyActivity] {
        match self {
            CommitActivity::Pending => &[],
            CommitActivity::Weeks(weeks) => weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_keeps_unknown_fields() {
        let payload = json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": {"login": "octocat", "id": 1},
            "html_url": "https://github.com/octocat/Hello-World",
            "stargazers_count": 80,
            "subscribers_count": 42,
            "network_count": 0
        });
        let repo: Repository = serde_json::from_value(payload).unwrap();
        assert_eq!(repo.stargazers_count, 80);
        assert_eq!(repo.extra.get("subscribers_count"), Some(&json!(42)));
        assert_eq!(repo.extra.get("network_count"), Some(&json!(0)));
        assert!(!repo.extra.contains_key("name"));
    }

    #[test]
    fn test_repository_round_trips_nested_records() {
        let payload = json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": {
                "login": "octocat",
                "id": 1,
                "type": "Organization",
                "node_id": "MDQ6",
                "site_admin": false
            },
            "html_url": "https://github.com/octocat/Hello-World",
            "private": false,
            "fork": false,
            "archived": false,
            "stargazers_count": 80,
            "watchers_count": 80,
            "forks_count": 9,
            "open_issues_count": 0,
            "size": 108,
            "topics": ["octocat"],
            "license": {
                "key": "mit",
                "name": "MIT License",
                "spdx_id": "MIT",
                "url": "https://api.github.com/licenses/mit",
                "node_id": "MDc6"
            }
        });

        let repo: Repository = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(repo.owner.extra.get("type"), Some(&json!("Organization")));
        assert_eq!(
            repo.license.as_ref().and_then(|l| l.spdx_id.as_deref()),
            Some("MIT")
        );
        assert_eq!(serde_json::to_value(&repo).unwrap(), payload);
    }

    #[test]
    fn test_commit_and_labels_keep_nested_fields() {
        let commit_payload = json!({
            "sha": "6dcb09b",
            "commit": {
                "message": "Fix all the bugs",
                "author": {"name": "Monalisa", "email": "m@example.com", "date": "2024-01-02T10:00:00Z"},
                "tree": {"sha": "827efc6d", "url": "https://api.github.com/t"},
                "verification": {"verified": false, "reason": "unsigned"}
            }
        });
        let commit: Commit = serde_json::from_value(commit_payload.clone()).unwrap();
        assert!(commit.commit.extra.contains_key("verification"));
        assert_eq!(serde_json::to_value(&commit).unwrap(), commit_payload);

        let label: Label = serde_json::from_value(json!({
            "id": 208045946, "name": "bug", "color": "f29513", "description": "Something isn't working"
        }))
        .unwrap();
        assert_eq!(label.extra.get("id"), Some(&json!(208045946)));
    }

    #[test]
    fn test_issue_pull_request_marker() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 1, "number": 7, "title": "Add feature", "state": "open",
            "created_at": "2024-01-02T03:04:05Z",
            "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/7"}
        }))
        .unwrap();
        assert!(issue.is_pull_request());

        let plain: Issue = serde_json::from_value(json!({
            "id": 2, "number": 8, "title": "Bug", "state": "closed",
            "created_at": "2024-01-02T03:04:05Z",
            "closed_at": "2024-01-04T03:04:05Z"
        }))
        .unwrap();
        assert!(!plain.is_pull_request());
        assert!(plain.closed_at.is_some());
    }

    #[test]
    fn test_commit_activity_pending() {
        assert!(CommitActivity::Pending.is_pending());
        assert!(CommitActivity::Weeks(vec![]).is_pending());
        let weeks = CommitActivity::Weeks(vec![WeeklyActivity {
            total: 3,
            week: 1_700_000_000,
            days: vec![0, 1, 2, 0, 0, 0, 0],
            extra: Map::new(),
        }]);
        assert!(!weeks.is_pending());
        assert_eq!(weeks.weeks().len(), 1);
    }
}
