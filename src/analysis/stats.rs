//! Pure statistics over gateway payloads
//!
//! Nothing here touches the network; every function takes already-fetched
//! records so it can be exercised with literal fixtures.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

use crate::github::types::{CommitActivity, Commit, Issue, LanguageMap, PullRequest};

/// Languages listed individually before the rest is folded into "Others"
pub const TOP_LANGUAGES: usize = 10;

/// Window for "recent" issues
pub const RECENT_ISSUE_DAYS: i64 = 30;

const TOP_AUTHORS: usize = 5;
const TOP_LABELS: usize = 8;
const OTHERS: &str = "Others";

/// One slice of the language chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
    /// Share of the total, 0-100
    pub percentage: f64,
}

/// Languages by size, largest first, with the long tail grouped as "Others"
pub fn language_breakdown(languages: &LanguageMap) -> Vec<LanguageShare> {
    let total: u64 = languages.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let share = |name: String, bytes: u64| LanguageShare {
        name,
        bytes,
        percentage: bytes as f64 * 100.0 / total as f64,
    };

    let mut sorted: Vec<(&String, &u64)> = languages.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut shares: Vec<LanguageShare> = sorted
        .iter()
        .take(TOP_LANGUAGES)
        .map(|(name, bytes)| share((*name).clone(), **bytes))
        .collect();

    let others: u64 = sorted.iter().skip(TOP_LANGUAGES).map(|(_, b)| **b).sum();
    if others > 0 {
        shares.push(share(OTHERS.to_string(), others));
    }

    shares
}

/// Summary of a repository's issues
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueAnalytics {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    /// Created within the last [`RECENT_ISSUE_DAYS`] days
    pub recent: usize,
    /// Mean days from creation to close, over closed issues with a close date
    pub average_resolution_days: Option<f64>,
    pub top_authors: Vec<(String, usize)>,
    pub top_labels: Vec<(String, usize)>,
}

/// Issue analytics relative to `now`
///
/// GitHub's issue listing includes pull requests; they are skipped here.
pub fn issue_analytics(issues: &[Issue], now: DateTime<Utc>) -> IssueAnalytics {
    let issues: Vec<&Issue> = issues.iter().filter(|i| !i.is_pull_request()).collect();
    let cutoff = now - Duration::days(RECENT_ISSUE_DAYS);

    let open = issues.iter().filter(|i| i.state == "open").count();
    let closed = issues.iter().filter(|i| i.state == "closed").count();
    let recent = issues.iter().filter(|i| i.created_at >= cutoff).count();

    let resolution_days: Vec<f64> = issues
        .iter()
        .filter(|i| i.state == "closed")
        .filter_map(|i| {
            let closed_at = i.closed_at?;
            Some((closed_at - i.created_at).num_seconds() as f64 / 86_400.0)
        })
        .collect();
    let average_resolution_days = if resolution_days.is_empty() {
        None
    } else {
        Some(resolution_days.iter().sum::<f64>() / resolution_days.len() as f64)
    };

    let authors = issues
        .iter()
        .filter_map(|i| i.user.as_ref().map(|u| u.login.as_str()));
    let labels = issues
        .iter()
        .flat_map(|i| i.labels.iter().map(|l| l.name.as_str()));

    IssueAnalytics {
        total: issues.len(),
        open,
        closed,
        recent,
        average_resolution_days,
        top_authors: top_counts(authors, TOP_AUTHORS),
        top_labels: top_counts(labels, TOP_LABELS),
    }
}

/// Most frequent values, ties broken alphabetically
fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
        .into_iter()
        .take(limit)
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

/// Pull request counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestStats {
    pub total: usize,
    pub open: usize,
    /// Closed, merged or not
    pub closed: usize,
    pub merged: usize,
}

pub fn pull_request_stats(pulls: &[PullRequest]) -> PullRequestStats {
    PullRequestStats {
        total: pulls.len(),
        open: pulls.iter().filter(|p| p.state == "open").count(),
        closed: pulls.iter().filter(|p| p.state == "closed").count(),
        merged: pulls.iter().filter(|p| p.merged_at.is_some()).count(),
    }
}

/// Commits per calendar month (`YYYY-MM`), oldest first
///
/// Commits without an author date are ignored.
pub fn monthly_commits(commits: &[Commit]) -> Vec<(String, usize)> {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for date in commits.iter().filter_map(Commit::authored_at) {
        *months.entry((date.year(), date.month())).or_default() += 1;
    }
    months
        .into_iter()
        .map(|((year, month), count)| (format!("{:04}-{:02}", year, month), count))
        .collect()
}

/// Headline numbers from the weekly commit series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActivitySummary {
    /// Statistics not yet available
    Pending,
    Ready {
        total_commits: u64,
        active_weeks: usize,
        /// Start of the busiest week (unix seconds) and its commit count
        busiest_week: Option<(i64, u64)>,
    },
}

pub fn commit_activity_summary(activity: &CommitActivity) -> ActivitySummary {
    if activity.is_pending() {
        return ActivitySummary::Pending;
    }

    let weeks = activity.weeks();
    let busiest_week = weeks
        .iter()
        .filter(|w| w.total > 0)
        .max_by(|a, b| a.total.cmp(&b.total).then_with(|| b.week.cmp(&a.week)))
        .map(|w| (w.week, w.total));

    ActivitySummary::Ready {
        total_commits: weeks.iter().map(|w| w.total).sum(),
        active_weeks: weeks.iter().filter(|w| w.total > 0).count(),
        busiest_week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::WeeklyActivity;
    use chrono::TimeZone;
    use serde_json::json;

    fn issue(value: serde_json::Value) -> Issue {
        serde_json::from_value(value).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_language_breakdown_sorted_with_percentages() {
        let languages: LanguageMap =
            [("Rust".to_string(), 750), ("Shell".to_string(), 250)].into();
        let shares = language_breakdown(&languages);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].name, "Rust");
        assert!((shares[0].percentage - 75.0).abs() < f64::EPSILON);
        assert!((shares[1].percentage - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_language_breakdown_groups_long_tail() {
        let languages: LanguageMap = (0..12u64)
            .map(|i| (format!("Lang{:02}", i), 100 - i))
            .collect();
        let shares = language_breakdown(&languages);

        assert_eq!(shares.len(), TOP_LANGUAGES + 1);
        assert_eq!(shares[0].name, "Lang00");
        let others = shares.last().unwrap();
        assert_eq!(others.name, "Others");
        assert_eq!(others.bytes, 90 + 89);
    }

    #[test]
    fn test_language_breakdown_empty() {
        assert!(language_breakdown(&LanguageMap::new()).is_empty());
        let zero: LanguageMap = [("Rust".to_string(), 0)].into();
        assert!(language_breakdown(&zero).is_empty());
    }

    #[test]
    fn test_issue_analytics() {
        let issues = vec![
            issue(json!({
                "id": 1, "number": 1, "title": "crash", "state": "open",
                "user": {"login": "alice", "id": 1},
                "labels": [{"name": "bug"}],
                "created_at": "2024-06-20T00:00:00Z"
            })),
            issue(json!({
                "id": 2, "number": 2, "title": "old", "state": "closed",
                "user": {"login": "alice", "id": 1},
                "labels": [{"name": "bug"}, {"name": "docs"}],
                "created_at": "2024-01-01T00:00:00Z",
                "closed_at": "2024-01-05T00:00:00Z"
            })),
            issue(json!({
                "id": 3, "number": 3, "title": "other", "state": "closed",
                "user": {"login": "bob", "id": 2},
                "created_at": "2024-02-01T00:00:00Z",
                "closed_at": "2024-02-03T00:00:00Z"
            })),
            issue(json!({
                "id": 4, "number": 4, "title": "a pr", "state": "open",
                "user": {"login": "carol", "id": 3},
                "created_at": "2024-06-29T00:00:00Z",
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/4"}
            })),
        ];

        let analytics = issue_analytics(&issues, now());
        assert_eq!(analytics.total, 3);
        assert_eq!(analytics.open, 1);
        assert_eq!(analytics.closed, 2);
        assert_eq!(analytics.recent, 1);
        assert_eq!(analytics.average_resolution_days, Some(3.0));
        assert_eq!(
            analytics.top_authors,
            vec![("alice".to_string(), 2), ("bob".to_string(), 1)]
        );
        assert_eq!(analytics.top_labels[0], ("bug".to_string(), 2));
    }

    #[test]
    fn test_issue_analytics_without_closed_issues() {
        let analytics = issue_analytics(&[], now());
        assert_eq!(analytics.total, 0);
        assert_eq!(analytics.average_resolution_days, None);
        assert!(analytics.top_authors.is_empty());
    }

    #[test]
    fn test_pull_request_stats() {
        let pulls: Vec<PullRequest> = serde_json::from_value(json!([
            {"id": 1, "number": 1, "title": "a", "state": "open",
             "created_at": "2024-01-01T00:00:00Z"},
            {"id": 2, "number": 2, "title": "b", "state": "closed",
             "created_at": "2024-01-01T00:00:00Z",
             "closed_at": "2024-01-02T00:00:00Z",
             "merged_at": "2024-01-02T00:00:00Z"},
            {"id": 3, "number": 3, "title": "c", "state": "closed",
             "created_at": "2024-01-01T00:00:00Z",
             "closed_at": "2024-01-03T00:00:00Z"}
        ]))
        .unwrap();

        assert_eq!(
            pull_request_stats(&pulls),
            PullRequestStats {
                total: 3,
                open: 1,
                closed: 2,
                merged: 1
            }
        );
    }

    #[test]
    fn test_monthly_commits_chronological() {
        let commits: Vec<Commit> = serde_json::from_value(json!([
            {"sha": "c", "commit": {"message": "m", "author": {"date": "2024-03-02T00:00:00Z"}}},
            {"sha": "b", "commit": {"message": "m", "author": {"date": "2023-12-31T00:00:00Z"}}},
            {"sha": "a", "commit": {"message": "m", "author": {"date": "2024-03-01T00:00:00Z"}}},
            {"sha": "d", "commit": {"message": "m"}}
        ]))
        .unwrap();

        assert_eq!(
            monthly_commits(&commits),
            vec![("2023-12".to_string(), 1), ("2024-03".to_string(), 2)]
        );
    }

    #[test]
    fn test_commit_activity_summary() {
        assert_eq!(
            commit_activity_summary(&CommitActivity::Pending),
            ActivitySummary::Pending
        );
        assert_eq!(
            commit_activity_summary(&CommitActivity::Weeks(Vec::new())),
            ActivitySummary::Pending
        );

        let week = |week: i64, total: u64| WeeklyActivity {
            total,
            week,
            days: vec![total, 0, 0, 0, 0, 0, 0],
            extra: serde_json::Map::new(),
        };
        let activity = CommitActivity::Weeks(vec![week(100, 3), week(200, 0), week(300, 7)]);
        assert_eq!(
            commit_activity_summary(&activity),
            ActivitySummary::Ready {
                total_commits: 10,
                active_weeks: 2,
                busiest_week: Some((300, 7)),
            }
        );
    }
}
