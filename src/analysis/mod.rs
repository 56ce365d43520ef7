//! Consumers of the repository gateway
//!
//! - Concurrent report collection with a configurable join policy
//! - Statistics computed from fetched records

pub mod overview;
pub mod stats;

pub use overview::{
    collect_report, collect_statistics, JoinPolicy, RepositoryReport, Section, Statistics,
};
pub use stats::{
    commit_activity_summary, issue_analytics, language_breakdown, monthly_commits,
    pull_request_stats, ActivitySummary, IssueAnalytics, LanguageShare, PullRequestStats,
};
