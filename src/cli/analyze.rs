//! Analyze command handler

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::analysis::{
    collect_report, commit_activity_summary, issue_analytics, language_breakdown,
    monthly_commits, pull_request_stats, ActivitySummary, JoinPolicy, RepositoryReport, Section,
};
use crate::cli::commands::AnalyzeArgs;
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::core::repository::parse_repository_input;
use crate::core::storage::LocalStore;
use crate::error::Result;
use crate::github::gateway::RepositoryHandler;
use crate::github::provider::ClientProvider;
use crate::github::rate_limit::RateLimitSnapshot;
use crate::github::retry::{with_retry, RetryConfig};

/// Contributors shown in the text report
const TOP_CONTRIBUTORS: usize = 5;

/// Handle `reposcope analyze`
pub async fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    // Reject bad input before touching the keyring or the network
    let target = parse_repository_input(&args.input)?;

    let config = Config::load()?;
    let provider = ClientProvider::new(CredentialStore::detect()?, config);
    let client = provider.client()?;
    let handler = RepositoryHandler::new(&client);

    let policy = if args.best_effort {
        JoinPolicy::BestEffort
    } else {
        JoinPolicy::AllOrNothing
    };

    let per_page = provider.config().per_page;
    let collect = || collect_report(&handler, &target.owner, &target.name, per_page, policy);
    let report = if args.retry {
        with_retry(collect, RetryConfig::default()).await?
    } else {
        collect().await?
    };

    let store = LocalStore::open_default(provider.config())?;
    if let Err(e) = store.add_to_history(&args.input, &target.owner, &target.name) {
        tracing::warn!("Could not update search history: {}", e);
    }
    if args.bookmark {
        store.add_bookmark(&report.repository)?;
    }

    let snapshot = client.rate_limit();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report, snapshot)?)?);
    } else {
        print_report(&report);
        print_rate_limit(snapshot, provider.rate_limit_info().label);
        if args.bookmark {
            println!("✓ Bookmarked {}", report.repository.full_name);
        }
    }

    Ok(())
}

fn print_report(report: &RepositoryReport) {
    let repo = &report.repository;

    println!("{}", repo.full_name);
    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {}", description);
    }
    println!(
        "  ★ {}  forks {}  watchers {}  open issues {}",
        repo.stargazers_count, repo.forks_count, repo.watchers_count, repo.open_issues_count
    );
    if let Some(license) = repo.license.as_ref().and_then(|l| l.spdx_id.as_deref()) {
        println!("  License: {}", license);
    }
    println!("  {}", repo.html_url);
    println!();

    section("Languages", &report.languages, |languages| {
        let shares = language_breakdown(languages);
        if shares.is_empty() {
            println!("  No language data");
        }
        for share in shares {
            println!("  {:<20} {:>5.1}%", share.name, share.percentage);
        }
    });

    section("Contributors", &report.contributors, |contributors| {
        for contributor in contributors.iter().take(TOP_CONTRIBUTORS) {
            println!(
                "  {:<20} {} contributions",
                contributor.login, contributor.contributions
            );
        }
        if contributors.len() > TOP_CONTRIBUTORS {
            println!("  … and {} more", contributors.len() - TOP_CONTRIBUTORS);
        }
    });

    section("Commits", &report.commits, |commits| {
        println!("  {} recent commits", commits.len());
        for (month, count) in monthly_commits(commits) {
            println!("  {}  {}", month, count);
        }
    });

    section("Issues", &report.issues, |issues| {
        let analytics = issue_analytics(issues, Utc::now());
        println!(
            "  {} total, {} open, {} closed, {} in the last 30 days",
            analytics.total, analytics.open, analytics.closed, analytics.recent
        );
        if let Some(days) = analytics.average_resolution_days {
            println!("  Average resolution: {:.0} days", days);
        }
        if !analytics.top_labels.is_empty() {
            println!("  Labels: {}", ranked(&analytics.top_labels));
        }
        if !analytics.top_authors.is_empty() {
            println!("  Top authors: {}", ranked(&analytics.top_authors));
        }
    });

    section("Pull requests", &report.pull_requests, |pulls| {
        let stats = pull_request_stats(pulls);
        println!(
            "  {} open, {} closed, {} merged",
            stats.open, stats.closed, stats.merged
        );
    });

    section("Releases", &report.releases, |releases| match releases.first() {
        Some(latest) => println!("  {} releases, latest {}", releases.len(), latest.tag_name),
        None => println!("  No releases"),
    });

    section("Commit activity", &report.commit_activity, |activity| {
        match commit_activity_summary(activity) {
            ActivitySummary::Pending => {
                println!("  Still being computed by GitHub, try again in a moment")
            }
            ActivitySummary::Ready {
                total_commits,
                active_weeks,
                busiest_week,
            } => {
                println!(
                    "  {} commits over the last year, {} active weeks",
                    total_commits, active_weeks
                );
                if let Some((week, total)) = busiest_week {
                    if let Some(start) = chrono::DateTime::from_timestamp(week, 0) {
                        println!("  Busiest week: {} ({})", start.format("%Y-%m-%d"), total);
                    }
                }
            }
        }
    });
}

/// `name (count)` pairs joined for a single line
fn ranked(entries: &[(String, usize)]) -> String {
    entries
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print a heading, then either the section body or the friendly failure text
fn section<T>(title: &str, result: &Section<T>, render: impl FnOnce(&T)) {
    println!("{}:", title);
    match result {
        Ok(value) => render(value),
        Err(e) => {
            tracing::debug!("{} unavailable: {}", title, e.message);
            println!("  ✗ {}", e.kind.user_message());
        }
    }
    println!();
}

fn print_rate_limit(snapshot: Option<RateLimitSnapshot>, mode: &str) {
    match snapshot {
        Some(snapshot) => {
            let reset = snapshot
                .reset_at()
                .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
                .unwrap_or_else(|| snapshot.reset.to_string());
            println!(
                "Rate limit ({}): {}/{} remaining, resets at {}",
                mode, snapshot.remaining, snapshot.limit, reset
            );
            if snapshot.is_low() {
                println!("  ⚠ Running low. Set a GitHub token to raise the limit.");
            }
        }
        None => println!("Rate limit ({}): no data", mode),
    }
}

fn report_json(report: &RepositoryReport, snapshot: Option<RateLimitSnapshot>) -> Result<Value> {
    Ok(json!({
        "repository": serde_json::to_value(&report.repository)?,
        "contributors": section_json(&report.contributors)?,
        "commits": section_json(&report.commits)?,
        "languages": section_json(&report.languages)?,
        "issues": section_json(&report.issues)?,
        "pull_requests": section_json(&report.pull_requests)?,
        "releases": section_json(&report.releases)?,
        "commit_activity": section_json(&report.commit_activity)?,
        "rate_limit": serde_json::to_value(snapshot)?,
    }))
}

fn section_json<T: Serialize>(section: &Section<T>) -> Result<Value> {
    Ok(match section {
        Ok(value) => json!({ "data": serde_json::to_value(value)? }),
        Err(e) => json!({
            "error": {
                "kind": e.kind.as_str(),
                "status": e.status,
                "message": e.message,
            }
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::error_handler::{ErrorKind, GitHubError};

    #[test]
    fn test_ranked() {
        let authors = vec![("alice".to_string(), 2), ("bob".to_string(), 1)];
        assert_eq!(ranked(&authors), "alice (2), bob (1)");
        assert_eq!(ranked(&[]), "");
    }

    #[test]
    fn test_section_json() {
        let ok: Section<Vec<u32>> = Ok(vec![1, 2]);
        assert_eq!(section_json(&ok).unwrap(), json!({"data": [1, 2]}));

        let err: Section<Vec<u32>> = Err(GitHubError {
            kind: ErrorKind::NotFound,
            status: Some(404),
            message: "Error fetching releases: 404 - resource not found (Not Found)".into(),
        });
        let value = section_json(&err).unwrap();
        assert_eq!(value["error"]["kind"], "not_found");
        assert_eq!(value["error"]["status"], 404);
    }
}
