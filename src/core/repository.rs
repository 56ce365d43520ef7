//! Repository input parsing
//!
//! Turns whatever the user typed (a browser URL, a clone URL or `owner/repo`
//! shorthand) into an owner/repository pair.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ReposcopeError, Result};

/// `owner/repo` or `owner/repo.git`, nothing else
static SHORTHAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?$")
        .expect("Invalid regex pattern for repository shorthand")
});

/// A repository on GitHub
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Get the full repository name (owner/name)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Get the GitHub URL for this repository
    pub fn github_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse user input into a repository reference
///
/// Supports:
/// - `https://github.com/owner/repo` (with optional `.git` or trailing path such as `/tree/main`)
/// - `github.com/owner/repo`
/// - `git@github.com:owner/repo.git`
/// - `ssh://git@github.com/owner/repo.git`
/// - `owner/repo`
pub fn parse_repository_input(input: &str) -> Result<RepoRef> {
    let input = input.trim();

    if let Some(path) = input.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path, input);
    }

    if let Some(path) = input.strip_prefix("github.com/") {
        return parse_owner_repo_path(path, input);
    }

    if let Ok(parsed) = Url::parse(input) {
        let host = parsed.host_str().map(|h| h.trim_start_matches("www."));
        if host == Some("github.com") && parsed.scheme() != "file" {
            return parse_owner_repo_path(parsed.path().trim_start_matches('/'), input);
        }
        return Err(ReposcopeError::InvalidRepository(input.to_string()));
    }

    if let Some(caps) = SHORTHAND_PATTERN.captures(input) {
        return Ok(RepoRef::new(&caps[1], &caps[2]));
    }

    Err(ReposcopeError::InvalidRepository(input.to_string()))
}

/// Parse owner/repo from the leading segments of a path
fn parse_owner_repo_path(path: &str, original: &str) -> Result<RepoRef> {
    let mut parts = path.split('/');
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default().trim_end_matches(".git");

    if is_valid_segment(owner) && is_valid_segment(repo) {
        return Ok(RepoRef::new(owner, repo));
    }
    Err(ReposcopeError::InvalidRepository(original.to_string()))
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (String, String) {
        let r = parse_repository_input(input).unwrap();
        (r.owner, r.name)
    }

    #[test]
    fn test_parse_https_url() {
        assert_eq!(
            parse("https://github.com/octocat/Hello-World"),
            ("octocat".into(), "Hello-World".into())
        );
        assert_eq!(
            parse("https://github.com/owner/repo.git"),
            ("owner".into(), "repo".into())
        );
        assert_eq!(
            parse("http://www.github.com/owner/repo"),
            ("owner".into(), "repo".into())
        );
    }

    #[test]
    fn test_parse_url_with_trailing_path() {
        assert_eq!(
            parse("https://github.com/rust-lang/rust/tree/master/library"),
            ("rust-lang".into(), "rust".into())
        );
    }

    #[test]
    fn test_parse_without_scheme() {
        assert_eq!(
            parse("github.com/tokio-rs/tokio"),
            ("tokio-rs".into(), "tokio".into())
        );
    }

    #[test]
    fn test_parse_ssh_urls() {
        assert_eq!(
            parse("git@github.com:owner/repo.git"),
            ("owner".into(), "repo".into())
        );
        assert_eq!(
            parse("ssh://git@github.com/owner/repo.git"),
            ("owner".into(), "repo".into())
        );
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(
            parse("serde-rs/serde"),
            ("serde-rs".into(), "serde".into())
        );
        assert_eq!(parse(" owner/repo.git "), ("owner".into(), "repo".into()));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(parse_repository_input("").is_err());
        assert!(parse_repository_input("not a url!!").is_err());
        assert!(parse_repository_input("https://gitlab.com/owner/repo").is_err());
        assert!(parse_repository_input("https://github.com/owner").is_err());
        assert!(parse_repository_input("a/b/c").is_err());
    }

    #[test]
    fn test_repo_ref_display() {
        let r = RepoRef::new("myorg", "myrepo");
        assert_eq!(r.full_name(), "myorg/myrepo");
        assert_eq!(r.to_string(), "myorg/myrepo");
        assert_eq!(r.github_url(), "https://github.com/myorg/myrepo");
    }
}
