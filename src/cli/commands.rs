//! CLI command definitions using clap
//!
//! Defines the command structure for the `reposcope` CLI tool.

use clap::{Parser, Subcommand};

use crate::core::config::ConfigKey;

/// reposcope - GitHub repository analyzer
///
/// Fetches repository metadata, contributors, commits, languages, issues,
/// pull requests, releases and commit activity, keeping an eye on the API
/// rate limit. Set GITHUB_TOKEN or run `reposcope auth set` to raise the
/// limit from 60 to 5000 requests per hour.
#[derive(Parser, Debug)]
#[command(name = "reposcope", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a repository
    Analyze(AnalyzeArgs),

    /// Manage the stored GitHub token
    Auth(AuthArgs),

    /// Show the current rate limit
    Limits,

    /// View or edit the search history
    History(HistoryArgs),

    /// Manage bookmarked repositories
    Bookmarks(BookmarkArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Analyze
// ─────────────────────────────────────────────────────────────────────────────

/// Analyze command arguments
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Repository URL or owner/repo
    pub input: String,

    /// Keep going when some sections fail instead of aborting on the first error
    #[arg(long)]
    pub best_effort: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Bookmark the repository after a successful analysis
    #[arg(long)]
    pub bookmark: bool,

    /// Retry the collection on network errors and 5xx responses
    #[arg(long)]
    pub retry: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication commands
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store a personal access token (prompted for when omitted)
    Set {
        /// Token value; avoid passing it here on shared machines
        token: Option<String>,
    },
    /// Remove the stored token
    Clear,
    /// Show the current authentication mode
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// History Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Search history commands
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List recently analyzed repositories
    List,
    /// Remove one repository from the history
    Remove {
        /// Repository URL or owner/repo
        input: String,
    },
    /// Clear the history
    Clear,
}

// ─────────────────────────────────────────────────────────────────────────────
// Bookmark Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Bookmark commands
#[derive(Parser, Debug)]
pub struct BookmarkArgs {
    #[command(subcommand)]
    pub command: BookmarkCommand,
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommand {
    /// List bookmarks
    List,
    /// Bookmark a repository
    Add {
        /// Repository URL or owner/repo
        input: String,
    },
    /// Remove a bookmark
    Remove {
        /// Repository URL or owner/repo
        input: String,
    },
    /// Remove all bookmarks
    Clear,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },
    /// Reset a configuration value to its default
    Reset {
        /// Configuration key
        key: ConfigKey,
    },
}
