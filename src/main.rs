//! reposcope - GitHub repository analyzer
//!
//! Analyzes a repository through the GitHub REST API while tracking the
//! rate limit. Set `RUST_LOG=debug` to see every rate limit snapshot.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reposcope::cli::commands::{Cli, Commands};
use reposcope::cli::{analyze, auth, config, history, limits};
use reposcope::error::{ReposcopeError, Result};

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        handle_error(&e);
        std::process::exit(1);
    }
}

/// Print an error, using the friendly copy for classified GitHub failures
fn handle_error(e: &ReposcopeError) {
    match e {
        ReposcopeError::GitHub(err) => {
            eprintln!("Error: {}", err.kind.user_message());
            eprintln!("  {}", err.message);
        }
        _ => eprintln!("Error: {}", e),
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => analyze::handle_analyze(args).await,
        Commands::Auth(args) => auth::handle_auth(args.command),
        Commands::Limits => limits::handle_limits(),
        Commands::History(args) => history::handle_history(args.command),
        Commands::Bookmarks(args) => history::handle_bookmarks(args.command).await,
        Commands::Config(args) => config::handle_config(args.command),
    }
}
