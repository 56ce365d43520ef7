//! History and bookmark command handlers

use crate::cli::commands::{BookmarkCommand, HistoryCommand};
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::core::repository::parse_repository_input;
use crate::core::storage::LocalStore;
use crate::error::Result;
use crate::github::gateway::RepositoryHandler;
use crate::github::provider::ClientProvider;

/// Handle search history commands
pub fn handle_history(command: HistoryCommand) -> Result<()> {
    let store = LocalStore::open_default(&Config::load()?)?;

    match command {
        HistoryCommand::List => {
            let history = store.history()?;
            if history.is_empty() {
                println!("No search history.");
                return Ok(());
            }
            for entry in history {
                println!(
                    "{:<40} {}",
                    entry.display_name(),
                    entry.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
        }
        HistoryCommand::Remove { input } => {
            let target = parse_repository_input(&input)?;
            if store.remove_from_history(&target.owner, &target.name)? {
                println!("Removed {} from history.", target);
            } else {
                println!("{} is not in the history.", target);
            }
        }
        HistoryCommand::Clear => {
            store.clear_history()?;
            println!("Search history cleared.");
        }
    }
    Ok(())
}

/// Handle bookmark commands
pub async fn handle_bookmarks(command: BookmarkCommand) -> Result<()> {
    let config = Config::load()?;
    let store = LocalStore::open_default(&config)?;

    match command {
        BookmarkCommand::List => {
            let bookmarks = store.bookmarks()?;
            if bookmarks.is_empty() {
                println!("No bookmarks.");
                return Ok(());
            }
            for bookmark in bookmarks {
                println!(
                    "{:<40} ★ {:<7} {}",
                    bookmark.full_name,
                    bookmark.stars,
                    bookmark.language.as_deref().unwrap_or("-")
                );
                if let Some(description) = bookmark.description.filter(|d| !d.is_empty()) {
                    println!("  {}", description);
                }
            }
        }
        BookmarkCommand::Add { input } => {
            let target = parse_repository_input(&input)?;
            let provider = ClientProvider::new(CredentialStore::detect()?, config);
            let client = provider.client()?;
            let repository = RepositoryHandler::new(&client)
                .get_repository(&target.owner, &target.name)
                .await?;
            let bookmark = store.add_bookmark(&repository)?;
            println!("✓ Bookmarked {}", bookmark.full_name);
        }
        BookmarkCommand::Remove { input } => {
            let target = parse_repository_input(&input)?;
            if store.remove_bookmark(&target.full_name())? {
                println!("Removed bookmark {}.", target);
            } else {
                println!("{} is not bookmarked.", target);
            }
        }
        BookmarkCommand::Clear => {
            store.clear_bookmarks()?;
            println!("Bookmarks cleared.");
        }
    }
    Ok(())
}
