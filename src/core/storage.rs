//! Local search history and bookmarks
//!
//! Two small JSON files in the data directory. History is newest-first,
//! de-duplicated by owner/repo and capped; bookmarks are de-duplicated by
//! repository id and uncapped.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::config::Config;
use crate::error::Result;
use crate::github::types::Repository;

const HISTORY_FILE: &str = "search_history.json";
const BOOKMARKS_FILE: &str = "bookmarks.json";

/// A repository the user analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What the user typed
    pub url: String,
    pub owner: String,
    pub repo: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// A saved repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: u64,
    pub full_name: String,
    pub owner: String,
    pub repo: String,
    pub description: Option<String>,
    pub stars: u64,
    pub language: Option<String>,
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

impl Bookmark {
    pub fn from_repository(repo: &Repository) -> Self {
        Self {
            id: repo.id,
            full_name: repo.full_name.clone(),
            owner: repo.owner.login.clone(),
            repo: repo.name.clone(),
            description: repo.description.clone(),
            stars: repo.stargazers_count,
            language: repo.language.clone(),
            url: repo.html_url.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// History and bookmark files under one directory
pub struct LocalStore {
    dir: PathBuf,
    history_limit: usize,
}

impl LocalStore {
    /// Store in the platform data directory
    pub fn open_default(config: &Config) -> Result<Self> {
        Ok(Self::at(Config::data_dir()?, config.history_limit))
    }

    /// Store rooted at `dir`
    pub fn at(dir: impl Into<PathBuf>, history_limit: usize) -> Self {
        Self {
            dir: dir.into(),
            history_limit: history_limit.max(1),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search history
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a lookup, moving an existing entry for the same repository to the front
    pub fn add_to_history(&self, url: &str, owner: &str, repo: &str) -> Result<()> {
        let mut history: Vec<HistoryEntry> = self.read(HISTORY_FILE)?;
        history.retain(|e| !(e.owner == owner && e.repo == repo));
        history.insert(
            0,
            HistoryEntry {
                url: url.to_string(),
                owner: owner.to_string(),
                repo: repo.to_string(),
                timestamp: Utc::now(),
            },
        );
        history.truncate(self.history_limit);
        self.write(HISTORY_FILE, &history)
    }

    /// Entries, newest first
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.read(HISTORY_FILE)
    }

    /// Drop one repository from the history; returns whether it was present
    pub fn remove_from_history(&self, owner: &str, repo: &str) -> Result<bool> {
        let mut history: Vec<HistoryEntry> = self.read(HISTORY_FILE)?;
        let before = history.len();
        history.retain(|e| !(e.owner == owner && e.repo == repo));
        let removed = history.len() != before;
        self.write(HISTORY_FILE, &history)?;
        Ok(removed)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.remove(HISTORY_FILE)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bookmarks
    // ─────────────────────────────────────────────────────────────────────────

    /// Bookmark a repository, replacing an older bookmark with the same id
    pub fn add_bookmark(&self, repository: &Repository) -> Result<Bookmark> {
        let bookmark = Bookmark::from_repository(repository);
        let mut bookmarks: Vec<Bookmark> = self.read(BOOKMARKS_FILE)?;
        bookmarks.retain(|b| b.id != bookmark.id);
        bookmarks.insert(0, bookmark.clone());
        self.write(BOOKMARKS_FILE, &bookmarks)?;
        Ok(bookmark)
    }

    /// Bookmarks, newest first
    pub fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        self.read(BOOKMARKS_FILE)
    }

    /// Remove a bookmark by `owner/repo`; returns whether it was present
    pub fn remove_bookmark(&self, full_name: &str) -> Result<bool> {
        let mut bookmarks: Vec<Bookmark> = self.read(BOOKMARKS_FILE)?;
        let before = bookmarks.len();
        bookmarks.retain(|b| !b.full_name.eq_ignore_ascii_case(full_name));
        let removed = bookmarks.len() != before;
        self.write(BOOKMARKS_FILE, &bookmarks)?;
        Ok(removed)
    }

    pub fn is_bookmarked(&self, repository_id: u64) -> Result<bool> {
        Ok(self
            .read::<Bookmark>(BOOKMARKS_FILE)?
            .iter()
            .any(|b| b.id == repository_id))
    }

    pub fn clear_bookmarks(&self) -> Result<()> {
        self.remove(BOOKMARKS_FILE)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Missing file reads as empty; corrupt JSON is logged and reads as empty
    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(items)?;
        fs::write(self.path(file), contents)?;
        Ok(())
    }

    fn remove(&self, file: &str) -> Result<()> {
        let path = self.path(file);
        if Path::exists(&path) {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn repository(id: u64, owner: &str, name: &str) -> Repository {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "owner": {"login": owner, "id": 1},
            "html_url": format!("https://github.com/{}/{}", owner, name),
            "stargazers_count": 10,
            "language": "Rust"
        }))
        .unwrap()
    }

    #[test]
    fn test_history_dedups_and_orders_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::at(dir.path(), 20);

        store.add_to_history("a/one", "a", "one").unwrap();
        store.add_to_history("b/two", "b", "two").unwrap();
        store
            .add_to_history("https://github.com/a/one", "a", "one")
            .unwrap();

        let history = store.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].display_name(), "a/one");
        assert_eq!(history[0].url, "https://github.com/a/one");
        assert_eq!(history[1].display_name(), "b/two");
    }

    #[test]
    fn test_history_is_capped() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::at(dir.path(), 3);
        for i in 0..5 {
            let repo = format!("r{}", i);
            store.add_to_history(&repo, "o", &repo).unwrap();
        }
        let names: Vec<_> = store.history().unwrap().into_iter().map(|e| e.repo).collect();
        assert_eq!(names, vec!["r4", "r3", "r2"]);
    }

    #[test]
    fn test_remove_and_clear_history() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::at(dir.path(), 20);
        store.add_to_history("a/one", "a", "one").unwrap();
        assert!(store.remove_from_history("a", "one").unwrap());
        assert!(!store.remove_from_history("a", "one").unwrap());

        store.add_to_history("a/one", "a", "one").unwrap();
        store.clear_history().unwrap();
        assert!(store.history().unwrap().is_empty());
        store.clear_history().unwrap();
    }

    #[test]
    fn test_bookmarks_dedup_by_id() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::at(dir.path(), 20);

        store.add_bookmark(&repository(1, "a", "one")).unwrap();
        store.add_bookmark(&repository(2, "b", "two")).unwrap();
        store.add_bookmark(&repository(1, "a", "one-renamed")).unwrap();

        let bookmarks = store.bookmarks().unwrap();
        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks[0].repo, "one-renamed");
        assert!(store.is_bookmarked(2).unwrap());
        assert!(!store.is_bookmarked(3).unwrap());

        assert!(store.remove_bookmark("B/Two").unwrap());
        assert!(!store.is_bookmarked(2).unwrap());

        store.clear_bookmarks().unwrap();
        assert!(store.bookmarks().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();
        let store = LocalStore::at(dir.path(), 20);
        assert!(store.history().unwrap().is_empty());
        store.add_to_history("a/one", "a", "one").unwrap();
        assert_eq!(store.history().unwrap().len(), 1);
    }
}
