//! User favorites, persisted as a JSON array of items.
//!
//! Most-recent-first, capped at 50, deduplicated by the same
//! `(command, source_name)` key the aggregation engine uses.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::fuzzy::{DEFAULT_MATCH_THRESHOLD, fuzzy_score, is_fuzzy_match};
use crate::item::CheatSheetItem;

/// Cap to keep the favorites file from growing without bound.
const MAX_FAVORITES: usize = 50;

/// Store for the user's favorite cheat sheet commands.
pub struct FavoritesStore {
    favorites_path: PathBuf,
    favorites: Vec<CheatSheetItem>,
}

impl FavoritesStore {
    /// Open the store backed by the default data directory.
    pub fn new() -> Result<Self> {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("quickref");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::with_path(dir.join("favorites.json")))
    }

    /// Open the store backed by an explicit file (used by tests).
    pub fn with_path(favorites_path: PathBuf) -> Self {
        let favorites = load_favorites(&favorites_path);
        Self {
            favorites_path,
            favorites,
        }
    }

    /// All favorites, most recent first.
    pub fn favorites(&self) -> &[CheatSheetItem] {
        &self.favorites
    }

    pub fn is_favorite(&self, item: &CheatSheetItem) -> bool {
        self.favorites
            .iter()
            .any(|f| f.command == item.command && f.source_name == item.source_name)
    }

    /// Add a copy of the item to the front of the list; no-op if present.
    pub fn add(&mut self, item: &CheatSheetItem) {
        if self.is_favorite(item) {
            return;
        }

        self.favorites.insert(0, item.clone());
        self.favorites.truncate(MAX_FAVORITES);
        self.save();
    }

    pub fn remove(&mut self, item: &CheatSheetItem) {
        self.remove_by_command(&item.command, Some(&item.source_name));
    }

    /// Remove by command text alone, or narrowed to one source. Returns
    /// whether anything was removed.
    pub fn remove_by_command(&mut self, command: &str, source: Option<&str>) -> bool {
        let before = self.favorites.len();
        self.favorites
            .retain(|f| !(f.command == command && source.is_none_or(|s| f.source_name == s)));
        if self.favorites.len() == before {
            return false;
        }
        self.save();
        true
    }

    pub fn toggle(&mut self, item: &CheatSheetItem) {
        if self.is_favorite(item) {
            self.remove(item);
        } else {
            self.add(item);
        }
    }

    /// Filter favorites by substring or fuzzy match; a blank term returns
    /// everything. Ordered by fuzzy score against the command, then title.
    pub fn search(&self, search_term: &str) -> Vec<CheatSheetItem> {
        if search_term.trim().is_empty() {
            return self.favorites.clone();
        }

        let term = search_term.to_lowercase();
        let term = term.trim();

        let mut matches: Vec<CheatSheetItem> = self
            .favorites
            .iter()
            .filter(|f| {
                f.command.to_lowercase().contains(term)
                    || f.title.to_lowercase().contains(term)
                    || f.description.to_lowercase().contains(term)
                    || is_fuzzy_match(term, &f.command, DEFAULT_MATCH_THRESHOLD)
                    || is_fuzzy_match(term, &f.title, DEFAULT_MATCH_THRESHOLD)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let key_a = (fuzzy_score(term, &a.command), fuzzy_score(term, &a.title));
            let key_b = (fuzzy_score(term, &b.command), fuzzy_score(term, &b.title));
            key_b.cmp(&key_a)
        });
        matches
    }

    /// Persist the favorites; write failures are dropped.
    fn save(&self) {
        let result = serde_json::to_string_pretty(&self.favorites)
            .map_err(crate::Error::from)
            .and_then(|json| {
                std::fs::write(&self.favorites_path, json).map_err(crate::Error::from)
            });
        if let Err(err) = result {
            warn!(error = %err, path = %self.favorites_path.display(), "failed to save favorites");
        }
    }
}

/// A missing or corrupt favorites file starts fresh.
fn load_favorites(path: &Path) -> Vec<CheatSheetItem> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    serde_json::from_str(&content).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FavoritesStore {
        FavoritesStore::with_path(dir.path().join("favorites.json"))
    }

    fn item(command: &str, source: &str) -> CheatSheetItem {
        CheatSheetItem {
            title: command.to_string(),
            description: format!("{command} description"),
            command: command.to_string(),
            url: "https://example.com".to_string(),
            source_name: source.to_string(),
            score: 100,
        }
    }

    #[test]
    fn add_puts_newest_first_and_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add(&item("git status", "cheat.sh"));
        store.add(&item("docker ps", "tldr (common)"));
        store.add(&item("git status", "cheat.sh"));

        assert_eq!(store.favorites().len(), 2);
        assert_eq!(store.favorites()[0].command, "docker ps");
    }

    #[test]
    fn same_command_from_different_sources_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add(&item("git status", "cheat.sh"));
        store.add(&item("git status", "DevHints"));
        assert_eq!(store.favorites().len(), 2);
    }

    #[test]
    fn capped_at_50() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        for i in 0..60 {
            store.add(&item(&format!("command-{i}"), "cheat.sh"));
        }
        assert_eq!(store.favorites().len(), MAX_FAVORITES);
        // Most recent survived the cap
        assert_eq!(store.favorites()[0].command, "command-59");
    }

    #[test]
    fn toggle_adds_then_removes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let fav = item("git log", "cheat.sh");

        store.toggle(&fav);
        assert!(store.is_favorite(&fav));
        store.toggle(&fav);
        assert!(!store.is_favorite(&fav));
    }

    #[test]
    fn remove_by_command_without_source_clears_all_sources() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add(&item("git status", "cheat.sh"));
        store.add(&item("git status", "DevHints"));
        store.add(&item("docker ps", "tldr (common)"));

        assert!(store.remove_by_command("git status", None));
        assert_eq!(store.favorites().len(), 1);
        assert!(!store.remove_by_command("git status", None));
    }

    #[test]
    fn remove_by_command_with_source_leaves_other_sources() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add(&item("git status", "cheat.sh"));
        store.add(&item("git status", "DevHints"));

        assert!(store.remove_by_command("git status", Some("cheat.sh")));
        assert_eq!(store.favorites().len(), 1);
        assert_eq!(store.favorites()[0].source_name, "DevHints");
    }

    #[test]
    fn search_filters_and_ranks_by_fuzzy_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add(&item("docker ps", "tldr (common)"));
        store.add(&item("git status", "cheat.sh"));

        let results = store.search("git");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].command, "git status");

        let all = store.search("  ");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn favorites_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        {
            let mut store = FavoritesStore::with_path(path.clone());
            store.add(&item("git status", "cheat.sh"));
        }

        let store = FavoritesStore::with_path(path);
        assert_eq!(store.favorites().len(), 1);
        assert_eq!(store.favorites()[0].command, "git status");
    }

    #[test]
    fn corrupt_favorites_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "[ not json").unwrap();

        let store = FavoritesStore::with_path(path);
        assert!(store.favorites().is_empty());
    }
}
