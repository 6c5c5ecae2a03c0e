//! Command usage tracking with recency-weighted scoring.
//!
//! Records which commands the user actually ran and which search terms led
//! there, persisted as a JSON map next to the favorites file. Scores decay
//! over 30 days so stale habits stop dominating suggestions. Single logical
//! owner per process; last-writer-wins on the persisted file is fine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::fuzzy::is_fuzzy_match;

/// Entries untouched for this long are pruned.
const MAX_IDLE_DAYS: u64 = 90;

/// The history never holds more than this many commands.
const MAX_ENTRIES: usize = 100;

/// Search terms remembered per command.
const MAX_SEARCH_TERMS: usize = 10;

/// Fuzzy threshold for relating a new query to a recorded search term.
const SUGGESTION_FUZZY_THRESHOLD: u32 = 50;

/// Usage record for one command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandUsage {
    pub command: String,
    pub count: u32,
    /// UNIX epoch seconds of the last recorded use.
    pub last_used: u64,
    #[serde(default)]
    pub search_terms: Vec<String>,
}

/// Tracks command usage and provides personalized suggestion ranking.
pub struct UsageTracker {
    history_path: PathBuf,
    usage: HashMap<String, CommandUsage>,
}

impl UsageTracker {
    /// Open the tracker backed by the default data directory.
    pub fn new() -> Result<Self> {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("quickref");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::with_path(dir.join("usage_history.json")))
    }

    /// Open the tracker backed by an explicit file (used by tests).
    pub fn with_path(history_path: PathBuf) -> Self {
        let usage = load_history(&history_path);
        Self {
            history_path,
            usage,
        }
    }

    /// Record one use of a command, optionally remembering the search term
    /// that led to it. Prunes and saves after every record.
    pub fn record_usage(&mut self, command: &str, search_term: Option<&str>) {
        if command.trim().is_empty() {
            return;
        }

        let key = command.to_lowercase().trim().to_string();
        let entry = self.usage.entry(key).or_insert_with(|| CommandUsage {
            command: command.to_string(),
            count: 0,
            last_used: now_secs(),
            search_terms: Vec::new(),
        });

        entry.count += 1;
        entry.last_used = now_secs();

        if let Some(term) = search_term {
            let term = term.to_lowercase().trim().to_string();
            if !term.is_empty() && !entry.search_terms.contains(&term) {
                entry.search_terms.push(term);
                if entry.search_terms.len() > MAX_SEARCH_TERMS {
                    entry.search_terms.remove(0);
                }
            }
        }

        self.prune();
        self.save();
    }

    /// Recency-weighted usage score: `count * recency * 10`, where recency
    /// decays linearly over 30 days and floors at 0.1.
    pub fn usage_score(&self, command: &str) -> u32 {
        let key = command.to_lowercase().trim().to_string();
        let Some(entry) = self.usage.get(&key) else {
            return 0;
        };

        let days_since = (now_secs().saturating_sub(entry.last_used)) as f64 / 86_400.0;
        let recency = (1.0 - days_since / 30.0).max(0.1);

        (f64::from(entry.count) * recency * 10.0) as u32
    }

    /// Most-used commands, best first.
    pub fn popular_commands(&self, limit: usize) -> Vec<String> {
        let mut entries: Vec<&CommandUsage> = self.usage.values().collect();
        entries.sort_by(|a, b| self.usage_score(&b.command).cmp(&self.usage_score(&a.command)));
        entries
            .into_iter()
            .take(limit)
            .map(|u| u.command.clone())
            .collect()
    }

    /// Commands previously reached via search terms similar to this one.
    pub fn personalized_suggestions(&self, search_term: &str, limit: usize) -> Vec<String> {
        let term = search_term.to_lowercase();
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&CommandUsage> = self
            .usage
            .values()
            .filter(|u| {
                u.search_terms.iter().any(|st| {
                    st.contains(term)
                        || term.contains(st.as_str())
                        || is_fuzzy_match(term, st, SUGGESTION_FUZZY_THRESHOLD)
                })
            })
            .collect();

        matches.sort_by(|a, b| self.usage_score(&b.command).cmp(&self.usage_score(&a.command)));
        matches
            .into_iter()
            .take(limit)
            .map(|u| u.command.clone())
            .collect()
    }

    fn prune(&mut self) {
        let cutoff = now_secs().saturating_sub(MAX_IDLE_DAYS * 86_400);
        self.usage.retain(|_, u| u.last_used >= cutoff);

        if self.usage.len() > MAX_ENTRIES {
            let mut entries: Vec<CommandUsage> = self.usage.values().cloned().collect();
            entries.sort_by(|a, b| {
                self.usage_score(&b.command).cmp(&self.usage_score(&a.command))
            });
            entries.truncate(MAX_ENTRIES);

            self.usage = entries
                .into_iter()
                .map(|u| (u.command.to_lowercase().trim().to_string(), u))
                .collect();
        }
    }

    /// Persist the history; write failures are dropped.
    fn save(&self) {
        let result = serde_json::to_string_pretty(&self.usage)
            .map_err(crate::Error::from)
            .and_then(|json| std::fs::write(&self.history_path, json).map_err(crate::Error::from));
        if let Err(err) = result {
            warn!(error = %err, path = %self.history_path.display(), "failed to save usage history");
        }
    }
}

/// Missing or corrupt history files start fresh.
fn load_history(path: &Path) -> HashMap<String, CommandUsage> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return HashMap::new();
    };
    serde_json::from_str(&content).unwrap_or_default()
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tracker_in(dir: &tempfile::TempDir) -> UsageTracker {
        UsageTracker::with_path(dir.path().join("usage_history.json"))
    }

    #[test]
    fn recording_increments_count_and_scores() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);

        tracker.record_usage("git status", Some("git"));
        tracker.record_usage("git status", None);

        // Fresh usage: recency ~1.0, count 2 -> score ~20
        let score = tracker.usage_score("git status");
        assert!(score >= 19 && score <= 20, "score was {score}");
        assert_eq!(tracker.usage_score("unknown"), 0);
    }

    #[test]
    fn old_usage_decays() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);
        for _ in 0..5 {
            tracker.record_usage("git status", None);
        }
        let fresh = tracker.usage_score("git status");

        // Backdate the entry by 29 days
        for usage in tracker.usage.values_mut() {
            usage.last_used = now_secs() - 29 * 86_400;
        }
        let aged = tracker.usage_score("git status");
        assert!(aged < fresh, "decayed {aged} should be below fresh {fresh}");

        // Past 30 days the recency factor floors at 0.1
        for usage in tracker.usage.values_mut() {
            usage.last_used = now_secs() - 60 * 86_400;
        }
        assert_eq!(tracker.usage_score("git status"), 5);
    }

    #[test]
    fn search_terms_are_bounded_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);

        for i in 0..15 {
            tracker.record_usage("ls", Some(&format!("term{i}")));
        }
        tracker.record_usage("ls", Some("term14"));

        let entry = tracker.usage.get("ls").unwrap();
        assert_eq!(entry.search_terms.len(), MAX_SEARCH_TERMS);
        assert_eq!(
            entry.search_terms.iter().filter(|t| *t == "term14").count(),
            1
        );
    }

    #[test]
    fn popular_commands_ranked_by_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);

        tracker.record_usage("git status", None);
        for _ in 0..5 {
            tracker.record_usage("docker ps", None);
        }

        let popular = tracker.popular_commands(2);
        assert_eq!(popular[0], "docker ps");
        assert_eq!(popular[1], "git status");
    }

    #[test]
    fn personalized_suggestions_match_recorded_terms() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);

        tracker.record_usage("git rm --cached", Some("git rm"));
        tracker.record_usage("docker ps", Some("containers"));

        let suggestions = tracker.personalized_suggestions("git", 5);
        assert_eq!(suggestions, vec!["git rm --cached".to_string()]);
    }

    #[test]
    fn history_is_capped_at_100_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);

        for i in 0..120 {
            tracker.record_usage(&format!("command-{i}"), None);
        }
        assert!(tracker.usage.len() <= MAX_ENTRIES);
    }

    #[test]
    fn history_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage_history.json");

        {
            let mut tracker = UsageTracker::with_path(path.clone());
            tracker.record_usage("git status", Some("git"));
        }

        let tracker = UsageTracker::with_path(path);
        assert!(tracker.usage_score("git status") > 0);
    }

    #[test]
    fn corrupt_history_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage_history.json");
        std::fs::write(&path, "{ not json").unwrap();

        let tracker = UsageTracker::with_path(path);
        assert!(tracker.usage.is_empty());
    }
}
