//! The normalized result model shared by every source.

use serde::{Deserialize, Serialize};

/// A single cheat sheet entry, normalized from whichever source produced it.
///
/// `command` is the literal snippet the user would run or copy and is never
/// empty for an item returned from aggregation; candidates whose cleaned
/// command comes out empty are discarded during parsing. The pair
/// `(source_name, command)` is the deduplication key across a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatSheetItem {
    /// Display string, possibly a truncated form of the command.
    pub title: String,
    /// Explanatory text; sources fill in a placeholder when absent.
    pub description: String,
    /// The literal snippet. Dedup/match key together with `source_name`.
    pub command: String,
    /// Canonical source link, or a synthetic `offline://` marker.
    pub url: String,
    /// Human-readable provider id, possibly composite like `"tldr (linux)"`.
    pub source_name: String,
    /// Relevance score, always >= 1, unbounded above.
    pub score: u32,
}

impl CheatSheetItem {
    /// Dedup key identifying equivalent results across sources.
    pub fn dedup_key(&self) -> (String, String) {
        (self.source_name.clone(), self.command.clone())
    }
}
