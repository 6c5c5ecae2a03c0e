//! tldr-pages fetcher.
//!
//! tldr keeps one markdown file per command per platform. The search phrase
//! is expanded into a few candidate page names ("git rm" -> "git-rm", "git")
//! and each candidate is probed across a platform-prioritized list of paths
//! until one yields content.

use tracing::debug;

use crate::clean::clean_command_syntax;
use crate::item::CheatSheetItem;
use crate::score::relevance_score;

use super::{FetchError, SourceClient};

/// Probe order, host platform family first.
fn platform_priority() -> [&'static str; 4] {
    if cfg!(target_os = "windows") {
        ["common", "windows", "linux", "osx"]
    } else {
        ["common", "linux", "osx", "windows"]
    }
}

impl SourceClient {
    /// Query tldr-pages for the search term.
    pub async fn tldr(&self, search_term: &str) -> Result<Vec<CheatSheetItem>, FetchError> {
        for token in command_variations(search_term) {
            for platform in platform_priority() {
                let raw_url = format!(
                    "https://raw.githubusercontent.com/tldr-pages/tldr/main/pages/{platform}/{token}.md"
                );
                let Some(content) = self.try_get_text(&raw_url).await? else {
                    continue;
                };

                let items = parse_tldr(search_term, platform, &token, &content);
                if !items.is_empty() {
                    debug!(count = items.len(), platform, token, "tldr results");
                    // Stop with the first platform and variation that matched.
                    return Ok(items);
                }
            }
        }

        Ok(Vec::new())
    }
}

/// Parse a tldr page: `- ` lines carry the description for the backtick
/// command line that follows.
fn parse_tldr(
    search_term: &str,
    platform: &str,
    token: &str,
    content: &str,
) -> Vec<CheatSheetItem> {
    let mut results = Vec::new();
    let mut description: Option<String> = None;

    for raw_line in content.split('\n') {
        let line = raw_line.trim();

        if let Some(rest) = line.strip_prefix("- ") {
            description = Some(rest.trim().to_string());
        } else if line.starts_with('`') {
            let Some(desc) = description.take() else {
                continue;
            };
            let command = clean_command_syntax(line.trim_matches('`').trim());
            if command.is_empty() {
                continue;
            }

            results.push(CheatSheetItem {
                title: command.clone(),
                score: relevance_score(search_term, &command, &desc),
                command,
                url: format!("https://tldr.inbrowser.app/pages/{platform}/{token}"),
                source_name: format!("tldr ({platform})"),
                description: desc,
            });
        }
    }

    results
}

/// Candidate tldr page names for a search phrase, most specific first:
/// the phrase itself, all words hyphen-joined, the first two words
/// hyphen-joined, and the first word alone. Deduplicated, order kept.
fn command_variations(search_term: &str) -> Vec<String> {
    let trimmed = search_term.trim().to_lowercase();
    let mut variations = vec![trimmed.clone()];

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() > 1 {
        variations.push(words.join("-"));
        variations.push(format!("{}-{}", words[0], words[1]));
        variations.push(words[0].to_string());
    }

    let mut seen = Vec::new();
    for v in variations {
        if !v.is_empty() && !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}
