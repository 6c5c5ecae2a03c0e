//! cheat.sh fetcher.
//!
//! One GET against the public aggregator keyed by the search term, answering
//! line-oriented plain text: comment lines (`#`, `//`, `>`) describe the
//! command line(s) that follow them.

use tracing::debug;

use crate::clean::{HTML_LINE_RE, clean_command_syntax};
use crate::item::CheatSheetItem;
use crate::score::relevance_score;

use super::{FetchError, SourceClient, looks_like_html};

/// At most this many items per call; cheat.sh pages can be long.
const MAX_ITEMS: usize = 15;

const SOURCE_NAME: &str = "cheat.sh";

impl SourceClient {
    /// Query cheat.sh for the search term.
    pub async fn cheat_sh(&self, search_term: &str) -> Result<Vec<CheatSheetItem>, FetchError> {
        let encoded = encode_query(search_term);
        // ?T requests plain text without ANSI colors
        let url = format!("https://cheat.sh/{encoded}?T");

        let payload = self.get_text(&url).await?;
        if looks_like_html(&payload) {
            return Err(FetchError::HtmlErrorPage);
        }

        let items = parse_cheat_sh(search_term, &encoded, &payload);
        debug!(count = items.len(), "cheat.sh results");
        Ok(items)
    }
}

/// Parse a cheat.sh plain-text payload into scored items.
fn parse_cheat_sh(search_term: &str, encoded_query: &str, payload: &str) -> Vec<CheatSheetItem> {
    let mut results = Vec::new();
    let mut current_description = String::new();

    for raw in payload.split('\n') {
        if results.len() >= MAX_ITEMS {
            break;
        }

        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with('#') || line.starts_with("//") || line.starts_with('>') {
            current_description = line
                .trim_start_matches(['#', '/', '>', ' '])
                .trim()
                .to_string();
            continue;
        }

        // Self-referential footer links
        if line.to_lowercase().contains("://cheat.sh") {
            continue;
        }

        // Residual HTML slips through on some error pages
        if HTML_LINE_RE.is_match(line) {
            continue;
        }

        let stripped = line.strip_prefix('$').map_or(line, str::trim_start);
        let cleaned = clean_command_syntax(stripped);
        if cleaned.is_empty() {
            continue;
        }

        let description = if current_description.is_empty() {
            "From cheat.sh".to_string()
        } else {
            current_description.clone()
        };

        results.push(CheatSheetItem {
            title: truncate(&cleaned, 80),
            score: relevance_score(search_term, &cleaned, &description),
            command: cleaned,
            url: format!("https://cheat.sh/{encoded_query}"),
            source_name: SOURCE_NAME.to_string(),
            description,
        });

        current_description.clear();
    }

    results
}

/// Percent-encode a search term the way cheat.sh expects: spaces become `+`,
/// unreserved characters pass through, everything else is `%XX`-escaped.
fn encode_query(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for byte in term.bytes() {
        match byte {
            b' ' => out.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
