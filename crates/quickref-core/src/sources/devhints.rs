//! DevHints fetcher.
//!
//! Fetches the raw markdown behind a devhints.io page (one file per topic,
//! `### `-delimited sections with fenced code blocks) and turns each section
//! into one item: first non-blank code line as the command, first non-blank
//! prose line as the description.

use tracing::debug;

use crate::item::CheatSheetItem;
use crate::score::relevance_score;

use super::{FetchError, SourceClient};

const SOURCE_NAME: &str = "DevHints";

/// Score for the open-the-page fallback item when a page parses to nothing.
const FALLBACK_SCORE: u32 = 40;

impl SourceClient {
    /// Query DevHints for the search term.
    pub async fn dev_hints(&self, search_term: &str) -> Result<Vec<CheatSheetItem>, FetchError> {
        let slug = slugify(search_term);
        if slug.is_empty() {
            return Ok(Vec::new());
        }

        let raw_url =
            format!("https://raw.githubusercontent.com/rstacruz/cheatsheets/master/{slug}.md");
        let content = self.get_text(&raw_url).await?;

        let page_url = format!("https://devhints.io/{slug}");
        let mut items = parse_dev_hints(search_term, &page_url, &content);

        if items.is_empty() {
            // Page exists but nothing was emittable; point the user at it.
            items.push(CheatSheetItem {
                title: format!("Open DevHints page for {search_term}"),
                description: "Open the DevHints cheat sheet in your browser.".to_string(),
                command: page_url.clone(),
                url: page_url,
                source_name: SOURCE_NAME.to_string(),
                score: FALLBACK_SCORE,
            });
        }

        debug!(count = items.len(), slug, "DevHints results");
        Ok(items)
    }
}

/// One `### ` section being accumulated during the parse.
#[derive(Default)]
struct Section {
    title: String,
    code_lines: Vec<String>,
    description: String,
}

impl Section {
    fn commit(&self, search_term: &str, page_url: &str, results: &mut Vec<CheatSheetItem>) {
        if self.title.trim().is_empty() {
            return;
        }
        let Some(command) = self
            .code_lines
            .iter()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.trim().to_string())
        else {
            return;
        };

        let description = if self.description.trim().is_empty() {
            "Snippet from DevHints".to_string()
        } else {
            self.description.trim().to_string()
        };

        results.push(CheatSheetItem {
            title: self.title.clone(),
            score: relevance_score(search_term, &command, &description),
            command,
            url: page_url.to_string(),
            source_name: SOURCE_NAME.to_string(),
            description,
        });
    }
}

/// Parse a devhints markdown page into scored items, one per section.
fn parse_dev_hints(search_term: &str, page_url: &str, content: &str) -> Vec<CheatSheetItem> {
    let mut results = Vec::new();
    let mut section = Section::default();
    let mut inside_code_block = false;

    for raw_line in content.split('\n') {
        let line = raw_line.trim_end_matches('\r');

        // Frontmatter / horizontal rules
        if line.starts_with("---") {
            continue;
        }

        if let Some(header) = line.strip_prefix("### ") {
            section.commit(search_term, page_url, &mut results);

            let mut title = header.trim();
            if title.starts_with('`') && title.ends_with('`') {
                title = title.trim_matches(['`', ' ']);
            }
            section = Section {
                title: title.to_string(),
                ..Section::default()
            };
            inside_code_block = false;
            continue;
        }

        if line.starts_with("```") {
            inside_code_block = !inside_code_block;
            continue;
        }

        if inside_code_block {
            section.code_lines.push(line.trim().to_string());
            continue;
        }

        if line.trim().is_empty() || line.starts_with("####") {
            continue;
        }

        if section.description.is_empty() {
            section.description = line.trim().to_string();
        }
    }

    section.commit(search_term, page_url, &mut results);
    results
}

/// Build a devhints page slug: lowercase, alphanumerics kept, separator runs
/// collapsed to single hyphens, trimmed of leading/trailing hyphens.
fn slugify(term: &str) -> String {
    let mut slug = String::with_capacity(term.len());
    for c in term.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
---
title: Git
---

### Staging files

Add files to the staging area.

```bash
git add .
git add -p
```

### `git rm`

```bash
git rm file.txt
```

### Empty section

No code here, only prose.

#### Sub-heading is skipped
";

    #[test]
    fn parses_sections_with_title_code_and_description() {
        let items = parse_dev_hints("git", "https://devhints.io/git", FIXTURE);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "Staging files");
        assert_eq!(items[0].command, "git add .");
        assert_eq!(items[0].description, "Add files to the staging area.");
        assert_eq!(items[0].source_name, "DevHints");
        assert_eq!(items[0].url, "https://devhints.io/git");
    }

    #[test]
    fn backtick_wrapped_headers_are_unwrapped() {
        let items = parse_dev_hints("git", "https://devhints.io/git", FIXTURE);
        assert_eq!(items[1].title, "git rm");
        assert_eq!(items[1].command, "git rm file.txt");
        // No prose in that section, so the placeholder applies
        assert_eq!(items[1].description, "Snippet from DevHints");
    }

    #[test]
    fn sections_without_code_are_dropped() {
        let items = parse_dev_hints("git", "https://devhints.io/git", FIXTURE);
        assert!(items.iter().all(|i| i.title != "Empty section"));
    }

    #[test]
    fn page_with_no_sections_parses_to_nothing() {
        let items = parse_dev_hints("x", "https://devhints.io/x", "just text\nno headers\n");
        assert!(items.is_empty());
    }

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Git"), "git");
        assert_eq!(slugify("git rm"), "git-rm");
        assert_eq!(slugify("  C++ lambdas  "), "c-lambdas");
        assert_eq!(slugify("a__b..c"), "a-b-c");
        assert_eq!(slugify("---"), "");
    }
}
